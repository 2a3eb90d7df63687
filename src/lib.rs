//! A concurrent HTTP/1.0 static file server.
//!
//! A master socket accepts TCP connections, each connection is handed
//! to a fixed-size work-stealing thread pool, and the worker that picks
//! it up parses one request, resolves it under the served directory,
//! and streams the file back — one request per connection, HTTP/1.0
//! style.
//!
//! # Architecture
//!
//! - [`pool`] — the work-stealing thread pool: one mutex-protected
//!   deque per worker (owner pops LIFO at the front, thieves take FIFO
//!   from the back), a global overflow queue for outside submitters,
//!   and a cooperative terminate flag.
//! - [`parser`] — the HTTP/1.0 request-line parser and the status codes
//!   malformed requests map to.
//! - [`server`] — the acceptor loop, connection ownership, file
//!   resolution, and response construction.
//!
//! # Example
//!
//! ```no_run
//! use staticserve_rs::{HttpServer, ServerConfig};
//!
//! let config = ServerConfig {
//!     host: "127.0.0.1".to_string(),
//!     port: 8080,
//!     directory: "/srv/www".into(),
//!     ..Default::default()
//! };
//!
//! let server = HttpServer::bind(config)?;
//! let shutdown = server.shutdown_handle();
//! // call `shutdown.stop()` from a signal handler to stop accepting
//! server.serve()?;
//! # Ok::<(), staticserve_rs::ServerError>(())
//! ```

// Export the parser module
pub mod parser;

// Export the thread pool module
pub mod pool;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{parse_request, Error as ParserError, Method, Request, Version};
pub use pool::{StealingDeque, SharedQueue, Submitter, Task, WorkerPool};
pub use server::{
    Connection, Error as ServerError, HttpServer, ServedFile, ServerConfig, ShutdownHandle,
    StatusCode,
};
