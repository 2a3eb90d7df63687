//! HTTP/1.0 static file serving.
//!
//! The acceptor loop, the per-connection processing pipeline, and the
//! response plumbing around them. One accepted connection is owned by
//! exactly one pool task for its entire lifetime: one read, one parsed
//! request, one response, close.

mod config;
mod connection;
mod error;
mod file;
mod http_server;
mod response;

// Re-export public items
pub use config::ServerConfig;
pub use connection::Connection;
pub use error::Error;
pub use file::{resolve_target, ServedFile};
pub use http_server::{HttpServer, ShutdownHandle};
pub use response::{file_headers, reason_phrase, status_line, StatusCode};
