//! Server configuration.

use std::path::PathBuf;
use std::time::Duration;

/// HTTP server configuration.
///
/// Built once at startup and passed into the acceptor and the
/// connection processor; there is no ambient mutable server state.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// The served directory; request targets resolve under this root.
    pub directory: PathBuf,
    /// Worker threads in the pool.
    pub workers: usize,
    /// The receive buffer size; a request must fit in one read.
    pub read_buffer_size: usize,
    /// Socket read timeout; `None` waits forever.
    pub read_timeout: Option<Duration>,
    /// Socket write timeout; `None` waits forever.
    pub write_timeout: Option<Duration>,
}

impl ServerConfig {
    /// The `host:port` string handed to the listener.
    pub fn addr(&self) -> String {
        format!("{host}:{port}", host = self.host, port = self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            directory: PathBuf::from("."),
            workers: num_cpus::get(),
            read_buffer_size: 8192,
            read_timeout: Some(Duration::from_secs(10)),
            write_timeout: Some(Duration::from_secs(10)),
        }
    }
}
