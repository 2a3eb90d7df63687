//! Error types for the HTTP server.

use thiserror::Error;

/// Errors that can take the server down.
///
/// Per-connection failures never surface here: they are logged and the
/// connection is dropped, leaving the pool and its siblings untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured listen address does not resolve.
    #[error("Invalid listen address: {0}")]
    InvalidAddr(String),

    /// I/O error while binding or accepting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
