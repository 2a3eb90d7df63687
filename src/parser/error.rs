//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur during HTTP request parsing.
///
/// Every variant maps to the status code the connection is answered
/// with; see [`Error::status_code`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The request is empty.
    #[error("Empty request")]
    Empty,

    /// The request line is malformed (wrong format or missing components).
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The method token is not a known HTTP method.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The request target exceeds [`crate::parser::MAX_TARGET_LEN`] bytes.
    #[error("Request target of {0} bytes exceeds the accepted limit")]
    TargetTooLong(usize),

    /// The version token looks like an HTTP version but is not 1.0 or 1.1.
    #[error("Unsupported HTTP version: {0}")]
    UnsupportedVersion(String),

    /// The request line is not valid UTF-8.
    #[error("Request line is not valid UTF-8")]
    InvalidUtf8,
}

impl Error {
    /// The HTTP status code a request failing with this error is
    /// answered with.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::TargetTooLong(_) => 414,
            Error::UnsupportedVersion(_) => 505,
            Error::Empty
            | Error::MalformedRequestLine(_)
            | Error::InvalidMethod(_)
            | Error::InvalidUtf8 => 400,
        }
    }
}
