//! HTTP request-line parsing and representation.

use std::str::FromStr;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::Version;

/// Longest request target accepted before answering 414.
pub const MAX_TARGET_LEN: usize = 2048;

/// A parsed HTTP/1.0 request.
///
/// Only the request line matters to a one-shot HTTP/1.0 file server;
/// header fields after it are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, POST, ...)
    pub method: Method,
    /// The request target, as sent by the client
    pub target: String,
    /// The protocol version, or `None` for an HTTP/0.9 Simple-Request
    pub version: Option<Version>,
}

impl Request {
    /// Whether the response carries a status line and headers.
    ///
    /// HTTP/0.9 Simple-Requests (`GET target` with no version token)
    /// are answered with the body alone.
    pub fn needs_status_line(&self) -> bool {
        self.version.is_some()
    }
}

/// Parse an HTTP request from the bytes received on a connection.
///
/// Only the first line is examined. The remainder of the buffer (header
/// fields, a request body) is tolerated but ignored.
///
/// # Errors
///
/// Returns an [`Error`] describing the protocol violation; callers map
/// it to a status code with [`Error::status_code`].
pub fn parse_request(input: &[u8]) -> Result<Request, Error> {
    let line = request_line(input)?;

    let parts: Vec<&str> = line.split_whitespace().collect();
    let (method, target, version) = match parts.as_slice() {
        [method, target, version] => (*method, *target, Some(*version)),
        // A bare `GET target` is an HTTP/0.9 Simple-Request.
        ["GET", target] => ("GET", *target, None),
        _ => return Err(Error::MalformedRequestLine(line.to_string())),
    };

    let method = Method::from_str(method)?;

    if target.len() > MAX_TARGET_LEN {
        return Err(Error::TargetTooLong(target.len()));
    }

    let version = match version {
        Some(token) => Some(Version::from_str(token)?),
        None => None,
    };

    Ok(Request {
        method,
        target: target.to_string(),
        version,
    })
}

/// Extract the request line, without its trailing CRLF.
fn request_line(input: &[u8]) -> Result<&str, Error> {
    if input.is_empty() {
        return Err(Error::Empty);
    }

    let line = match input.iter().position(|&b| b == b'\n') {
        Some(end) => &input[..end],
        None => input,
    };
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.is_empty() {
        return Err(Error::Empty);
    }

    std::str::from_utf8(line).map_err(|_| Error::InvalidUtf8)
}
