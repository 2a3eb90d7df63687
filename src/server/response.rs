//! HTTP/1.0 response construction.

use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::server::file::ServedFile;

/// HTTP status codes the server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    UriTooLong = 414,
    InternalServerError = 500,
    HttpVersionNotSupported = 505,
}

impl StatusCode {
    /// Get the reason phrase for this status code.
    pub fn reason_phrase(self) -> &'static str {
        reason_phrase(self as u16)
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> u16 {
        status as u16
    }
}

/// The reason phrase for a status code.
///
/// Codes outside the table render a placeholder rather than failing.
pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        414 => "URI Too Long",
        500 => "Internal Server Error",
        505 => "HTTP Version Not Supported",
        _ => "Unknown Status",
    }
}

/// Render the status line: `HTTP/1.0 <code> <reason>` plus CRLF.
///
/// Responses are always stamped 1.0, whatever version the request
/// carried.
pub fn status_line(code: impl Into<u16>) -> String {
    let code = code.into();
    format!("HTTP/1.0 {code} {reason}\r\n", reason = reason_phrase(code))
}

/// Render the header block for a file response, terminated by the empty
/// line that separates headers from the body.
pub fn file_headers(file: &ServedFile) -> String {
    let now = http_date(SystemTime::now());
    let last_modified = file.modified().map_or_else(|| now.clone(), http_date);

    let mut headers = String::new();
    headers.push_str(&format!("Date: {now}\r\n"));
    headers.push_str(&format!("Location: {location}\r\n", location = file.location()));
    headers.push_str(concat!("Server: staticserve-rs/", env!("CARGO_PKG_VERSION"), "\r\n"));
    headers.push_str("Allow: GET\r\n");
    headers.push_str(&format!("Content-Length: {len}\r\n", len = file.len()));
    headers.push_str(&format!("Content-Type: {mime}\r\n", mime = file.mime()));
    // Expires: now — responses are immediately stale, nothing is cacheable.
    headers.push_str(&format!("Expires: {now}\r\n"));
    headers.push_str(&format!("Last-Modified: {last_modified}\r\n"));
    headers.push_str("\r\n");
    headers
}

/// Format a timestamp as an RFC 1123 HTTP date.
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
