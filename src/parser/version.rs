//! HTTP protocol versions.

use std::fmt;
use std::str::FromStr;

use crate::parser::error::Error;

/// Protocol versions the server accepts.
///
/// HTTP/1.1 requests are accepted but responded to as 1.0. Version
/// tokens shaped like an HTTP version but outside this set parse to
/// [`Error::UnsupportedVersion`] (answered with 505); anything else is
/// a malformed request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Http10,
    Http11,
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HTTP/1.0" => Ok(Version::Http10),
            "HTTP/1.1" => Ok(Version::Http11),
            _ if s.starts_with("HTTP/") => Err(Error::UnsupportedVersion(s.to_string())),
            _ => Err(Error::MalformedRequestLine(s.to_string())),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Http10 => write!(f, "HTTP/1.0"),
            Version::Http11 => write!(f, "HTTP/1.1"),
        }
    }
}
