//! HTTP request methods.

use std::fmt;
use std::str::FromStr;

use crate::parser::error::Error;

/// HTTP request methods as defined in RFC 1945 and common extensions.
///
/// Only `GET` is served; the others parse successfully so the server
/// can answer them with `405 Method Not Allowed` instead of a generic
/// parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method: requests a representation of the specified resource.
    GET,
    /// POST method: submits data to be processed to the identified resource.
    POST,
    /// PUT method: replaces the target resource with the request payload.
    PUT,
    /// DELETE method: deletes the specified resource.
    DELETE,
    /// HEAD method: same as GET but without the response body.
    HEAD,
    /// OPTIONS method: describes the communication options for the target.
    OPTIONS,
    /// PATCH method: applies partial modifications to a resource.
    PATCH,
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "HEAD" => Ok(Method::HEAD),
            "OPTIONS" => Ok(Method::OPTIONS),
            "PATCH" => Ok(Method::PATCH),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
