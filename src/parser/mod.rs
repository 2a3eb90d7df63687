//! HTTP/1.0 request parser.
//!
//! Parses the request line of an HTTP/1.0 (or HTTP/1.1, answered as 1.0)
//! request and derives the status code a malformed request should be
//! answered with.

mod request;
mod method;
mod version;
mod error;
mod tests;

// Re-export public items
pub use request::{Request, MAX_TARGET_LEN};
pub use method::Method;
pub use version::Version;
pub use error::Error;

// Re-export the parse_request function
pub use request::parse_request;
