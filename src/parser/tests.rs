//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use crate::parser::{parse_request, Error, Method, Request, Version, MAX_TARGET_LEN};

    #[test]
    fn test_parse_simple_get_request() {
        let request = b"GET /index.html HTTP/1.0\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.method, Method::GET);
        assert_eq!(result.target, "/index.html");
        assert_eq!(result.version, Some(Version::Http10));
        assert!(result.needs_status_line());
    }

    #[test]
    fn test_parse_http11_request() {
        let request = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.version, Some(Version::Http11));
    }

    #[test]
    fn test_headers_and_body_are_ignored() {
        let request = b"GET /a.txt HTTP/1.0\r\nX-Whatever: \xff\xfe\r\n\r\nbinary\x00body";
        let result = parse_request(request).unwrap();
        assert_eq!(result.target, "/a.txt");
    }

    #[test]
    fn test_request_line_without_trailing_newline() {
        let result = parse_request(b"GET /x HTTP/1.0").unwrap();
        assert_eq!(result.target, "/x");
    }

    #[test]
    fn test_simple_request_has_no_status_line() {
        let result = parse_request(b"GET /plain.txt\r\n").unwrap();
        assert_eq!(
            result,
            Request {
                method: Method::GET,
                target: "/plain.txt".to_string(),
                version: None,
            }
        );
        assert!(!result.needs_status_line());
    }

    #[test]
    fn test_two_token_non_get_is_malformed() {
        let result = parse_request(b"POST /x\r\n");
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));
    }

    #[test]
    fn test_post_parses_as_post() {
        let result = parse_request(b"POST /x HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(result.method, Method::POST);
    }

    #[test]
    fn test_unknown_method() {
        let result = parse_request(b"BREW /coffee HTTP/1.0\r\n\r\n");
        assert!(matches!(result, Err(Error::InvalidMethod(ref m)) if m == "BREW"));
    }

    #[test]
    fn test_unsupported_version() {
        let result = parse_request(b"GET /a HTTP/2.5\r\n\r\n");
        assert!(matches!(result, Err(Error::UnsupportedVersion(ref v)) if v == "HTTP/2.5"));
    }

    #[test]
    fn test_garbage_version_is_malformed() {
        let result = parse_request(b"GET /a BANANA\r\n\r\n");
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));
    }

    #[test]
    fn test_target_too_long() {
        let target = "/".repeat(MAX_TARGET_LEN + 1);
        let request = format!("GET {target} HTTP/1.0\r\n\r\n");
        let result = parse_request(request.as_bytes());
        assert!(matches!(result, Err(Error::TargetTooLong(n)) if n == MAX_TARGET_LEN + 1));
    }

    #[test]
    fn test_target_at_limit_is_accepted() {
        let target = "/".repeat(MAX_TARGET_LEN);
        let request = format!("GET {target} HTTP/1.0\r\n\r\n");
        assert!(parse_request(request.as_bytes()).is_ok());
    }

    #[test]
    fn test_empty_request() {
        assert!(matches!(parse_request(b""), Err(Error::Empty)));
        assert!(matches!(parse_request(b"\r\n"), Err(Error::Empty)));
    }

    #[test]
    fn test_request_line_with_invalid_utf8() {
        let result = parse_request(b"GET /\xff\xfe HTTP/1.0\r\n");
        assert!(matches!(result, Err(Error::InvalidUtf8)));
    }

    #[test]
    fn test_one_token_line_is_malformed() {
        let result = parse_request(b"GET\r\n\r\n");
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(Error::Empty.status_code(), 400);
        assert_eq!(Error::MalformedRequestLine(String::new()).status_code(), 400);
        assert_eq!(Error::InvalidMethod("BREW".into()).status_code(), 400);
        assert_eq!(Error::InvalidUtf8.status_code(), 400);
        assert_eq!(Error::TargetTooLong(4096).status_code(), 414);
        assert_eq!(Error::UnsupportedVersion("HTTP/2.5".into()).status_code(), 505);
    }
}
