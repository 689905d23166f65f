//! Request capabilities used by the authenticators

use axum::http::{header, HeaderMap, Request};

/// What an authenticator may read from an inbound request
pub trait AuthRequest {
    /// Raw value of a header, if present and valid UTF-8
    fn header(&self, name: &str) -> Option<&str>;

    /// Value of a cookie by name
    fn cookie(&self, name: &str) -> Option<String> {
        let cookie_str = self.header(header::COOKIE.as_str())?;
        parse_cookie(cookie_str, name)
    }
}

impl AuthRequest for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|value| value.to_str().ok())
    }
}

impl<B> AuthRequest for Request<B> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().header(name)
    }
}

/// Find `name=value` in a `Cookie` header value
pub fn parse_cookie(cookie_str: &str, name: &str) -> Option<String> {
    cookie_str.split(';').find_map(|cookie| {
        let (key, value) = cookie.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_cookie() {
        let raw = "theme=dark; session_id=abc-123; other=x";
        assert_eq!(parse_cookie(raw, "session_id").as_deref(), Some("abc-123"));
        assert_eq!(parse_cookie(raw, "theme").as_deref(), Some("dark"));
        assert_eq!(parse_cookie(raw, "missing"), None);
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        assert_eq!(parse_cookie("session_id_old=1", "session_id"), None);
    }

    #[test]
    fn test_header_map_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("session_id=s1"));

        assert_eq!(headers.header("authorization"), Some("Basic abc"));
        assert_eq!(headers.cookie("session_id").as_deref(), Some("s1"));
        assert_eq!(headers.header("x-missing"), None);
    }

    #[test]
    fn test_request_lookup() {
        let req = Request::builder()
            .uri("/")
            .header("Cookie", "session_id=from-request")
            .body(())
            .unwrap();
        assert_eq!(req.cookie("session_id").as_deref(), Some("from-request"));
    }
}
