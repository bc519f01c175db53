use crate::http::headers::Headers;

/// HTTP request methods.
///
/// Methods the server does not recognize are preserved verbatim in the
/// `Unknown` variant; the connection worker answers those with 501 rather
/// than the parser rejecting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    HEAD,
    OPTIONS,
    PATCH,
    /// Any method token the server does not recognize.
    Unknown(String),
}

impl Method {
    /// Parses an HTTP method token (case-sensitive, per the wire format).
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Unknown(s) => s,
        }
    }

    /// Whether a request with this method is defined to carry a body.
    pub fn carries_body(&self) -> bool {
        matches!(self, Method::POST | Method::PUT | Method::PATCH)
    }
}

/// A parsed HTTP request.
///
/// Created once per connection by the parser and immutable thereafter; the
/// connection worker owns it for the life of the request. The `path` is the
/// raw request-target as sent by the client; it is never used to open a file
/// before the resolver has sanitized it.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    /// Protocol scheme from the request line, e.g. "HTTP/1.1".
    pub scheme: String,
    pub headers: Headers,
    /// Present only when Content-Length was given and the method carries one.
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_round_trip() {
        assert_eq!(Method::from_token("GET"), Method::GET);
        assert_eq!(Method::from_token("DELETE"), Method::DELETE);
        // Lowercase is not a recognized token on the wire.
        assert_eq!(
            Method::from_token("get"),
            Method::Unknown("get".to_string())
        );
    }

    #[test]
    fn body_carrying_methods() {
        assert!(Method::POST.carries_body());
        assert!(Method::PUT.carries_body());
        assert!(Method::PATCH.carries_body());
        assert!(!Method::GET.carries_body());
        assert!(!Method::Unknown("BREW".into()).carries_body());
    }
}
