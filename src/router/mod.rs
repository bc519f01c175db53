//! Route table mapping (method, path) to handlers.
//!
//! Routes are registered once at startup; the table is read-only while the
//! server is accepting connections, so workers can look up handlers
//! concurrently without locking.

use crate::http::request::{Method, Request};
use crate::http::response::Response;

/// Handler contract: a request in, a response out.
pub type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// A route pattern: an exact literal path, or a trailing-wildcard prefix
/// written `"/assets/*"`, which matches any path beginning with `/assets/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Exact(String),
    Prefix(String),
}

impl Pattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix('*') {
            Some(prefix) => Pattern::Prefix(prefix.to_string()),
            None => Pattern::Exact(pattern.to_string()),
        }
    }
}

struct Route {
    method: Method,
    pattern: Pattern,
    handler: Handler,
}

#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a handler for a method and path pattern.
    pub fn add(&mut self, method: Method, pattern: &str, handler: Handler) {
        self.routes.push(Route {
            method,
            pattern: Pattern::parse(pattern),
            handler,
        });
    }

    /// Finds the handler for (method, path).
    ///
    /// An exact literal match wins outright. Failing that, among wildcard
    /// patterns registered for the method, the longest literal prefix wins
    /// (most-specific match). Returns `None` when nothing matches; the
    /// caller decides the fallback.
    pub fn find(&self, method: &Method, path: &str) -> Option<&Handler> {
        for route in &self.routes {
            if route.method == *method && route.pattern == Pattern::Exact(path.to_string()) {
                return Some(&route.handler);
            }
        }

        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .filter_map(|route| match &route.pattern {
                Pattern::Prefix(prefix) if path.starts_with(prefix.as_str()) => {
                    Some((prefix.len(), &route.handler))
                }
                _ => None,
            })
            .max_by_key(|(prefix_len, _)| *prefix_len)
            .map(|(_, handler)| handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::headers::Headers;

    fn request(method: Method, path: &str) -> Request {
        Request {
            method,
            path: path.to_string(),
            scheme: "HTTP/1.1".to_string(),
            headers: Headers::new(),
            body: None,
        }
    }

    fn tagged(tag: &'static str) -> Handler {
        Box::new(move |_req: &Request| Response::ok(tag.as_bytes().to_vec()))
    }

    fn body_of(router: &Router, method: Method, path: &str) -> Option<Vec<u8>> {
        let req = request(method.clone(), path);
        router.find(&method, path).map(|h| h(&req).body)
    }

    #[test]
    fn exact_match_beats_wildcard() {
        let mut router = Router::new();
        router.add(Method::GET, "/hello/*", tagged("wild"));
        router.add(Method::GET, "/hello/world", tagged("exact"));

        assert_eq!(
            body_of(&router, Method::GET, "/hello/world"),
            Some(b"exact".to_vec())
        );
        assert_eq!(
            body_of(&router, Method::GET, "/hello/there"),
            Some(b"wild".to_vec())
        );
    }

    #[test]
    fn longest_prefix_wins_among_wildcards() {
        let mut router = Router::new();
        router.add(Method::GET, "/*", tagged("root"));
        router.add(Method::GET, "/assets/*", tagged("assets"));
        router.add(Method::GET, "/assets/img/*", tagged("img"));

        assert_eq!(
            body_of(&router, Method::GET, "/assets/img/logo.png"),
            Some(b"img".to_vec())
        );
        assert_eq!(
            body_of(&router, Method::GET, "/assets/app.css"),
            Some(b"assets".to_vec())
        );
        assert_eq!(
            body_of(&router, Method::GET, "/other"),
            Some(b"root".to_vec())
        );
    }

    #[test]
    fn method_mismatch_does_not_match() {
        let mut router = Router::new();
        router.add(Method::GET, "/hello", tagged("get"));

        assert!(router.find(&Method::POST, "/hello").is_none());
        assert!(router.find(&Method::GET, "/goodbye").is_none());
    }

    #[test]
    fn handlers_see_the_request() {
        let mut router = Router::new();
        router.add(
            Method::GET,
            "/echo/*",
            Box::new(|req: &Request| Response::ok(req.path.clone().into_bytes())),
        );

        let found = body_of(&router, Method::GET, "/echo/abc");
        assert_eq!(found, Some(b"/echo/abc".to_vec()));
    }
}
