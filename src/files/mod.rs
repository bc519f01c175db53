//! Built-in static file serving: resolver, reader, and the fallback pages
//! (`400.html`, `404.html`, `406.html`, `501.html`) served verbatim for
//! their status codes.

pub mod reader;
pub mod resolver;

use std::path::Path;

use tracing::error;

use crate::config::ServerConfig;
use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};

const SCHEME: &str = "HTTP/1.1";

/// Serves a request from the web root: resolve, read, respond.
pub async fn serve(request: &Request, config: &ServerConfig) -> Response {
    let resolved = resolver::resolve(request, &config.web_root);
    respond_with_file(resolved.status, &resolved.path, config).await
}

/// Serves one of the fallback pages under the web root for the given status.
pub async fn status_page(status: StatusCode, page: &str, config: &ServerConfig) -> Response {
    respond_with_file(status, &config.web_root.join(page), config).await
}

async fn respond_with_file(status: StatusCode, path: &Path, config: &ServerConfig) -> Response {
    let body = match reader::read_all(path, config.read_strategy, config.max_file_size).await {
        Ok(body) => body,
        Err(e) => {
            error!("failed to read {}: {}", path.display(), e);
            return internal_error();
        }
    };

    ResponseBuilder::new()
        .scheme(SCHEME)
        .status(status)
        .header("Content-Type", mime::from_path(path))
        .body(body)
        .build()
        .unwrap_or_else(|_| internal_error())
}

/// Last-resort 500; there is no `500.html` in the fallback set, so the
/// body is inline.
pub fn internal_error() -> Response {
    let resp = ResponseBuilder::new()
        .scheme(SCHEME)
        .status(StatusCode::InternalServerError)
        .header("Content-Type", "text/plain")
        .body(b"500 Internal Server Error".to_vec())
        .build();
    match resp {
        Ok(resp) => resp,
        Err(_) => unreachable!("internal error response is fully specified"),
    }
}

/// Helper for handlers that answer with JSON. The client must accept
/// `application/json` (or `*/*`), otherwise the reply is a 406 served from
/// `406.html`.
pub struct JsonResponse {
    body: Option<String>,
}

impl JsonResponse {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }

    pub fn empty() -> Self {
        Self { body: None }
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    /// Whether the request declares it accepts a JSON reply.
    pub fn acceptable(request: &Request) -> bool {
        match request.header("Accept") {
            Some(accept) => accept.contains("application/json") || accept.contains("*/*"),
            None => false,
        }
    }

    pub fn into_response(self, request: &Request, config: &ServerConfig) -> Response {
        if !Self::acceptable(request) {
            let page = config.web_root.join(resolver::NOT_ACCEPTABLE_PAGE);
            let body = std::fs::read(&page).unwrap_or_else(|_| b"406 Not Acceptable".to_vec());
            let content_type = mime::from_path(&page);
            let resp = ResponseBuilder::new()
                .scheme(SCHEME)
                .status(StatusCode::NotAcceptable)
                .header("Content-Type", content_type)
                .body(body)
                .build();
            return resp.unwrap_or_else(|_| internal_error());
        }

        let body = self.body.unwrap_or_else(|| {
            error!("JSON response body was never set; serving a generated placeholder");
            r#"{"error": {"title": "Null Body", "detail": "The handler did not set a JSON body."}}"#
                .to_string()
        });

        ResponseBuilder::new()
            .scheme(SCHEME)
            .status(StatusCode::Ok)
            .header("Content-Type", "application/json")
            .body(body.into_bytes())
            .build()
            .unwrap_or_else(|_| internal_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::headers::Headers;
    use crate::http::request::Method;

    fn request_accepting(accept: Option<&str>) -> Request {
        let mut headers = Headers::new();
        headers.insert("Host", "localhost");
        if let Some(accept) = accept {
            headers.insert("Accept", accept);
        }
        Request {
            method: Method::GET,
            path: "/api".to_string(),
            scheme: "HTTP/1.1".to_string(),
            headers,
            body: None,
        }
    }

    #[test]
    fn json_acceptance() {
        assert!(JsonResponse::acceptable(&request_accepting(Some(
            "application/json"
        ))));
        assert!(JsonResponse::acceptable(&request_accepting(Some("*/*"))));
        assert!(!JsonResponse::acceptable(&request_accepting(Some(
            "text/html"
        ))));
        assert!(!JsonResponse::acceptable(&request_accepting(None)));
    }

    #[test]
    fn unacceptable_request_gets_406() {
        let config = ServerConfig::default();
        let json = JsonResponse::new(r#"{"ok": true}"#);
        let resp = json.into_response(&request_accepting(Some("text/html")), &config);
        assert_eq!(resp.status, StatusCode::NotAcceptable);
    }

    #[test]
    fn missing_body_is_replaced_with_placeholder() {
        let config = ServerConfig::default();
        let resp =
            JsonResponse::empty().into_response(&request_accepting(Some("*/*")), &config);
        assert_eq!(resp.status, StatusCode::Ok);
        assert_eq!(
            resp.headers.get("Content-Type"),
            Some("application/json")
        );
        assert!(!resp.body.is_empty());
    }
}
