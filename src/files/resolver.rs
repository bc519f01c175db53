//! Maps request paths to filesystem paths under the web root.
//!
//! Paths are re-composed segment by segment under the web root, with `.`
//! and `..` segments discarded. A textual `./`/`../` check in front of that
//! answers 400 before any filesystem access. Symlinks inside the web root
//! are not specially checked.

use std::path::{Path, PathBuf};

use crate::http::request::Request;
use crate::http::response::StatusCode;

pub const INDEX: &str = "index.html";
pub const BAD_REQUEST_PAGE: &str = "400.html";
pub const NOT_FOUND_PAGE: &str = "404.html";
pub const NOT_ACCEPTABLE_PAGE: &str = "406.html";
pub const NOT_IMPLEMENTED_PAGE: &str = "501.html";

/// The classified status and the file to serve for it (a fallback page for
/// non-200 statuses).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub status: StatusCode,
    pub path: PathBuf,
}

// Keeps only plain segments; empty, `.` and `..` are discarded.
fn sanitize(raw: &str) -> PathBuf {
    let mut resolved = PathBuf::new();
    for segment in raw.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        resolved.push(segment);
    }
    resolved
}

/// Resolves a request to a file under `web_root` and classifies it.
/// Missing `Host` or a `./`/`../` path is a 400; an empty resolution
/// defaults to `index.html`; a missing target is a 404; a directory target
/// is substituted with its `index.html`.
pub fn resolve(request: &Request, web_root: &Path) -> Resolved {
    if !request.headers.contains("Host") {
        return Resolved {
            status: StatusCode::BadRequest,
            path: web_root.join(BAD_REQUEST_PAGE),
        };
    }

    if request.path.contains("./") || request.path.contains("../") {
        return Resolved {
            status: StatusCode::BadRequest,
            path: web_root.join(BAD_REQUEST_PAGE),
        };
    }

    let mut relative = sanitize(&request.path);
    if relative.as_os_str().is_empty() {
        relative = PathBuf::from(INDEX);
    }

    let mut target = web_root.join(relative);
    if !target.exists() {
        return Resolved {
            status: StatusCode::NotFound,
            path: web_root.join(NOT_FOUND_PAGE),
        };
    }

    if target.is_dir() {
        target = target.join(INDEX);
        if !target.exists() {
            return Resolved {
                status: StatusCode::NotFound,
                path: web_root.join(NOT_FOUND_PAGE),
            };
        }
    }

    Resolved {
        status: StatusCode::Ok,
        path: target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::headers::Headers;
    use crate::http::request::Method;

    fn get(path: &str) -> Request {
        let mut headers = Headers::new();
        headers.insert("Host", "localhost");
        Request {
            method: Method::GET,
            path: path.to_string(),
            scheme: "HTTP/1.1".to_string(),
            headers,
            body: None,
        }
    }

    #[test]
    fn sanitize_discards_dot_segments() {
        assert_eq!(sanitize("/a/./b/../c"), PathBuf::from("a/b/c"));
        assert_eq!(sanitize("/"), PathBuf::new());
        assert_eq!(sanitize("/../../etc/passwd"), PathBuf::from("etc/passwd"));
    }

    #[test]
    fn traversal_is_rejected_before_any_lookup() {
        // web root deliberately nonexistent: the textual check must answer
        // before anything touches the filesystem.
        let root = Path::new("/nonexistent-web-root");
        let resolved = resolve(&get("/../../etc/passwd"), root);
        assert_eq!(resolved.status, StatusCode::BadRequest);
        assert_eq!(resolved.path, root.join(BAD_REQUEST_PAGE));
    }

    #[test]
    fn missing_host_is_bad_request() {
        let mut req = get("/");
        req.headers.remove("Host");
        let resolved = resolve(&req, Path::new("/tmp"));
        assert_eq!(resolved.status, StatusCode::BadRequest);
    }

    #[test]
    fn sanitized_path_stays_under_web_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        // Crafted segments that would escape if honored.
        let resolved = resolve(&get("/%2e%2e/secret"), dir.path());
        assert!(resolved.path.starts_with(dir.path()));
    }

    #[test]
    fn empty_path_defaults_to_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "home").unwrap();

        let resolved = resolve(&get("/"), dir.path());
        assert_eq!(resolved.status, StatusCode::Ok);
        assert_eq!(resolved.path, dir.path().join("index.html"));
    }

    #[test]
    fn missing_target_substitutes_404_page() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve(&get("/missing.html"), dir.path());
        assert_eq!(resolved.status, StatusCode::NotFound);
        assert_eq!(resolved.path, dir.path().join(NOT_FOUND_PAGE));
    }

    #[test]
    fn directory_target_substitutes_its_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), "docs").unwrap();

        let resolved = resolve(&get("/docs"), dir.path());
        assert_eq!(resolved.status, StatusCode::Ok);
        assert_eq!(resolved.path, dir.path().join("docs/index.html"));

        // A directory without an index falls back to 404.
        std::fs::create_dir(dir.path().join("empty")).unwrap();
        let resolved = resolve(&get("/empty"), dir.path());
        assert_eq!(resolved.status, StatusCode::NotFound);
    }
}
