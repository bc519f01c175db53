use time::OffsetDateTime;
use time::macros::format_description;

use crate::http::headers::Headers;

/// HTTP status codes this server emits.
///
/// A closed catalogue: every status the server can produce is listed here
/// together with its numeric code and reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 406 Not Acceptable
    NotAcceptable,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::NotAcceptable => 406,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotAcceptable => "Not Acceptable",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

/// Formats the current instant as an RFC-1123 date in GMT,
/// e.g. "Sun, 06 Nov 1994 08:49:37 GMT".
pub fn http_date() -> String {
    let fmt = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    OffsetDateTime::now_utc().format(&fmt).unwrap_or_default()
}

/// A complete HTTP response, immutable once built.
///
/// Owned by the connection worker until serialized, then discarded.
#[derive(Debug, Clone)]
pub struct Response {
    /// Protocol scheme for the status line, e.g. "HTTP/1.1".
    pub scheme: String,
    pub status: StatusCode,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl Response {
    /// A plain 200 OK response with the given body. Scheme defaults to
    /// HTTP/1.1; Date and Content-Length are stamped by the builder.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new()
            .scheme("HTTP/1.1")
            .status(StatusCode::Ok)
            .body(body.into())
            .build()
            .unwrap_or_else(|_| unreachable!("scheme and status are set"))
    }
}

/// Accumulates response fields and finalizes them into a `Response`.
///
/// `build()` fails if the scheme or status was never set. It stamps the
/// `Date` header (RFC-1123, GMT) and forces `Content-Length` to the exact
/// byte length of the body, so a response is never serialized with a
/// mismatched length.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    scheme: Option<String>,
    status: Option<StatusCode>,
    headers: Headers,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(mut self) -> Result<Response, &'static str> {
        let scheme = self.scheme.ok_or("scheme missing")?;
        let status = self.status.ok_or("status missing")?;

        if !self.headers.contains("Date") {
            self.headers.insert("Date", http_date());
        }
        self.headers
            .insert("Content-Length", self.body.len().to_string());

        Ok(Response {
            scheme,
            status,
            headers: self.headers,
            body: self.body,
        })
    }
}
