use crate::http::headers::Headers;
use crate::http::request::{Method, Request};

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// More bytes are needed before a complete request can be parsed.
    Incomplete,
    /// The request line is absent or has fewer than three tokens.
    MalformedRequestLine,
    /// A header line has no colon separator.
    MalformedHeader,
    /// Content-Length is present but not a number.
    InvalidContentLength,
    /// The head of the request is not valid UTF-8.
    InvalidEncoding,
}

/// Parses one HTTP request from the front of `buf`, returning the request
/// and the bytes consumed. `Incomplete` asks the caller to read more; every
/// other error is terminal. A body is read only when Content-Length is
/// present and the method carries one; chunked transfer-encoding is treated
/// as no body.
pub fn parse_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let headers_end = find_headers_end(buf).ok_or(ParseError::Incomplete)?;
    let head = std::str::from_utf8(&buf[..headers_end]).map_err(|_| ParseError::InvalidEncoding)?;

    let mut lines = head.split("\r\n");

    // Request line: method SP path SP scheme.
    let request_line = lines.next().ok_or(ParseError::MalformedRequestLine)?;
    let mut tokens = request_line.split_whitespace();
    let method = tokens.next().ok_or(ParseError::MalformedRequestLine)?;
    let path = tokens.next().ok_or(ParseError::MalformedRequestLine)?;
    let scheme = tokens.next().ok_or(ParseError::MalformedRequestLine)?;

    let method = Method::from_token(method);

    let mut headers = Headers::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once(':').ok_or(ParseError::MalformedHeader)?;
        headers.insert(key, value);
    }

    let body_bytes = &buf[headers_end + 4..];

    let content_length = match headers.get("Content-Length") {
        Some(v) if method.carries_body() => v
            .trim()
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidContentLength)?,
        _ => 0,
    };

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let body = if content_length > 0 {
        Some(body_bytes[..content_length].to_vec())
    } else {
        None
    };

    let request = Request {
        method,
        path: path.to_string(),
        scheme: scheme.to_string(),
        headers,
        body,
    };

    Ok((request, headers_end + 4 + content_length))
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
