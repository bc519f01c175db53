use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::http::response::{Response, http_date};

/// Headers the serializer emits itself, in a fixed order. Anything else a
/// handler set is appended after these.
const CANONICAL: [&str; 5] = [
    "server",
    "date",
    "content-type",
    "content-length",
    "connection",
];

fn serialize_response(resp: &Response, server_name: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        resp.scheme,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    let mut push = |line: String| {
        buf.extend_from_slice(line.as_bytes());
        buf.extend_from_slice(b"\r\n");
    };

    push(format!("Server: {}", server_name));

    let date = resp
        .headers
        .get("Date")
        .map(str::to_string)
        .unwrap_or_else(http_date);
    push(format!("Date: {}", date));

    if let Some(content_type) = resp.headers.get("Content-Type") {
        if content_type.starts_with("text/") {
            push(format!("Content-Type: {};charset=\"utf-8\"", content_type));
        } else {
            push(format!("Content-Type: {}", content_type));
        }
    }

    push(format!("Content-Length: {}", resp.body.len()));

    // One request per connection.
    push("Connection: close".to_string());

    for (key, value) in resp.headers.iter() {
        if !CANONICAL.contains(&key) {
            push(format!("{}: {}", key, value));
        }
    }

    buf.extend_from_slice(b"\r\n");
    buf.extend_from_slice(&resp.body);
    buf
}

/// Serializes a response and writes it to the client socket, resuming
/// across partial writes. A zero-length write means the peer closed the
/// connection mid-response.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response, server_name: &str) -> Self {
        Self {
            buffer: serialize_response(response, server_name),
            written: 0,
        }
    }

    /// The full wire image, exposed for round-trip tests.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub async fn write_to_stream(&mut self, stream: &mut TcpStream) -> anyhow::Result<()> {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing response"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
