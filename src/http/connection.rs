use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::files;
use crate::files::resolver::{BAD_REQUEST_PAGE, NOT_IMPLEMENTED_PAGE};
use crate::http::parser::{ParseError, parse_request};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::router::Router;

// A parsed request, EOF before one completed, or a request that outgrew
// `max_request_size` while still incomplete.
enum ReadOutcome {
    Complete(Request),
    Closed,
    TooLarge,
}

/// Owns one accepted connection end-to-end: read, parse, route, handle,
/// serialize, flush, close. One request per connection.
pub struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
    config: Arc<ServerConfig>,
    router: Arc<Router>,
    custom_routes: bool,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        config: Arc<ServerConfig>,
        router: Arc<Router>,
        custom_routes: bool,
    ) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            config,
            router,
            custom_routes,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        // A parse failure or early EOF closes the connection without a
        // response.
        let request = match self.read_request().await? {
            ReadOutcome::Complete(request) => request,
            ReadOutcome::Closed => return Ok(()),
            ReadOutcome::TooLarge => {
                let response =
                    files::status_page(StatusCode::BadRequest, BAD_REQUEST_PAGE, &self.config)
                        .await;
                let mut writer = ResponseWriter::new(&response, &self.config.name);
                writer.write_to_stream(&mut self.stream).await?;
                info!(
                    limit = self.config.max_request_size,
                    "request exceeded size limit"
                );
                return Ok(());
            }
        };

        let response = self.dispatch(&request).await;

        let mut writer = ResponseWriter::new(&response, &self.config.name);
        writer.write_to_stream(&mut self.stream).await?;

        info!(
            method = request.method.as_str(),
            path = %request.path,
            status = response.status.as_u16(),
            "request served"
        );
        Ok(())
    }

    // Reads from the socket until one complete request has been parsed.
    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        loop {
            match parse_request(&self.buffer) {
                Ok((request, _consumed)) => return Ok(ReadOutcome::Complete(request)),
                Err(ParseError::Incomplete) => {}
                Err(e) => return Err(anyhow::anyhow!("malformed request: {:?}", e)),
            }

            if self.buffer.len() > self.config.max_request_size {
                return Ok(ReadOutcome::TooLarge);
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;
            if n == 0 {
                return Ok(ReadOutcome::Closed);
            }
        }
    }

    // User handlers first (when custom mapping is enabled), then the
    // built-in static handler for GET/POST, 501 otherwise.
    async fn dispatch(&self, request: &Request) -> Response {
        if self.custom_routes {
            if let Some(handler) = self.router.find(&request.method, &request.path) {
                return match catch_unwind(AssertUnwindSafe(|| handler(request))) {
                    Ok(response) => response,
                    Err(_) => {
                        error!(path = %request.path, "handler panicked");
                        files::internal_error()
                    }
                };
            }
        }

        match request.method {
            Method::GET | Method::POST => files::serve(request, &self.config).await,
            _ => {
                files::status_page(StatusCode::NotImplemented, NOT_IMPLEMENTED_PAGE, &self.config)
                    .await
            }
        }
    }
}
