use std::fmt;
use std::sync::Arc;

use tokio::net::TcpSocket;
use tokio::sync::{Notify, Semaphore};
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::router::Router;

#[derive(Debug)]
pub enum ServerError {
    /// The listening socket could not be opened (port in use, bad host).
    Bind(std::io::Error),
    /// The configuration cannot produce a runnable server, e.g. the web
    /// root is missing or not a directory.
    Config(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Bind(e) => write!(f, "failed to bind listening socket: {}", e),
            ServerError::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

/// Stops the accept loop; cloneable so callers can keep it across tasks.
#[derive(Clone)]
pub struct ShutdownHandle {
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    /// Signals the server to stop accepting connections. In-flight workers
    /// are allowed to finish; no further connections are admitted.
    pub fn stop(&self) {
        self.notify.notify_one();
    }
}

/// The HTTP origin server: binds, accepts, and hands each connection to a
/// bounded pool of per-connection workers.
///
/// Routes and configuration are fixed once `start()` is called; workers
/// read them concurrently without locking.
pub struct HttpServer {
    config: Arc<ServerConfig>,
    router: Router,
    custom_routes: bool,
    shutdown: Arc<Notify>,
}

impl HttpServer {
    /// Validates the configuration and constructs the server. The web root
    /// must exist and be a directory.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        if !config.web_root.is_dir() {
            return Err(ServerError::Config(format!(
                "web root {} is not a directory",
                config.web_root.display()
            )));
        }

        Ok(Self {
            config: Arc::new(config),
            router: Router::new(),
            custom_routes: true,
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// Registers a user handler for a method and path pattern. Patterns are
    /// exact literals or trailing wildcards, e.g. `"/assets/*"`.
    pub fn add_handler(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Fn(&Request) -> Response + Send + Sync + 'static,
    ) {
        self.router.add(method, pattern, Box::new(handler));
    }

    /// Toggles whether user-registered routes are consulted before the
    /// built-in static file handler. Enabled by default.
    pub fn allow_custom_url_mapping(&mut self, allow: bool) {
        self.custom_routes = allow;
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            notify: Arc::clone(&self.shutdown),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the listening socket and serves until `stop()` is called on a
    /// shutdown handle. Returns once the accept loop has exited and all
    /// in-flight workers have drained.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = resolve_addr(&self.config).await?;

        let socket = match addr {
            std::net::SocketAddr::V4(_) => TcpSocket::new_v4(),
            std::net::SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(ServerError::Bind)?;
        socket.bind(addr).map_err(ServerError::Bind)?;
        let listener = socket
            .listen(self.config.backlog)
            .map_err(ServerError::Bind)?;

        info!("listening on {}", addr);

        let router = Arc::new(self.router);
        let workers = Arc::new(Semaphore::new(self.config.max_workers));

        loop {
            // The permit is taken before accept; connections beyond pool
            // capacity queue at the OS backlog.
            let Ok(permit) = Arc::clone(&workers).acquire_owned().await else {
                break;
            };

            tokio::select! {
                _ = self.shutdown.notified() => {
                    info!("shutdown requested; no further connections admitted");
                    drop(permit);
                    break;
                }
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            error!("accept failed: {}", e);
                            continue;
                        }
                    };
                    info!("accepted connection from {}", peer);

                    let conn = Connection::new(
                        stream,
                        Arc::clone(&self.config),
                        Arc::clone(&router),
                        self.custom_routes,
                    );
                    tokio::spawn(async move {
                        if let Err(e) = conn.run().await {
                            error!("connection error from {}: {}", peer, e);
                        }
                        drop(permit);
                    });
                }
            }
        }

        // Close the listening socket before the drain.
        drop(listener);

        // Reclaiming every permit means every in-flight worker is done.
        let _ = workers.acquire_many(self.config.max_workers as u32).await;
        info!("server stopped");
        Ok(())
    }
}

async fn resolve_addr(config: &ServerConfig) -> Result<std::net::SocketAddr, ServerError> {
    tokio::net::lookup_host(config.listen_addr())
        .await
        .map_err(ServerError::Bind)?
        .next()
        .ok_or_else(|| {
            ServerError::Config(format!("host {} does not resolve", config.host))
        })
}
