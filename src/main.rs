use hearth::config::ServerConfig;
use hearth::server::HttpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = ServerConfig::from_env()?;
    let server = HttpServer::new(cfg)?;
    let shutdown = server.shutdown_handle();

    // The server runs in its own task so the signal handler can ask it to
    // stop and then wait for in-flight workers to finish.
    let mut server_task = tokio::spawn(server.start());

    tokio::select! {
        res = &mut server_task => {
            res??;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            shutdown.stop();
            server_task.await??;
        }
    }

    Ok(())
}
