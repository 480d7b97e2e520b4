use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::router::Router;

/// Pause after a failed accept so persistent errors (descriptor exhaustion)
/// do not spin the loop.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn run<F>(cfg: &Config, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Server is running on http://{}", cfg.listen_addr);

    serve(listener, Arc::new(Router::new(cfg)), shutdown).await
}

/// Accept connections until `shutdown` resolves, handing each one to its own
/// task.
///
/// Accept failures are logged and do not stop the loop. Once shutdown is
/// signalled the listening socket is closed and the call returns after every
/// in-flight connection has finished on its own.
pub async fn serve<F>(
    listener: TcpListener,
    router: Arc<Router>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::error!("Failed to accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                        continue;
                    }
                };
                info!("Accepted connection from {}", peer);

                connections.spawn(handle(socket, peer, router.clone()));
            }

            Some(joined) = connections.join_next(), if !connections.is_empty() => {
                if let Err(e) = joined {
                    tracing::error!("Connection task failed: {}", e);
                }
            }

            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    drop(listener);

    if !connections.is_empty() {
        info!(in_flight = connections.len(), "Waiting for open connections to finish");
    }
    while connections.join_next().await.is_some() {}

    info!("Server stopped");
    Ok(())
}

async fn handle(socket: TcpStream, peer: SocketAddr, router: Arc<Router>) {
    let mut conn = Connection::new(socket, router);
    if let Err(e) = conn.run().await {
        tracing::error!("Connection error from {}: {}", peer, e);
    }
}
