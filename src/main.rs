use courier::config::Config;
use courier::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();

    if !cfg.directory.is_dir() {
        tracing::warn!(
            directory = %cfg.directory.display(),
            "Serving directory does not exist, file requests will fail"
        );
    }

    server::listener::run(&cfg, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}
