use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

// beefdeets engine
//
// Stays deliberately small:
//   - Serve one status page plus its script and stylesheet
//   - Translate JSON endpoints into `deadbeef` command line calls
//   - Bind wherever it's told; put a reverse proxy in front for TLS/auth

use beefdeets::config::Config;
use beefdeets::http::{build_router, placeholder_cover, AppState};
use beefdeets::Player;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::parse();

    // Don't accept connections we can't serve.
    config.validate()?;

    let player = Player::new(&config.player, config.timeout());
    let placeholder = placeholder_cover().context("rendering placeholder cover")?;
    let state = AppState::new(player, placeholder);

    let app = build_router(state, &config.static_dir);

    let addr = config.bind_addr();
    info!(
        "beefdeets starting on http://{addr} (player: {})",
        config.player.display()
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async { tokio::signal::ctrl_c().await.ok(); };

    #[cfg(unix)]
    let term = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("cannot install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let term = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = term => {},
    }

    warn!("Shutdown signal received.");
}
