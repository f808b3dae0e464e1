use necko3_supply::config::Settings;
use necko3_supply::{api, AppState};
use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = env::var("RUST_LOG")
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let settings = Settings::from_env()?;
    info!(
        port = settings.port,
        window = ?settings.rate_limit.window,
        max_requests = settings.rate_limit.max_requests,
        cache_ttl = ?settings.cache_ttl,
        "starting supply api"
    );

    let (state, janitor) = AppState::init(&settings)?;

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, settings.port));
    let listener = TcpListener::bind(addr).await?;

    api::serve(listener, state, shutdown_signal()).await?;

    janitor.abort();
    info!("supply api stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c, graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
}
