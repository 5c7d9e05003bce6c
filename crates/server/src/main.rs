//! # uplift-server
//!
//! Serves a two-model uplift estimator over HTTP.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uplift::{load_bundle, UpliftService};
use uplift_server::{app, config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uplift_server=info,uplift_core=info,tower_http=info".into()),
        )
        .init();

    let config = config::from_env().context("invalid configuration")?;

    // A server without both models must not start
    let bundle = load_bundle(&config.bundle_path).with_context(|| {
        format!(
            "failed to load model bundle from {}",
            config.bundle_path.display()
        )
    })?;
    let service = UpliftService::new(bundle, &config);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .context("invalid HOST:PORT configuration")?;

    tracing::info!(
        "uplift-server v{} serving model '{}' ({} features) on {}",
        env!("CARGO_PKG_VERSION"),
        service.model_id(),
        service.schema().len(),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app(AppState::new(service))).await?;

    Ok(())
}
