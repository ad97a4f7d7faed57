use std::net::SocketAddr;

use anyhow::Context;
use stockroom_api::{app, AppState};
use stockroom_store::app_config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockroom_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Stockroom API on port {}", config.server.port);

    let store = stockroom_store::open_workbook(&config.store)
        .await
        .context("Failed to open workbook")?;

    if config.store.provision_on_startup {
        let report = stockroom_store::provision(store.as_ref(), config.store.seed_sample_products)
            .await
            .context("Failed to provision workbook")?;
        if report.created.is_empty() {
            tracing::info!("Workbook already provisioned");
        } else {
            tracing::info!(
                "Provisioned tables {:?} ({} sample products)",
                report.created,
                report.seeded_products
            );
        }
    }

    let app = app(AppState::new(store, config.defaults.clone()));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
