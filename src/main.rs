use crate::app_config::AppConfig;
use crate::exporter::{Collector, CollectorOptions};
use crate::smartthings::{ApiError, DeviceSource, SmartThingsClient};
use clap::Parser;
use tokio::net::TcpListener;
use tokio_retry::Retry;
use tokio_retry::strategy::{FibonacciBackoff, jitter};
use tracing::{info, instrument, warn};

mod app_config;
mod exporter;
mod extensions;
mod server;
mod smartthings;

#[derive(Parser, Debug)]
#[command(version, about = "Exports SmartThings device state as Prometheus metrics")]
struct Args {
    /// Config file path, `config.*` in the working directory when omitted
    #[arg(short, long, env = "STE_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;

    tracing_subscriber::fmt().with_max_level(config.log().level()).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("✅  Loaded configuration");

    let http_client = smartthings::new_client(&config, env!("CARGO_PKG_VERSION"))?;
    let client = SmartThingsClient::new(http_client, &config);
    probe(&client, &config).await?;

    let collector = Collector::new(client, CollectorOptions::from_config(config.exporter()));
    let app = server::router(collector, config.exporter().scrape_timeout());
    info!("✅  Initialized collector");

    let listener = TcpListener::bind((config.server().address(), config.server().port())).await?;
    info!("🔥 {} is up and running on http://{}", env!("CARGO_PKG_NAME"), listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("👋 {} stopped", env!("CARGO_PKG_NAME"));
    Ok(())
}

/// Fails startup when the API is unreachable or rejects the token.
#[instrument(skip_all)]
async fn probe(client: &SmartThingsClient, config: &AppConfig) -> Result<(), ApiError> {
    let strategy = FibonacciBackoff::from_millis(config.smartthings().retry_ms())
        .map(jitter)
        .take(config.smartthings().startup_attempts().saturating_sub(1));

    info!("Connecting to the SmartThings API...");
    let devices = Retry::start(strategy, move || async move {
        client
            .list_devices()
            .await
            .inspect_err(|e| warn!("⚠️ Unable to list devices: {}", e))
    })
    .await?;

    info!("Connecting to the SmartThings API... OK, {} device(s) found", devices.len());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("⚠️ Unable to listen for the shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutting down...");
}
