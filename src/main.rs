use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use signal_desk::api::{run_server, AppState};
use signal_desk::config::AppConfig;
use signal_desk::services::engine::SignalEngine;
use signal_desk::services::enrichment::SignalContext;
use signal_desk::services::notifier::Notifier;
use signal_desk::services::refresh::InstrumentRefresher;
use signal_desk::services::sync::MetadataSync;
use signal_desk::transport::feed::SignalFeed;
use signal_desk::transport::metadata::{HttpMetadataClient, MetadataApi};
use signal_desk::EventBus;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load().context("loading configuration")?;

    // Setup Logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Signal Desk...");
    info!("Loaded Configuration: {:?}", config);

    let context = SignalContext::new(&config.pipeline).shared();
    let event_bus = EventBus::new(config.bus_capacity);

    let metadata: Arc<dyn MetadataApi> = Arc::new(
        HttpMetadataClient::new(
            &config.backend.base_url,
            Duration::from_secs(config.backend.request_timeout_secs),
        )
        .context("building metadata client")?,
    );
    let sync = MetadataSync::new(metadata, context.clone());

    // Consumers subscribe before the feed starts publishing
    SignalEngine::new(event_bus.clone(), context.clone()).start();
    Notifier::new(event_bus.clone()).start();

    // Startup metadata calls; failures are already in the status log
    sync.load_instruments().await.ok();
    sync.load_history().await.ok();
    sync.set_interval(config.interval_ms).await.ok();
    if !config.symbols.is_empty() {
        sync.subscribe(&config.symbols).await.ok();
    }

    let _refresh_scheduler = match &config.instrument_refresh_cron {
        Some(schedule) => match InstrumentRefresher::new(sync.clone(), schedule.clone()).start().await {
            Ok(scheduler) => Some(scheduler),
            Err(e) => {
                warn!("⚠️ Failed to start instrument refresh: {:?}", e);
                None
            }
        },
        None => {
            info!("ℹ️ instrument_refresh_cron not set - instrument refresh disabled");
            None
        }
    };

    SignalFeed::new(
        config.backend.feed_url.clone(),
        Duration::from_secs(config.backend.reconnect_delay_secs),
    )
    .start(event_bus.clone());

    info!("Initializing API Server...");
    run_server(Arc::new(AppState { context }), &config.api_bind)
        .await
        .context("running API server")?;

    Ok(())
}
