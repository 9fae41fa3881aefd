//! Nag Timer - recurring reminder daemon
//!
//! This is the main entry point for the nag-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use nag_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{alarm_task, requery_log_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("nag_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting nag-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, state_file={}, poll={}ms",
        config.host,
        config.port,
        config.state_file.display(),
        config.poll_ms
    );

    let zone = config.zone()?;
    let state = Arc::new(AppState::open(
        &config.state_file,
        zone,
        config.wake_hold(),
        config.host.clone(),
        config.port,
    )?);

    // Re-install alarms for persisted timers before the first poll
    state.scheduler.restore().await?;

    tokio::spawn(requery_log_task(Arc::clone(&state)));
    tokio::spawn(alarm_task(Arc::clone(&state), config.poll_interval()));

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers                 - List timers");
    info!("  POST   /timers                 - Create a timer");
    info!("  GET    /timers/:id             - Show a timer");
    info!("  PUT    /timers/:id             - Replace timer settings");
    info!("  DELETE /timers/:id             - Delete a timer");
    info!("  POST   /timers/:id/enable      - Arm a timer");
    info!("  POST   /timers/:id/disable     - Disarm a timer");
    info!("  POST   /timers/:id/ack         - Acknowledge the last fire");
    info!("  POST   /timers/:id/night-next  - Treat the next fire as night");
    info!("  POST   /timers/:id/check       - Run a scheduling decision now");
    info!("  GET    /timers/:id/late/:mins  - Lateness condition query");
    info!("  GET    /status                 - Daemon status");
    info!("  GET    /health                 - Health check");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    if let Err(e) = server.await {
        tracing::error!("Server error: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
