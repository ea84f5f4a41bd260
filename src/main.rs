//! Timers & Alarms - countdown timers and clock alarms for a desktop panel
//!
//! This is the main entry point for the timers-alarms service.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use timers_alarms::{
    config::Config,
    services::{LogNotifier, Notifier, NotifySend},
    state::AppState,
    api::create_router,
    tasks::panel_tick_task,
    utils::shutdown_signal,
};

// One thread runs the tick task and every intent, so callbacks never overlap
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timers_alarms={},tower_http=info", config.log_level()))
        .init();

    let cache_dir = config.cache_dir();
    info!("Starting timers-alarms v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, cache_dir={}, refire={:?}",
          config.host, config.port, cache_dir.display(), config.alarm_refire());

    let notifier: Arc<dyn Notifier> = if config.no_notify {
        Arc::new(LogNotifier)
    } else {
        Arc::new(NotifySend::new())
    };

    // Restores saved timers (paused) and alarms
    let state = Arc::new(AppState::new(
        &cache_dir,
        notifier,
        config.alarm_refire(),
        config.port,
        config.host.clone(),
    ));

    // Start the 1 Hz panel heartbeat
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        panel_tick_task(tick_state).await;
    });

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Panel API running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET/POST /timers              - List or add timers");
    info!("  POST     /timers/:id/toggle   - Start or pause a timer");
    info!("  POST     /timers/:id/reset    - Reset a timer");
    info!("  DELETE   /timers/:id          - Delete a timer");
    info!("  GET/POST /alarms              - List or add alarms");
    info!("  POST     /alarms/:id/enabled  - Enable or disable an alarm");
    info!("  DELETE   /alarms/:id          - Delete an alarm");
    info!("  GET      /events              - Render event stream");
    info!("  GET      /health              - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
