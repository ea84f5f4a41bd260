//! 1 Hz heartbeat driving timer countdowns and alarm checks

use std::{sync::Arc, time::Duration};
use chrono::Local;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::state::AppState;

/// Background task that ticks the panel once per second
pub async fn panel_tick_task(state: Arc<AppState>) {
    info!("Starting panel tick task");

    let mut interval = interval(Duration::from_secs(1));
    // A slow disk write delays the next tick rather than bunching them up
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        let now = Local::now().naive_local();
        if let Err(e) = state.with_panel(|panel| panel.tick(now)) {
            error!("Failed to tick panel: {}", e);
        }
    }
}
