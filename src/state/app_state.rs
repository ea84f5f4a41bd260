//! Main application state shared by the HTTP handlers and the tick task

use std::{
    path::Path,
    sync::{Arc, Mutex},
    time::Instant,
};
use tokio::sync::broadcast;
use tracing::info;

use crate::{
    engine::{AlarmRefire, Panel},
    services::{ChannelPresenter, Notifier, PanelEvent},
};

/// Main application state that owns the panel and its render channel
pub struct AppState {
    /// Timer and alarm engines; every access is serialized through this lock
    pub panel: Mutex<Panel>,
    /// Render events published by the engines
    pub event_tx: broadcast::Sender<PanelEvent>,
    /// Keep the receiver alive to prevent channel closure
    pub _event_rx: broadcast::Receiver<PanelEvent>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    /// Open the panel over `cache_dir` and wire its render calls to a channel
    pub fn new(
        cache_dir: &Path,
        notifier: Arc<dyn Notifier>,
        refire: AlarmRefire,
        port: u16,
        host: String,
    ) -> Self {
        let (event_tx, event_rx) = broadcast::channel(100);
        let presenter = Arc::new(ChannelPresenter::new(event_tx.clone()));

        let panel = Panel::open(cache_dir, notifier, presenter, refire);
        info!(
            "Panel opened with {} timers and {} alarms",
            panel.timers().timers().len(),
            panel.alarms().alarms().len()
        );

        Self {
            panel: Mutex::new(panel),
            event_tx,
            _event_rx: event_rx,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Run `f` with exclusive access to the panel
    pub fn with_panel<R, F>(&self, f: F) -> Result<R, String>
    where
        F: FnOnce(&mut Panel) -> R,
    {
        let mut panel = self.panel.lock()
            .map_err(|e| format!("Failed to lock panel: {}", e))?;
        Ok(f(&mut panel))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
