//! Presentation layer interface

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::state::{Alarm, Timer};

/// Render callbacks the engines issue after each state change
pub trait Presenter: Send + Sync {
    fn render_timer_added(&self, timer: &Timer);
    fn render_timer_updated(&self, timer: &Timer);
    fn render_timer_removed(&self, id: &str);
    fn render_alarm_added(&self, alarm: &Alarm);
    fn render_alarm_updated(&self, alarm: &Alarm);
    fn render_alarm_removed(&self, id: &str);
}

/// A single render call, as streamed to panel clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PanelEvent {
    TimerAdded { timer: Timer },
    TimerUpdated { timer: Timer },
    TimerRemoved { id: String },
    AlarmAdded { alarm: Alarm },
    AlarmUpdated { alarm: Alarm },
    AlarmRemoved { id: String },
}

/// Presenter that publishes every render call on a broadcast channel
#[derive(Debug, Clone)]
pub struct ChannelPresenter {
    tx: broadcast::Sender<PanelEvent>,
}

impl ChannelPresenter {
    pub fn new(tx: broadcast::Sender<PanelEvent>) -> Self {
        Self { tx }
    }

    fn publish(&self, event: PanelEvent) {
        // No subscribers is the normal state when no panel is attached
        if let Err(e) = self.tx.send(event) {
            debug!("Render event dropped: {}", e);
        }
    }
}

impl Presenter for ChannelPresenter {
    fn render_timer_added(&self, timer: &Timer) {
        self.publish(PanelEvent::TimerAdded { timer: timer.clone() });
    }

    fn render_timer_updated(&self, timer: &Timer) {
        self.publish(PanelEvent::TimerUpdated { timer: timer.clone() });
    }

    fn render_timer_removed(&self, id: &str) {
        self.publish(PanelEvent::TimerRemoved { id: id.to_string() });
    }

    fn render_alarm_added(&self, alarm: &Alarm) {
        self.publish(PanelEvent::AlarmAdded { alarm: alarm.clone() });
    }

    fn render_alarm_updated(&self, alarm: &Alarm) {
        self.publish(PanelEvent::AlarmUpdated { alarm: alarm.clone() });
    }

    fn render_alarm_removed(&self, id: &str) {
        self.publish(PanelEvent::AlarmRemoved { id: id.to_string() });
    }
}
