//! Countdown timer record

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{services::store::Record, utils::format_hms};

/// A countdown timer as persisted in `timers.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub id: String,
    pub label: String,
    /// Original duration, restored by reset
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub active: bool,
}

impl Timer {
    /// Create a paused timer with a fresh id.
    ///
    /// An empty label is replaced by the duration formatted as `HH:MM:SS`.
    pub fn new(total_seconds: u64, label: &str) -> Self {
        let label = if label.is_empty() {
            format_hms(total_seconds)
        } else {
            label.to_string()
        };

        Self {
            id: Uuid::new_v4().to_string(),
            label,
            total_seconds,
            remaining_seconds: total_seconds,
            active: false,
        }
    }

    /// True once the countdown has run out
    pub fn is_completed(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Remaining time as displayed in the panel
    pub fn display_time(&self) -> String {
        format_hms(self.remaining_seconds)
    }
}

impl Record for Timer {
    fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && self.total_seconds > 0
            && self.remaining_seconds <= self.total_seconds
    }
}
