//! Clock alarm record

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{services::store::Record, utils::format_hm};

/// A daily wall-clock alarm as persisted in `alarms.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: String,
    pub label: String,
    pub hours: u32,
    pub minutes: u32,
    pub enabled: bool,
}

impl Alarm {
    /// Create an enabled alarm, or `None` when the time is out of range
    pub fn new(hours: u32, minutes: u32, label: &str) -> Option<Self> {
        if hours > 23 || minutes > 59 {
            return None;
        }

        let label = if label.is_empty() {
            format_hm(hours, minutes)
        } else {
            label.to_string()
        };

        Some(Self {
            id: Uuid::new_v4().to_string(),
            label,
            hours,
            minutes,
            enabled: true,
        })
    }

    /// Whether the alarm should ring at the given wall-clock hour and minute
    pub fn matches(&self, hour: u32, minute: u32) -> bool {
        self.enabled && self.hours == hour && self.minutes == minute
    }

    pub fn display_time(&self) -> String {
        format_hm(self.hours, self.minutes)
    }
}

impl Record for Alarm {
    fn is_valid(&self) -> bool {
        !self.id.is_empty() && self.hours <= 23 && self.minutes <= 59
    }
}
