//! The timers-and-alarms panel: both engines plus the raw user intents

use std::{path::Path, str::FromStr, sync::Arc};

use chrono::NaiveDateTime;
use tracing::debug;

use super::{AlarmEngine, AlarmRefire, TimerEngine};
use crate::{
    services::{
        store::{ALARMS_FILE, TIMERS_FILE},
        Notifier, Presenter,
    },
    state::{Alarm, Timer},
};

pub struct Panel {
    timers: TimerEngine,
    alarms: AlarmEngine,
}

impl Panel {
    /// Build both engines over `cache_dir` and restore their saved lists
    pub fn open(
        cache_dir: &Path,
        notifier: Arc<dyn Notifier>,
        presenter: Arc<dyn Presenter>,
        refire: AlarmRefire,
    ) -> Self {
        let mut timers = TimerEngine::new(
            cache_dir.join(TIMERS_FILE),
            Arc::clone(&notifier),
            Arc::clone(&presenter),
        );
        let mut alarms = AlarmEngine::new(cache_dir.join(ALARMS_FILE), notifier, presenter, refire);

        timers.restore_all();
        alarms.restore_all();

        Self { timers, alarms }
    }

    pub fn timers(&self) -> &TimerEngine {
        &self.timers
    }

    pub fn alarms(&self) -> &AlarmEngine {
        &self.alarms
    }

    /// The 1 Hz heartbeat: alarm check, then one tick per running timer
    pub fn tick(&mut self, now: NaiveDateTime) {
        self.alarms.check_tick_at(now);
        self.timers.run_due_ticks();
    }

    /// Add a timer from the text of the duration fields. Empty fields count as zero.
    pub fn on_add_timer(&mut self, hours: &str, minutes: &str, seconds: &str, label: &str) -> Option<Timer> {
        let hours = parse_field(hours)?;
        let minutes = parse_field(minutes)?;
        let seconds = parse_field(seconds)?;
        self.timers.add_timer(hours, minutes, seconds, label)
    }

    pub fn on_toggle_timer(&mut self, id: &str) -> Option<Timer> {
        self.timers.toggle(id)
    }

    pub fn on_reset_timer(&mut self, id: &str) -> Option<Timer> {
        self.timers.reset(id)
    }

    pub fn on_delete_timer(&mut self, id: &str) -> bool {
        self.timers.delete(id)
    }

    pub fn on_add_alarm(&mut self, hours: &str, minutes: &str, label: &str) -> Option<Alarm> {
        let hours = parse_field(hours)?;
        let minutes = parse_field(minutes)?;
        self.alarms.add_alarm(hours, minutes, label)
    }

    pub fn on_toggle_alarm(&mut self, id: &str, enabled: bool) -> Option<Alarm> {
        self.alarms.toggle_enabled(id, enabled)
    }

    pub fn on_delete_alarm(&mut self, id: &str) -> bool {
        self.alarms.delete(id)
    }
}

fn parse_field<T: FromStr + Default>(text: &str) -> Option<T> {
    let text = text.trim();
    if text.is_empty() {
        return Some(T::default());
    }

    match text.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("Ignoring non-numeric input {:?}", text);
            None
        }
    }
}
