//! Clock alarm engine

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, info, warn};

use crate::{
    services::{store, Notifier, Presenter, Urgency},
    state::Alarm,
};

/// How often an alarm may ring during its matching minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlarmRefire {
    /// Ring on every check that falls inside the minute
    #[default]
    EveryTick,
    /// Ring at most once per alarm per calendar minute
    OncePerMinute,
}

pub struct AlarmEngine {
    alarms: Vec<Alarm>,
    path: PathBuf,
    notifier: Arc<dyn Notifier>,
    presenter: Arc<dyn Presenter>,
    refire: AlarmRefire,
    /// Minute each alarm last rang in, only tracked for `OncePerMinute`
    last_fired: HashMap<String, (NaiveDate, u32, u32)>,
}

impl AlarmEngine {
    pub fn new(
        path: PathBuf,
        notifier: Arc<dyn Notifier>,
        presenter: Arc<dyn Presenter>,
        refire: AlarmRefire,
    ) -> Self {
        Self {
            alarms: Vec::new(),
            path,
            notifier,
            presenter,
            refire,
            last_fired: HashMap::new(),
        }
    }

    /// Replace the in-memory list with the persisted one, enabled flags included
    pub fn restore_all(&mut self) {
        self.alarms = store::load(&self.path);
        self.last_fired.clear();

        for alarm in &self.alarms {
            self.presenter.render_alarm_added(alarm);
        }

        info!("Restored {} alarms from {}", self.alarms.len(), self.path.display());
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn get(&self, id: &str) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    /// Add an enabled alarm. Out-of-range times are rejected.
    pub fn add_alarm(&mut self, hours: u32, minutes: u32, label: &str) -> Option<Alarm> {
        let Some(alarm) = Alarm::new(hours, minutes, label) else {
            debug!("Rejected alarm at {}:{}", hours, minutes);
            return None;
        };

        info!("Adding alarm {} ({}) at {}", alarm.id, alarm.label, alarm.display_time());
        self.alarms.push(alarm.clone());
        self.persist();
        self.presenter.render_alarm_added(&alarm);
        Some(alarm)
    }

    pub fn toggle_enabled(&mut self, id: &str, enabled: bool) -> Option<Alarm> {
        let alarm = self.alarms.iter_mut().find(|a| a.id == id)?;
        alarm.enabled = enabled;
        let alarm = alarm.clone();
        info!("Alarm {} {}", id, if enabled { "enabled" } else { "disabled" });

        self.persist();
        self.presenter.render_alarm_updated(&alarm);
        Some(alarm)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.alarms.len();
        self.alarms.retain(|a| a.id != id);
        if self.alarms.len() == before {
            return false;
        }

        self.last_fired.remove(id);
        info!("Alarm {} deleted", id);
        self.persist();
        self.presenter.render_alarm_removed(id);
        true
    }

    /// Compare the local wall clock against every enabled alarm
    pub fn check_tick(&mut self) -> usize {
        self.check_tick_at(Local::now().naive_local())
    }

    /// Ring every enabled alarm set for `now`'s hour and minute.
    ///
    /// Returns the number of notifications sent.
    pub fn check_tick_at(&mut self, now: NaiveDateTime) -> usize {
        let minute = (now.date(), now.hour(), now.minute());
        let mut fired = 0;

        for alarm in &self.alarms {
            if !alarm.matches(minute.1, minute.2) {
                continue;
            }

            if self.refire == AlarmRefire::OncePerMinute {
                if self.last_fired.get(&alarm.id) == Some(&minute) {
                    continue;
                }
                self.last_fired.insert(alarm.id.clone(), minute);
            }

            info!("Alarm {} ({}) ringing", alarm.id, alarm.label);
            self.notifier.notify("Alarm", &alarm.label, Urgency::Critical);
            fired += 1;
        }

        fired
    }

    fn persist(&self) {
        if let Err(e) = store::save(&self.path, &self.alarms) {
            warn!("Failed to persist alarms: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::test_support::{Recorder, Rendered},
        services::store::ALARMS_FILE,
    };

    fn engine(refire: AlarmRefire) -> (AlarmEngine, Arc<Recorder>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Arc::new(Recorder::default());
        let engine = AlarmEngine::new(
            dir.path().join(ALARMS_FILE),
            recorder.clone(),
            recorder.clone(),
            refire,
        );
        (engine, recorder, dir)
    }

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn out_of_range_alarms_are_rejected() {
        let (mut engine, recorder, _dir) = engine(AlarmRefire::EveryTick);

        assert!(engine.add_alarm(24, 0, "x").is_none());
        assert!(engine.add_alarm(0, 60, "x").is_none());
        assert!(engine.alarms().is_empty());
        assert!(!engine.path.exists());
        assert!(recorder.rendered().is_empty());
    }

    #[test]
    fn add_persists_enabled_alarm() {
        let (mut engine, recorder, _dir) = engine(AlarmRefire::EveryTick);

        let alarm = engine.add_alarm(6, 45, "").unwrap();
        assert!(alarm.enabled);
        assert_eq!(alarm.label, "06:45");

        let saved: Vec<Alarm> = store::load(&engine.path);
        assert_eq!(saved, vec![alarm.clone()]);
        assert_eq!(recorder.rendered(), vec![Rendered::AlarmAdded(alarm.id)]);
    }

    #[test]
    fn fires_only_enabled_matching_alarms() {
        let (mut engine, recorder, _dir) = engine(AlarmRefire::EveryTick);
        engine.add_alarm(7, 30, "Wake");
        engine.add_alarm(7, 30, "Also wake");
        let off = engine.add_alarm(7, 30, "Off").unwrap().id;
        engine.add_alarm(7, 31, "Later");
        engine.add_alarm(19, 30, "Evening");
        engine.toggle_enabled(&off, false);

        assert_eq!(engine.check_tick_at(at(7, 30, 0)), 2);
        assert_eq!(
            recorder.notifications(),
            vec![
                ("Alarm".to_string(), "Wake".to_string(), Urgency::Critical),
                ("Alarm".to_string(), "Also wake".to_string(), Urgency::Critical),
            ]
        );
    }

    #[test]
    fn rings_on_every_tick_within_the_minute_by_default() {
        let (mut engine, recorder, _dir) = engine(AlarmRefire::EveryTick);
        engine.add_alarm(7, 30, "Wake");

        engine.check_tick_at(at(7, 30, 0));
        engine.check_tick_at(at(7, 30, 1));
        engine.check_tick_at(at(7, 31, 0));

        assert_eq!(recorder.notifications().len(), 2);
    }

    #[test]
    fn once_per_minute_guard_suppresses_repeats() {
        let (mut engine, recorder, _dir) = engine(AlarmRefire::OncePerMinute);
        engine.add_alarm(7, 30, "Wake");

        assert_eq!(engine.check_tick_at(at(7, 30, 0)), 1);
        assert_eq!(engine.check_tick_at(at(7, 30, 1)), 0);
        assert_eq!(engine.check_tick_at(at(7, 30, 59)), 0);

        let next_day = at(7, 30, 0) + chrono::Duration::days(1);
        assert_eq!(engine.check_tick_at(next_day), 1);
        assert_eq!(recorder.notifications().len(), 2);
    }

    #[test]
    fn firing_does_not_change_the_alarm() {
        let (mut engine, _recorder, _dir) = engine(AlarmRefire::EveryTick);
        let alarm = engine.add_alarm(7, 30, "Wake").unwrap();

        engine.check_tick_at(at(7, 30, 0));
        assert_eq!(engine.get(&alarm.id), Some(&alarm));
    }

    #[test]
    fn toggle_and_delete_persist() {
        let (mut engine, recorder, _dir) = engine(AlarmRefire::EveryTick);
        let id = engine.add_alarm(8, 0, "").unwrap().id;

        let alarm = engine.toggle_enabled(&id, false).unwrap();
        assert!(!alarm.enabled);
        let saved: Vec<Alarm> = store::load(&engine.path);
        assert!(!saved[0].enabled);

        assert!(engine.delete(&id));
        let saved: Vec<Alarm> = store::load(&engine.path);
        assert!(saved.is_empty());
        assert_eq!(recorder.rendered().last(), Some(&Rendered::AlarmRemoved(id.clone())));

        assert!(!engine.delete(&id));
        assert!(engine.toggle_enabled(&id, true).is_none());
    }

    #[test]
    fn restore_keeps_enabled_flags() {
        let (mut engine, recorder, _dir) = engine(AlarmRefire::EveryTick);
        let on = engine.add_alarm(6, 0, "on").unwrap();
        let off = engine.add_alarm(7, 0, "off").unwrap().id;
        engine.toggle_enabled(&off, false);

        let mut restored = AlarmEngine::new(
            engine.path.clone(),
            recorder.clone(),
            recorder.clone(),
            AlarmRefire::EveryTick,
        );
        restored.restore_all();

        assert_eq!(restored.alarms().len(), 2);
        assert_eq!(restored.get(&on.id), Some(&on));
        assert!(!restored.get(&off).unwrap().enabled);
    }
}
