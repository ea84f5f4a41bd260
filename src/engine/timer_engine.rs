//! Countdown timer engine
//!
//! Owns the timer list and the table of per-timer tick registrations.
//!
//! ```text
//! Paused <-> Running -> Completed (paused, remaining = 0)
//! ```
//!
//! The engine has no clock of its own: the host calls [`TimerEngine::run_due_ticks`]
//! once per second, which invokes [`TimerEngine::tick`] for every registered timer.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    services::{store, Notifier, Presenter, Urgency},
    state::Timer,
};

/// Identifies one tick registration; never reused within an engine
pub type TickHandle = u64;

/// What the scheduler should do with a registration after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stop,
}

pub struct TimerEngine {
    timers: Vec<Timer>,
    /// Live 1-second registrations keyed by timer id
    ticks: HashMap<String, TickHandle>,
    next_handle: TickHandle,
    path: PathBuf,
    notifier: Arc<dyn Notifier>,
    presenter: Arc<dyn Presenter>,
}

impl TimerEngine {
    /// Create an empty engine persisting to `path`
    pub fn new(path: PathBuf, notifier: Arc<dyn Notifier>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            timers: Vec::new(),
            ticks: HashMap::new(),
            next_handle: 0,
            path,
            notifier,
            presenter,
        }
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// Every restored timer is paused; countdowns never resume on their own.
    pub fn restore_all(&mut self) {
        self.ticks.clear();
        self.timers = store::load(&self.path);

        for timer in &mut self.timers {
            timer.active = false;
        }
        for timer in &self.timers {
            self.presenter.render_timer_added(timer);
        }

        info!("Restored {} timers from {}", self.timers.len(), self.path.display());
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn get(&self, id: &str) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn is_scheduled(&self, id: &str) -> bool {
        self.ticks.contains_key(id)
    }

    /// Number of live tick registrations
    pub fn scheduled_count(&self) -> usize {
        self.ticks.len()
    }

    /// Add a paused timer. Returns `None` when the duration is not positive.
    pub fn add_timer(&mut self, hours: u64, minutes: u64, seconds: u64, label: &str) -> Option<Timer> {
        let total_seconds = hours
            .checked_mul(3600)
            .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(seconds));

        let total_seconds = match total_seconds {
            Some(total) if total > 0 => total,
            _ => {
                debug!("Rejected timer {}h {}m {}s", hours, minutes, seconds);
                return None;
            }
        };

        let timer = Timer::new(total_seconds, label);
        info!("Adding timer {} ({}) for {}s", timer.id, timer.label, total_seconds);

        self.timers.push(timer.clone());
        self.persist();
        self.presenter.render_timer_added(&timer);
        Some(timer)
    }

    /// Start or pause a timer.
    ///
    /// A completed timer stays paused until it is reset.
    pub fn toggle(&mut self, id: &str) -> Option<Timer> {
        let index = self.position(id)?;

        if self.timers[index].active {
            self.pause(index);
        } else if self.timers[index].is_completed() {
            debug!("Timer {} has completed, reset it before starting", id);
            return Some(self.timers[index].clone());
        } else {
            self.timers[index].active = true;
            self.schedule(id);
            info!("Timer {} started", id);
        }

        self.persist();
        let timer = self.timers[index].clone();
        self.presenter.render_timer_updated(&timer);
        Some(timer)
    }

    /// One second elapsed for timer `id`.
    ///
    /// Returns [`TickOutcome::Stop`] on the terminal invocation, after which
    /// the registration is already gone.
    pub fn tick(&mut self, id: &str) -> TickOutcome {
        let index = match self.position(id) {
            Some(index) if self.timers[index].active => index,
            _ => {
                debug!("Stale tick for timer {}", id);
                self.cancel(id);
                return TickOutcome::Stop;
            }
        };

        let timer = &mut self.timers[index];
        timer.remaining_seconds = timer.remaining_seconds.saturating_sub(1);

        if timer.remaining_seconds == 0 {
            timer.active = false;
            let timer = timer.clone();
            self.cancel(id);

            info!("Timer {} ({}) complete", timer.id, timer.label);
            self.notifier.notify("Timer Complete", &timer.label, Urgency::Critical);
            self.persist();
            self.presenter.render_timer_updated(&timer);
            return TickOutcome::Stop;
        }

        let timer = timer.clone();
        self.persist();
        self.presenter.render_timer_updated(&timer);
        TickOutcome::Continue
    }

    /// Dispatch one tick to every registered timer, oldest registration first
    pub fn run_due_ticks(&mut self) {
        let mut due: Vec<(TickHandle, String)> = self
            .ticks
            .iter()
            .map(|(id, handle)| (*handle, id.clone()))
            .collect();
        due.sort_unstable();

        for (_, id) in due {
            self.tick(&id);
        }
    }

    /// Pause if running, then restore the full duration
    pub fn reset(&mut self, id: &str) -> Option<Timer> {
        let index = self.position(id)?;

        if self.timers[index].active {
            self.pause(index);
            self.persist();
        }

        let timer = &mut self.timers[index];
        timer.remaining_seconds = timer.total_seconds;
        let timer = timer.clone();
        info!("Timer {} reset to {}s", id, timer.total_seconds);

        self.persist();
        self.presenter.render_timer_updated(&timer);
        Some(timer)
    }

    /// Remove a timer, cancelling its tick if it is running
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        self.cancel(id);
        self.timers.remove(index);
        info!("Timer {} deleted", id);

        self.persist();
        self.presenter.render_timer_removed(id);
        true
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.timers.iter().position(|t| t.id == id)
    }

    fn pause(&mut self, index: usize) {
        let id = self.timers[index].id.clone();
        self.timers[index].active = false;
        self.cancel(&id);
        info!("Timer {} paused at {}s", id, self.timers[index].remaining_seconds);
    }

    fn schedule(&mut self, id: &str) {
        let handle = self.next_handle;
        self.next_handle += 1;

        if let Some(previous) = self.ticks.insert(id.to_string(), handle) {
            warn!("Timer {} was already scheduled (tick {}), replacing it", id, previous);
        }
        debug!("Registered tick {} for timer {}", handle, id);
    }

    fn cancel(&mut self, id: &str) {
        if let Some(handle) = self.ticks.remove(id) {
            debug!("Cancelled tick {} for timer {}", handle, id);
        }
    }

    fn persist(&self) {
        if let Err(e) = store::save(&self.path, &self.timers) {
            warn!("Failed to persist timers: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::test_support::{Recorder, Rendered},
        services::store::TIMERS_FILE,
    };

    fn engine() -> (TimerEngine, Arc<Recorder>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Arc::new(Recorder::default());
        let engine = TimerEngine::new(
            dir.path().join(TIMERS_FILE),
            recorder.clone(),
            recorder.clone(),
        );
        (engine, recorder, dir)
    }

    fn saved(engine: &TimerEngine) -> Vec<Timer> {
        store::load(&engine.path)
    }

    #[test]
    fn add_creates_paused_timer_and_persists() {
        let (mut engine, recorder, _dir) = engine();

        let timer = engine.add_timer(1, 2, 3, "").unwrap();
        assert_eq!(timer.total_seconds, 3723);
        assert_eq!(timer.remaining_seconds, 3723);
        assert!(!timer.active);
        assert_eq!(timer.label, "01:02:03");

        assert_eq!(saved(&engine), vec![timer.clone()]);
        assert_eq!(recorder.rendered(), vec![Rendered::TimerAdded(timer.id)]);
    }

    #[test]
    fn default_label_uses_normalised_duration() {
        let (mut engine, _recorder, _dir) = engine();
        let timer = engine.add_timer(0, 90, 0, "").unwrap();
        assert_eq!(timer.label, "01:30:00");
    }

    #[test]
    fn zero_duration_is_rejected_without_writing() {
        let (mut engine, recorder, _dir) = engine();

        assert!(engine.add_timer(0, 0, 0, "nothing").is_none());
        assert!(engine.timers().is_empty());
        assert!(!engine.path.exists());
        assert!(recorder.rendered().is_empty());
    }

    #[test]
    fn overflowing_duration_is_rejected() {
        let (mut engine, _recorder, _dir) = engine();
        assert!(engine.add_timer(u64::MAX, 0, 0, "").is_none());
        assert!(engine.timers().is_empty());
    }

    #[test]
    fn toggle_registers_and_cancels_tick() {
        let (mut engine, _recorder, _dir) = engine();
        let id = engine.add_timer(0, 1, 0, "").unwrap().id;

        let started = engine.toggle(&id).unwrap();
        assert!(started.active);
        assert!(engine.is_scheduled(&id));
        assert!(saved(&engine)[0].active);

        let paused = engine.toggle(&id).unwrap();
        assert!(!paused.active);
        assert!(!engine.is_scheduled(&id));
        assert_eq!(engine.scheduled_count(), 0);
        assert!(!saved(&engine)[0].active);
    }

    #[test]
    fn double_toggle_leaves_single_registration() {
        let (mut engine, _recorder, _dir) = engine();
        let id = engine.add_timer(0, 0, 30, "").unwrap().id;

        engine.toggle(&id);
        engine.toggle(&id);
        engine.toggle(&id);
        assert_eq!(engine.scheduled_count(), 1);

        engine.toggle(&id);
        assert_eq!(engine.scheduled_count(), 0);
    }

    #[test]
    fn ticks_count_down_and_complete_once() {
        let (mut engine, recorder, _dir) = engine();
        let id = engine.add_timer(0, 0, 3, "Eggs").unwrap().id;
        engine.toggle(&id);

        assert_eq!(engine.tick(&id), TickOutcome::Continue);
        assert_eq!(engine.get(&id).unwrap().remaining_seconds, 2);
        assert_eq!(engine.tick(&id), TickOutcome::Continue);
        assert_eq!(engine.get(&id).unwrap().remaining_seconds, 1);
        assert!(recorder.notifications().is_empty());

        assert_eq!(engine.tick(&id), TickOutcome::Stop);
        let timer = engine.get(&id).unwrap();
        assert_eq!(timer.remaining_seconds, 0);
        assert!(!timer.active);
        assert!(!engine.is_scheduled(&id));

        // a late tick after completion changes nothing
        assert_eq!(engine.tick(&id), TickOutcome::Stop);
        assert_eq!(
            recorder.notifications(),
            vec![("Timer Complete".to_string(), "Eggs".to_string(), Urgency::Critical)]
        );
        assert_eq!(saved(&engine)[0].remaining_seconds, 0);
    }

    #[test]
    fn completed_timer_cannot_restart_until_reset() {
        let (mut engine, _recorder, _dir) = engine();
        let id = engine.add_timer(0, 0, 1, "").unwrap().id;
        engine.toggle(&id);
        engine.tick(&id);

        let timer = engine.toggle(&id).unwrap();
        assert!(!timer.active);
        assert_eq!(engine.scheduled_count(), 0);

        engine.reset(&id);
        assert!(engine.toggle(&id).unwrap().active);
    }

    #[test]
    fn reset_pauses_and_restores_duration() {
        let (mut engine, recorder, _dir) = engine();
        let id = engine.add_timer(0, 0, 10, "").unwrap().id;
        engine.toggle(&id);
        engine.tick(&id);
        engine.tick(&id);

        let timer = engine.reset(&id).unwrap();
        assert_eq!(timer.remaining_seconds, 10);
        assert!(!timer.active);
        assert!(!engine.is_scheduled(&id));
        assert_eq!(saved(&engine), vec![timer]);
        assert_eq!(recorder.rendered().last(), Some(&Rendered::TimerUpdated(id, 10)));
    }

    #[test]
    fn delete_cancels_running_timer() {
        let (mut engine, recorder, _dir) = engine();
        let keep = engine.add_timer(0, 0, 10, "keep").unwrap().id;
        let gone = engine.add_timer(0, 0, 10, "gone").unwrap().id;
        engine.toggle(&gone);

        assert!(engine.delete(&gone));
        assert_eq!(engine.scheduled_count(), 0);
        assert_eq!(engine.timers().len(), 1);
        assert_eq!(saved(&engine)[0].id, keep);
        assert_eq!(recorder.rendered().last(), Some(&Rendered::TimerRemoved(gone.clone())));

        assert!(!engine.delete(&gone));
        assert_eq!(engine.tick(&gone), TickOutcome::Stop);
    }

    #[test]
    fn run_due_ticks_only_advances_running_timers() {
        let (mut engine, _recorder, _dir) = engine();
        let running = engine.add_timer(0, 0, 5, "").unwrap().id;
        let idle = engine.add_timer(0, 0, 5, "").unwrap().id;
        engine.toggle(&running);

        engine.run_due_ticks();
        engine.run_due_ticks();

        assert_eq!(engine.get(&running).unwrap().remaining_seconds, 3);
        assert_eq!(engine.get(&idle).unwrap().remaining_seconds, 5);
    }

    #[test]
    fn restore_pauses_everything() {
        let (mut engine, recorder, _dir) = engine();
        let id = engine.add_timer(0, 0, 20, "Tea").unwrap().id;
        engine.toggle(&id);
        engine.tick(&id);

        let mut restored = TimerEngine::new(engine.path.clone(), recorder.clone(), recorder.clone());
        restored.restore_all();

        let timer = restored.get(&id).unwrap();
        assert!(!timer.active);
        assert_eq!(timer.remaining_seconds, 19);
        assert_eq!(restored.scheduled_count(), 0);
    }

    #[test]
    fn engines_keep_separate_registrations() {
        let (mut a, _ra, _da) = engine();
        let (mut b, _rb, _db) = engine();
        let id = a.add_timer(0, 0, 5, "").unwrap().id;
        a.toggle(&id);

        assert_eq!(a.scheduled_count(), 1);
        assert_eq!(b.scheduled_count(), 0);
        assert_eq!(b.tick(&id), TickOutcome::Stop);
        assert_eq!(a.get(&id).unwrap().remaining_seconds, 5);
    }
}
