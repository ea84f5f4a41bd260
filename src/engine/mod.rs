//! Timer and alarm lifecycle engines
//!
//! Engines are plain single-threaded state owners. They persist after every
//! mutation and report changes through the injected presenter.

pub mod alarm_engine;
pub mod panel;
pub mod timer_engine;

pub use alarm_engine::{AlarmEngine, AlarmRefire};
pub use panel::Panel;
pub use timer_engine::{TickHandle, TickOutcome, TimerEngine};
