//! Timers & Alarms - countdown timers and clock alarms for a desktop panel
//!
//! This library provides the timer and alarm lifecycle engines, their flat-file
//! persistence, and an HTTP adapter the panel front end talks to.

pub mod config;
pub mod engine;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{AlarmEngine, AlarmRefire, Panel, TimerEngine};
pub use state::{Alarm, AppState, Timer};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
