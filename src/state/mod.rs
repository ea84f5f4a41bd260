//! State management module
//!
//! This module contains the persisted records and the shared application state.

pub mod alarm;
pub mod app_state;
pub mod timer;

// Re-export main types
pub use alarm::Alarm;
pub use app_state::AppState;
pub use timer::Timer;
