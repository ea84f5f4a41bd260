//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod panel_ticker;

// Re-export main functions
pub use panel_ticker::panel_tick_task;
