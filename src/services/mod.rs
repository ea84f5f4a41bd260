//! Collaborators around the engines
//!
//! This module contains the flat-file store, notification delivery and the
//! presentation interface.

pub mod notifier;
pub mod presenter;
pub mod store;

// Re-export main types
pub use notifier::{LogNotifier, Notifier, NotifySend, Urgency};
pub use presenter::{ChannelPresenter, PanelEvent, Presenter};
