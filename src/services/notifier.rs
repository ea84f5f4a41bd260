//! Desktop notification delivery

use std::fmt;

use tokio::{process::Command, runtime::Handle};
use tracing::{debug, info, warn};

/// Notification urgency, as understood by `notify-send -u`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    Normal,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::Critical => "critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for user-facing notifications.
///
/// Delivery is best-effort: implementations must return immediately and
/// never report failures back to the engines.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str, urgency: Urgency);
}

/// Sends notifications through the `notify-send` command
#[derive(Debug, Clone)]
pub struct NotifySend {
    icon: String,
}

impl NotifySend {
    pub fn new() -> Self {
        Self {
            icon: "alarm-symbolic".to_string(),
        }
    }
}

impl NotifySend {
    /// Options first, then `--` so a label like `-u` stays a positional
    fn args<'a>(&'a self, title: &'a str, body: &'a str, urgency: Urgency) -> [&'a str; 7] {
        ["-i", self.icon.as_str(), "-u", urgency.as_str(), "--", title, body]
    }
}

impl Default for NotifySend {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifySend {
    fn notify(&self, title: &str, body: &str, urgency: Urgency) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime, dropping notification \"{}\"", title);
                return;
            }
        };

        let mut command = Command::new("notify-send");
        command.args(self.args(title, body, urgency));
        let title = title.to_string();

        handle.spawn(async move {
            match command.output().await {
                Ok(output) if output.status.success() => {
                    debug!("Notification \"{}\" delivered", title);
                }
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!("notify-send failed: {}", stderr);
                }
                Err(e) => warn!("Failed to execute notify-send: {}", e),
            }
        });
    }
}

/// Writes notifications to the log only, for headless hosts
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str, urgency: Urgency) {
        info!("[{}] {}: {}", urgency, title, body);
    }
}
