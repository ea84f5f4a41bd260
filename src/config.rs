//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::engine::AlarmRefire;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "timers-alarms")]
#[command(about = "Countdown timers and clock alarms for a desktop panel")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the panel API to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding timers.json and alarms.json
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Ring each alarm at most once per matching minute
    #[arg(long)]
    pub alarm_once_per_minute: bool,

    /// Log notifications instead of calling notify-send
    #[arg(long)]
    pub no_notify: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Explicit cache directory, or the platform cache dir
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("timers-alarms")
        })
    }

    pub fn alarm_refire(&self) -> AlarmRefire {
        if self.alarm_once_per_minute {
            AlarmRefire::OncePerMinute
        } else {
            AlarmRefire::EveryTick
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["timers-alarms"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.alarm_refire(), AlarmRefire::EveryTick);
        assert!(config.cache_dir().ends_with("timers-alarms"));
    }

    #[test]
    fn flags() {
        let config = Config::try_parse_from([
            "timers-alarms",
            "-v",
            "--alarm-once-per-minute",
            "--cache-dir",
            "/tmp/panel",
            "--no-notify",
        ])
        .unwrap();
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.alarm_refire(), AlarmRefire::OncePerMinute);
        assert_eq!(config.cache_dir(), PathBuf::from("/tmp/panel"));
        assert!(config.no_notify);
    }
}
