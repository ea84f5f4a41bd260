//! Display formatting for durations and clock times

/// Format seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Format a wall-clock time as `HH:MM`
pub fn format_hm(hours: u32, minutes: u32) -> String {
    format!("{:02}:{:02}", hours, minutes)
}
