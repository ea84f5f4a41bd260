//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response structure for intent endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            data,
        }
    }
}

/// A form field as typed by the user: either raw text or a JSON number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldText {
    Text(String),
    Number(i64),
}

impl FieldText {
    pub fn as_text(&self) -> String {
        match self {
            FieldText::Text(text) => text.clone(),
            FieldText::Number(n) => n.to_string(),
        }
    }
}

impl Default for FieldText {
    fn default() -> Self {
        FieldText::Text(String::new())
    }
}

/// Body of POST /timers
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddTimerRequest {
    pub hours: FieldText,
    pub minutes: FieldText,
    pub seconds: FieldText,
    pub label: String,
}

/// Body of POST /alarms
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddAlarmRequest {
    pub hours: FieldText,
    pub minutes: FieldText,
    pub label: String,
}

/// Body of POST /alarms/:id/enabled
#[derive(Debug, Clone, Deserialize)]
pub struct SetEnabledRequest {
    pub enabled: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok(uptime: String) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
        }
    }
}
