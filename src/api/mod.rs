//! HTTP API module
//!
//! The panel front end talks to the engines through these endpoints and
//! follows render events on `/events`.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(list_timers_handler).post(add_timer_handler))
        .route("/timers/:id", delete(delete_timer_handler))
        .route("/timers/:id/toggle", post(toggle_timer_handler))
        .route("/timers/:id/reset", post(reset_timer_handler))
        .route("/alarms", get(list_alarms_handler).post(add_alarm_handler))
        .route("/alarms/:id", delete(delete_alarm_handler))
        .route("/alarms/:id/enabled", post(toggle_alarm_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
