//! HTTP endpoint handlers
//!
//! Each intent handler forwards the raw user input to the panel. Rejected
//! input maps to 422 and unknown ids to 404; nothing else can fail.

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, warn};

use crate::state::{Alarm, AppState, Timer};
use super::responses::{AddAlarmRequest, AddTimerRequest, ApiResponse, HealthResponse, SetEnabledRequest};

fn lock_failed(e: String) -> StatusCode {
    error!("{}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Handle GET /timers
pub async fn list_timers_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Timer>>, StatusCode> {
    state
        .with_panel(|panel| panel.timers().timers().to_vec())
        .map(Json)
        .map_err(lock_failed)
}

/// Handle POST /timers
pub async fn add_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddTimerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Timer>>), StatusCode> {
    let added = state
        .with_panel(|panel| {
            panel.on_add_timer(
                &req.hours.as_text(),
                &req.minutes.as_text(),
                &req.seconds.as_text(),
                &req.label,
            )
        })
        .map_err(lock_failed)?;

    match added {
        Some(timer) => Ok((StatusCode::CREATED, Json(ApiResponse::ok("Timer added", timer)))),
        None => {
            debug!("Add timer rejected: {:?}", req);
            Err(StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

/// Handle POST /timers/:id/toggle
pub async fn toggle_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Timer>>, StatusCode> {
    let timer = state
        .with_panel(|panel| panel.on_toggle_timer(&id))
        .map_err(lock_failed)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let message = if timer.active { "Timer started" } else { "Timer paused" };
    Ok(Json(ApiResponse::ok(message, timer)))
}

/// Handle POST /timers/:id/reset
pub async fn reset_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Timer>>, StatusCode> {
    let timer = state
        .with_panel(|panel| panel.on_reset_timer(&id))
        .map_err(lock_failed)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(ApiResponse::ok("Timer reset", timer)))
}

/// Handle DELETE /timers/:id
pub async fn delete_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    if state.with_panel(|panel| panel.on_delete_timer(&id)).map_err(lock_failed)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

/// Handle GET /alarms
pub async fn list_alarms_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Alarm>>, StatusCode> {
    state
        .with_panel(|panel| panel.alarms().alarms().to_vec())
        .map(Json)
        .map_err(lock_failed)
}

/// Handle POST /alarms
pub async fn add_alarm_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddAlarmRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Alarm>>), StatusCode> {
    let added = state
        .with_panel(|panel| panel.on_add_alarm(&req.hours.as_text(), &req.minutes.as_text(), &req.label))
        .map_err(lock_failed)?;

    match added {
        Some(alarm) => Ok((StatusCode::CREATED, Json(ApiResponse::ok("Alarm added", alarm)))),
        None => {
            debug!("Add alarm rejected: {:?}", req);
            Err(StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

/// Handle POST /alarms/:id/enabled
pub async fn toggle_alarm_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SetEnabledRequest>,
) -> Result<Json<ApiResponse<Alarm>>, StatusCode> {
    let alarm = state
        .with_panel(|panel| panel.on_toggle_alarm(&id, req.enabled))
        .map_err(lock_failed)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let message = if alarm.enabled { "Alarm enabled" } else { "Alarm disabled" };
    Ok(Json(ApiResponse::ok(message, alarm)))
}

/// Handle DELETE /alarms/:id
pub async fn delete_alarm_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    if state.with_panel(|panel| panel.on_delete_alarm(&id)).map_err(lock_failed)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

/// Handle GET /events - stream render events as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_tx.subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match Event::default().json_data(&event) {
                    Ok(sse) => return Some((Ok::<_, Infallible>(sse), rx)),
                    Err(e) => warn!("Failed to encode render event: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} render events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.get_uptime()))
}
