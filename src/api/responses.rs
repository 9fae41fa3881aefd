//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    error::TimerError,
    schedule::Notification,
    state::{Phase, Timer, TimerId},
};

/// A timer as reported by the API
#[derive(Debug, Clone, Serialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    pub display_name: String,
    pub phase: Phase,
    /// Next time the alarm facility will tick this timer
    pub next_trigger_millis: Option<i64>,
}

impl TimerView {
    pub fn new(timer: Timer, now_millis: i64, next_trigger_millis: Option<i64>) -> Self {
        Self {
            display_name: timer.config.display_name().to_string(),
            phase: timer.phase(now_millis),
            next_trigger_millis,
            timer,
        }
    }
}

/// API response structure for timer operations
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>, timer: TimerView) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerListResponse {
    pub timers: Vec<TimerView>,
}

/// Condition query result for external hosts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LateResponse {
    pub id: TimerId,
    pub mins: i64,
    pub late: bool,
    pub night: bool,
}

/// Daemon status
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timers: usize,
    pub enabled: usize,
    pub armed_alarms: usize,
    pub active_notifications: Vec<Notification>,
    pub requery_count: u64,
    pub wake_holders: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

/// Maps [`TimerError`] to an HTTP response
#[derive(Debug)]
pub struct ApiError(pub TimerError);

impl From<TimerError> for ApiError {
    fn from(err: TimerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TimerError::NotFound(_) => StatusCode::NOT_FOUND,
            TimerError::Config(_) => StatusCode::BAD_REQUEST,
            TimerError::Store(_) | TimerError::Alarm { .. } | TimerError::Notify { .. } => {
                error!("Request failed: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            status: "error",
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
