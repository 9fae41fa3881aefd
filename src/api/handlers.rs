//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use super::responses::{
    ApiError, ApiResponse, HealthResponse, LateResponse, StatusResponse, TimerListResponse,
    TimerView,
};
use crate::{
    state::{AppState, TickReport, Timer, TimerConfig, TimerId},
    utils::now_millis,
};

type ApiResult<T> = Result<Json<T>, ApiError>;

fn view(state: &AppState, timer: Timer, now: i64) -> TimerView {
    let next_trigger = state.alarms.next_trigger(timer.id());
    TimerView::new(timer, now, next_trigger)
}

fn respond(state: &AppState, message: &str, timer: Timer, now: i64) -> Json<ApiResponse> {
    Json(ApiResponse::ok(message, view(state, timer, now)))
}

/// Handle GET /timers
pub async fn list_timers_handler(State(state): State<Arc<AppState>>) -> Json<TimerListResponse> {
    let now = now_millis();
    let timers = state
        .scheduler
        .list()
        .await
        .into_iter()
        .map(|timer| view(&state, timer, now))
        .collect();
    Json(TimerListResponse { timers })
}

/// Handle POST /timers - Create a disabled timer
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(config): Json<TimerConfig>,
) -> Result<(StatusCode, Json<ApiResponse>), ApiError> {
    let timer = state.scheduler.create(config).await?;
    info!(timer = timer.id(), "Create endpoint called");
    Ok((StatusCode::CREATED, respond(&state, "Timer created", timer, now_millis())))
}

/// Handle GET /timers/:id
pub async fn get_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> ApiResult<TimerView> {
    let timer = state.scheduler.get(id).await?;
    Ok(Json(view(&state, timer, now_millis())))
}

/// Handle PUT /timers/:id - Replace settings
pub async fn update_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
    Json(config): Json<TimerConfig>,
) -> ApiResult<ApiResponse> {
    let timer = state.scheduler.update_config(id, config).await?;
    Ok(respond(&state, "Timer updated", timer, now_millis()))
}

/// Handle DELETE /timers/:id
pub async fn delete_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<StatusCode, ApiError> {
    state.scheduler.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle POST /timers/:id/enable - Arm and start a fresh interval
pub async fn enable_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> ApiResult<ApiResponse> {
    let now = now_millis();
    let timer = state.scheduler.set_enabled(id, true, now).await?;
    info!(timer = id, next_fire = timer.next_fire_millis, "Timer enabled");
    Ok(respond(&state, "Timer enabled", timer, now))
}

/// Handle POST /timers/:id/disable
pub async fn disable_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> ApiResult<ApiResponse> {
    let now = now_millis();
    let timer = state.scheduler.set_enabled(id, false, now).await?;
    info!(timer = id, "Timer disabled");
    Ok(respond(&state, "Timer disabled", timer, now))
}

/// Handle POST /timers/:id/ack - Mark the last fire as seen
pub async fn ack_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> ApiResult<ApiResponse> {
    let now = now_millis();
    let timer = state.scheduler.acknowledge(id, now).await?;
    Ok(respond(&state, "Timer acknowledged", timer, now))
}

/// Handle POST /timers/:id/night-next
pub async fn night_next_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> ApiResult<ApiResponse> {
    let timer = state.scheduler.set_night_next(id).await?;
    Ok(respond(&state, "Next fire will be treated as night", timer, now_millis()))
}

/// Handle POST /timers/:id/check - Manual tick
pub async fn check_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> ApiResult<TickReport> {
    let report = state.scheduler.tick(id, now_millis()).await?;
    Ok(Json(report))
}

/// Handle GET /timers/:id/late/:mins - Condition query
pub async fn late_handler(
    State(state): State<Arc<AppState>>,
    Path((id, mins)): Path<(TimerId, i64)>,
) -> ApiResult<LateResponse> {
    let now = now_millis();
    let late = state.scheduler.is_late_by_mins(id, now, mins).await?;
    let night = state.scheduler.is_night(id, now).await?;
    Ok(Json(LateResponse { id, mins, late, night }))
}

/// Handle GET /status - Return current daemon status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timers = state.scheduler.list().await;
    Json(StatusResponse {
        enabled: timers.iter().filter(|t| t.enabled).count(),
        timers: timers.len(),
        armed_alarms: state.alarms.armed_count(),
        active_notifications: state.active_notifications(),
        requery_count: state.requery.sent(),
        wake_holders: state.wake.holders(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
