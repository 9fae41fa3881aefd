//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(list_timers_handler).post(create_timer_handler))
        .route(
            "/timers/:id",
            get(get_timer_handler)
                .put(update_timer_handler)
                .delete(delete_timer_handler),
        )
        .route("/timers/:id/enable", post(enable_handler))
        .route("/timers/:id/disable", post(disable_handler))
        .route("/timers/:id/ack", post(ack_handler))
        .route("/timers/:id/night-next", post(night_next_handler))
        .route("/timers/:id/check", post(check_handler))
        .route("/timers/:id/late/:mins", get(late_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
