/// API request handlers

use super::responses::*;
use crate::transport::LogTransport;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, error};
use whisper_common::WhisperError;
use whisper_core::{BuiltinCatalog, CommandRouter, InboundEvent, MemoryStore};

/// Router over the daemon's collaborators
pub type DaemonRouter = CommandRouter<MemoryStore, LogTransport, BuiltinCatalog>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<DaemonRouter>,
}

impl AppState {
    pub fn new(router: Arc<DaemonRouter>) -> Self {
        Self { router }
    }
}

/// Handler for POST /events
pub async fn post_event(
    State(state): State<AppState>,
    Json(event): Json<InboundEvent>,
) -> Result<Json<EventResponse>, AppError> {
    debug!("API: POST /events from account {}", event.account_id);

    let outcome = state.router.route(event).await?;
    Ok(Json(EventResponse { outcome }))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    debug!("API: GET /health");
    (StatusCode::OK, "OK")
}

/// Application error type
pub struct AppError {
    message: String,
    status_code: StatusCode,
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("API Error: {}", self.message);

        let body = Json(ErrorResponse::new(
            self.message,
            self.status_code.as_u16(),
        ));

        (self.status_code, body).into_response()
    }
}

impl From<WhisperError> for AppError {
    fn from(err: WhisperError) -> Self {
        error!("Routing failed: {:#}", err);
        AppError::internal("internal error")
    }
}
