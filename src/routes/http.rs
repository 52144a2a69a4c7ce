//! HTTP endpoint handlers. Thin, read-only views of the shared state.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::protocol::{ErrorOut, HealthOut, ModulesOut};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, questions: state.question_count() })
}

/// Module selector contents, or 503 when the question bank is unavailable.
#[instrument(level = "info", skip(state))]
pub async fn http_get_modules(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  match &state.bank {
    Ok(_) => {
      info!(target: "quiz_player", count = state.modules.len(), "HTTP modules served");
      (StatusCode::OK, Json(ModulesOut::new(state.modules.clone()))).into_response()
    }
    Err(e) => (StatusCode::SERVICE_UNAVAILABLE, Json(ErrorOut { message: e.to_string() })).into_response(),
  }
}
