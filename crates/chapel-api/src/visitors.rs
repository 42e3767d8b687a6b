use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::Utc;

use chapel_types::api::SuccessResponse;
use chapel_types::models::Visitor;

use crate::sweep::sweep_visitors;
use crate::{AppState, body_or_skip, ignore_failure, rows_or_empty};

/// GET /api/visitors: drops visitors older than 48 hours, then lists the
/// rest newest first.
pub async fn list_visitors(State(state): State<AppState>) -> impl IntoResponse {
    sweep_visitors(state.store.as_ref(), Utc::now()).await;
    Json(rows_or_empty("visitors", state.store.list_visitors().await))
}

pub async fn create_visitor(
    State(state): State<AppState>,
    body: Result<Json<Visitor>, JsonRejection>,
) -> impl IntoResponse {
    if let Some(visitor) = body_or_skip("visitors", body) {
        ignore_failure("visitors", state.store.insert_visitor(visitor).await);
    }
    Json(SuccessResponse::ok())
}
