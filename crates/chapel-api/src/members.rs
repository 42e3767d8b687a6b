use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use tracing::{info, warn};

use chapel_types::api::SuccessResponse;
use chapel_types::models::Member;

use crate::error::ApiError;
use crate::{AppState, rows_or_empty};

pub async fn list_members(State(state): State<AppState>) -> impl IntoResponse {
    Json(rows_or_empty("members", state.store.list_members().await))
}

/// POST /api/members: registration. Flags arrive already coerced to 0/1;
/// a blank password falls back to the CPF.
pub async fn create_member(
    State(state): State<AppState>,
    body: Result<Json<Member>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(member) = body.map_err(|rejection| {
        warn!("Unreadable member registration: {}", rejection.body_text());
        ApiError::BadRequest(format!("Erro ao cadastrar membro: {}", rejection.body_text()))
    })?;
    let member = member.with_default_password();
    let name = member.name.clone().unwrap_or_default();

    state.store.insert_member(member).await.map_err(|e| {
        warn!("Failed to register member '{}': {}", name, e);
        ApiError::BadRequest(format!("Erro ao cadastrar membro: {e}"))
    })?;

    info!("Registered member '{}'", name);
    Ok(Json(SuccessResponse::ok()))
}
