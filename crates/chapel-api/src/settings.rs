use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};

use chapel_types::api::{SuccessResponse, settings_object};
use chapel_types::models::Setting;

use crate::{AppState, body_or_skip, ignore_failure, rows_or_empty};

/// GET /api/settings: all rows folded into one `{key: value}` object.
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    let rows = rows_or_empty("settings", state.store.list_settings().await);
    Json(settings_object(rows))
}

pub async fn put_setting(
    State(state): State<AppState>,
    body: Result<Json<Setting>, JsonRejection>,
) -> impl IntoResponse {
    if let Some(setting) = body_or_skip("settings", body) {
        ignore_failure("settings", state.store.upsert_setting(setting).await);
    }
    Json(SuccessResponse::ok())
}
