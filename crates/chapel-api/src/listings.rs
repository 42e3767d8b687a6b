//! Append-only listings: service schedules, duty roster, events, courses.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};

use chapel_types::api::SuccessResponse;
use chapel_types::models::{Course, Event, ScaleEntry, Schedule};

use crate::{AppState, body_or_skip, ignore_failure, rows_or_empty};

pub async fn list_schedules(State(state): State<AppState>) -> impl IntoResponse {
    Json(rows_or_empty("schedules", state.store.list_schedules().await))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    body: Result<Json<Schedule>, JsonRejection>,
) -> impl IntoResponse {
    if let Some(schedule) = body_or_skip("schedules", body) {
        ignore_failure("schedules", state.store.insert_schedule(schedule).await);
    }
    Json(SuccessResponse::ok())
}

pub async fn list_scale(State(state): State<AppState>) -> impl IntoResponse {
    Json(rows_or_empty("scale", state.store.list_scale().await))
}

pub async fn create_scale_entry(
    State(state): State<AppState>,
    body: Result<Json<ScaleEntry>, JsonRejection>,
) -> impl IntoResponse {
    if let Some(entry) = body_or_skip("scale", body) {
        ignore_failure("scale", state.store.insert_scale_entry(entry).await);
    }
    Json(SuccessResponse::ok())
}

pub async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    Json(rows_or_empty("events", state.store.list_events().await))
}

pub async fn create_event(
    State(state): State<AppState>,
    body: Result<Json<Event>, JsonRejection>,
) -> impl IntoResponse {
    if let Some(event) = body_or_skip("events", body) {
        ignore_failure("events", state.store.insert_event(event).await);
    }
    Json(SuccessResponse::ok())
}

pub async fn list_courses(State(state): State<AppState>) -> impl IntoResponse {
    Json(rows_or_empty("courses", state.store.list_courses().await))
}

pub async fn create_course(
    State(state): State<AppState>,
    body: Result<Json<Course>, JsonRejection>,
) -> impl IntoResponse {
    if let Some(course) = body_or_skip("courses", body) {
        ignore_failure("courses", state.store.insert_course(course).await);
    }
    Json(SuccessResponse::ok())
}
