//! Word of the day, live worship link and prayer requests.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::Local;
use tracing::warn;

use chapel_types::api::{Latest, SuccessResponse};
use chapel_types::models::{LiveWorship, PrayerRequest, Record, WordOfDay};

use crate::{AppState, body_or_skip, ignore_failure, rows_or_empty};

fn found_or_none<T>(what: &str, result: chapel_store::Result<Option<Record<T>>>) -> Option<Record<T>> {
    result.unwrap_or_else(|e| {
        warn!("Failed to read latest {}: {}", what, e);
        None
    })
}

pub async fn get_word_of_day(State(state): State<AppState>) -> impl IntoResponse {
    let found = found_or_none("word of day", state.store.latest_word_of_day().await);
    Json(Latest::or_else(found, || {
        WordOfDay::fallback(Local::now().date_naive())
    }))
}

pub async fn create_word_of_day(
    State(state): State<AppState>,
    body: Result<Json<WordOfDay>, JsonRejection>,
) -> impl IntoResponse {
    if let Some(word) = body_or_skip("word_of_day", body) {
        ignore_failure("word_of_day", state.store.insert_word_of_day(word).await);
    }
    Json(SuccessResponse::ok())
}

pub async fn get_live_worship(State(state): State<AppState>) -> impl IntoResponse {
    let found = found_or_none("live worship", state.store.latest_live_worship().await);
    Json(Latest::or_else(found, LiveWorship::fallback))
}

pub async fn create_live_worship(
    State(state): State<AppState>,
    body: Result<Json<LiveWorship>, JsonRejection>,
) -> impl IntoResponse {
    if let Some(live) = body_or_skip("live_worship", body) {
        ignore_failure("live_worship", state.store.insert_live_worship(live).await);
    }
    Json(SuccessResponse::ok())
}

pub async fn list_prayer_requests(State(state): State<AppState>) -> impl IntoResponse {
    Json(rows_or_empty(
        "prayer requests",
        state.store.list_prayer_requests().await,
    ))
}

pub async fn create_prayer_request(
    State(state): State<AppState>,
    body: Result<Json<PrayerRequest>, JsonRejection>,
) -> impl IntoResponse {
    if let Some(prayer) = body_or_skip("prayer_requests", body) {
        ignore_failure(
            "prayer_requests",
            state.store.insert_prayer_request(prayer).await,
        );
    }
    Json(SuccessResponse::ok())
}
