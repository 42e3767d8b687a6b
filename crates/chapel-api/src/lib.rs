pub mod auth;
pub mod devotional;
pub mod error;
pub mod listings;
pub mod members;
pub mod reports;
pub mod routes;
pub mod settings;
pub mod sweep;
pub mod visitors;

use std::sync::Arc;

use axum::{Json, extract::rejection::JsonRejection};
use tracing::warn;

use chapel_store::Store;

pub use routes::router;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn Store>,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn Store>) -> AppState {
        Arc::new(Self { store })
    }
}

/// Reads that fail are answered with an empty list.
pub(crate) fn rows_or_empty<T>(what: &str, result: chapel_store::Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("Failed to list {}: {}", what, e);
        Vec::new()
    })
}

/// Body of a write whose failure the caller never sees. A body that does not
/// decode skips the insert.
pub(crate) fn body_or_skip<T>(what: &str, body: Result<Json<T>, JsonRejection>) -> Option<T> {
    match body {
        Ok(Json(value)) => Some(value),
        Err(rejection) => {
            warn!("Skipping insert into {}: {}", what, rejection.body_text());
            None
        }
    }
}

/// Writes whose failure the caller never sees.
pub(crate) fn ignore_failure(what: &str, result: chapel_store::Result<()>) {
    if let Err(e) = result {
        warn!("Ignoring failed insert into {}: {}", what, e);
    }
}
