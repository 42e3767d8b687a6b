use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, auth, devotional, listings, members, reports, settings, visitors};

/// Every `/api` route, bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(auth::login))
        .route(
            "/api/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/api/word-of-day",
            get(devotional::get_word_of_day).post(devotional::create_word_of_day),
        )
        .route(
            "/api/live-worship",
            get(devotional::get_live_worship).post(devotional::create_live_worship),
        )
        .route(
            "/api/prayer-requests",
            get(devotional::list_prayer_requests).post(devotional::create_prayer_request),
        )
        .route(
            "/api/schedules",
            get(listings::list_schedules).post(listings::create_schedule),
        )
        .route(
            "/api/scale",
            get(listings::list_scale).post(listings::create_scale_entry),
        )
        .route(
            "/api/events",
            get(listings::list_events).post(listings::create_event),
        )
        .route(
            "/api/courses",
            get(listings::list_courses).post(listings::create_course),
        )
        .route(
            "/api/visitors",
            get(visitors::list_visitors).post(visitors::create_visitor),
        )
        .route(
            "/api/settings",
            get(settings::get_settings).post(settings::put_setting),
        )
        .route(
            "/api/daily-reports",
            get(reports::list_reports).post(reports::create_report),
        )
        .route(
            "/api/daily-reports/{id}/authorize",
            post(reports::authorize_report),
        )
        .with_state(state)
}
