use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use chapel_types::api::{CreateDailyReportRequest, SuccessResponse};
use chapel_types::models::{DailyReport, ReportStatus};

use crate::error::ApiError;
use crate::sweep::sweep_reports;
use crate::{AppState, rows_or_empty};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Builds the row to insert: the server's calendar day and weekday, status
/// pending, amounts and people as the client sent them.
pub fn pending_report(req: CreateDailyReportRequest, today: NaiveDate) -> DailyReport {
    DailyReport {
        date: today,
        day_of_week: Some(DailyReport::label_for(today)),
        offerings: req.offerings,
        tithes: req.tithes,
        expenses: req.expenses,
        total: req.total,
        approver_id: req.approver_id,
        created_by_id: req.created_by_id,
        created_by_name: req.created_by_name,
        status: ReportStatus::Pending,
    }
}

/// GET /api/daily-reports: sweeps earlier days, then lists today's reports.
pub async fn list_reports(State(state): State<AppState>) -> impl IntoResponse {
    let today = today();
    sweep_reports(state.store.as_ref(), today).await;
    Json(rows_or_empty(
        "daily reports",
        state.store.list_reports_on(today).await,
    ))
}

/// POST /api/daily-reports: answers with the stored row.
pub async fn create_report(
    State(state): State<AppState>,
    body: Result<Json<CreateDailyReportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        warn!("Unreadable daily report: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    })?;
    let report = pending_report(req, today());
    let row = state.store.insert_report(report).await.map_err(|e| {
        warn!("Failed to create daily report: {}", e);
        ApiError::BadRequest(e.to_string())
    })?;

    info!("Daily report {} created for {}", row.id, row.fields.date);
    Ok(Json(row))
}

/// POST /api/daily-reports/{id}/authorize: unconditional, so repeating it
/// succeeds.
pub async fn authorize_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.authorize_report(id).await.map_err(|e| {
        warn!("Failed to authorize daily report {}: {}", id, e);
        ApiError::BadRequest(e.to_string())
    })?;

    info!("Daily report {} authorized", id);
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use chapel_store::MemoryStore;

    use super::*;
    use crate::test_support::{app, get, post, post_raw};

    fn report_on(date: NaiveDate) -> DailyReport {
        pending_report(CreateDailyReportRequest::default(), date)
    }

    #[test]
    fn pending_report_stamps_day() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let report = pending_report(
            CreateDailyReportRequest {
                total: Some(json!(250)),
                ..Default::default()
            },
            day,
        );
        assert_eq!(report.date, day);
        assert_eq!(report.day_of_week.as_deref(), Some("sábado"));
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.total, Some(json!(250)));
    }

    #[tokio::test]
    async fn creation_ignores_client_date() {
        let store = Arc::new(MemoryStore::new());
        let app = app(store.clone());

        let (status, body) = post(
            &app,
            "/api/daily-reports",
            json!({
                "date": "2001-01-01",
                "day_of_week": "segunda-feira",
                "offerings": 100,
                "tithes": 300,
                "expenses": 50,
                "total": 350,
                "approver_id": 2,
                "created_by_id": 3,
                "created_by_name": "Tesoureiro"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let today = today();
        assert_eq!(body["date"], today.to_string());
        assert_eq!(body["day_of_week"], DailyReport::label_for(today));
        assert_eq!(body["status"], "pending");
        assert_eq!(body["total"], 350);
        assert!(body["id"].is_i64());
    }

    #[tokio::test]
    async fn yesterday_is_swept_today_is_kept() {
        let store = Arc::new(MemoryStore::new());
        let today = today();
        store
            .seed_report(report_on(today.pred_opt().unwrap()))
            .unwrap();
        let kept = store.seed_report(report_on(today)).unwrap();
        let app = app(store.clone());

        let (status, body) = get(&app, "/api/daily-reports").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["id"].as_i64())
            .collect();
        assert_eq!(ids, [kept]);
        assert_eq!(store.all_reports().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn authorizing_twice_stays_authorized() {
        let store = Arc::new(MemoryStore::new());
        let id = store.seed_report(report_on(today())).unwrap();
        let app = app(store.clone());
        let uri = format!("/api/daily-reports/{id}/authorize");

        for _ in 0..2 {
            let (status, body) = post(&app, &uri, Value::Null).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "success": true }));
            let report = store.report(id).unwrap().unwrap();
            assert_eq!(report.fields.status, ReportStatus::Authorized);
        }
    }

    #[tokio::test]
    async fn undecodable_report_is_400_with_error_body() {
        let store = Arc::new(MemoryStore::new());
        let app = app(store.clone());

        let (status, body) = post(&app, "/api/daily-reports", json!({ "created_by_name": 5 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = post_raw(&app, "/api/daily-reports", "total=350", false).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        assert!(store.all_reports().unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failures_are_400_with_message() {
        let app = app(Arc::new(MemoryStore::failing("relation \"daily_reports\" does not exist")));

        let (status, body) = post(&app, "/api/daily-reports", json!({ "total": 1 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "relation \"daily_reports\" does not exist");

        let (status, body) = post(&app, "/api/daily-reports/7/authorize", Value::Null).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "relation \"daily_reports\" does not exist");

        let (status, body) = get(&app, "/api/daily-reports").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
