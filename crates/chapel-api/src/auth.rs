use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use tracing::{debug, warn};

use chapel_types::api::LoginRequest;

use crate::AppState;
use crate::error::ApiError;

/// POST /api/login: exact match on email and password. Answers with the
/// whole member row.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        debug!("Unreadable login body: {}", rejection.body_text());
        ApiError::InvalidCredentials
    })?;
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(ApiError::InvalidCredentials);
    };

    match state
        .store
        .find_member_by_credentials(&email, &password)
        .await
    {
        Ok(Some(member)) => {
            debug!("Member {} logged in", member.id);
            Ok(Json(member))
        }
        Ok(None) => Err(ApiError::InvalidCredentials),
        Err(e) => {
            warn!("Login lookup failed: {}", e);
            Err(ApiError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use chapel_store::MemoryStore;
    use chapel_types::models::Member;

    use crate::test_support::{app, post, post_raw};

    fn store_with_ana() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .seed_member(Member {
                name: Some("Ana".into()),
                email: Some("ana@example.org".into()),
                cpf: Some("111".into()),
                role_media: 1,
                password: Some("segredo".into()),
                ..Default::default()
            })
            .unwrap();
        store
    }

    #[tokio::test]
    async fn correct_credentials_return_member() {
        let app = app(store_with_ana());
        let (status, body) = post(
            &app,
            "/api/login",
            json!({ "email": "ana@example.org", "password": "segredo" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Ana");
        assert_eq!(body["cpf"], "111");
        assert_eq!(body["role_media"], 1);
        assert!(body["id"].is_i64());
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let app = app(store_with_ana());
        let (status, body) = post(
            &app,
            "/api/login",
            json!({ "email": "ana@example.org", "password": "errada" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Credenciais inválidas" }));
    }

    #[tokio::test]
    async fn backend_failure_looks_like_bad_credentials() {
        let app = app(Arc::new(MemoryStore::failing("connection reset")));
        let (status, body) = post(
            &app,
            "/api/login",
            json!({ "email": "ana@example.org", "password": "segredo" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Credenciais inválidas" }));
    }

    #[tokio::test]
    async fn undecodable_body_is_invalid_credentials() {
        let app = app(store_with_ana());

        let (status, body) = post(&app, "/api/login", json!({ "email": 42, "password": "segredo" })).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Credenciais inválidas" }));

        let (status, body) = post_raw(
            &app,
            "/api/login",
            r#"{"email":"ana@example.org","password":"segredo"}"#,
            false,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Credenciais inválidas" }));

        let (status, body) = post_raw(&app, "/api/login", "{not json", true).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Credenciais inválidas" }));
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let app = app(store_with_ana());
        let (status, body) = post(&app, "/api/login", json!({ "email": "ana@example.org" })).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Credenciais inválidas");
    }
}
