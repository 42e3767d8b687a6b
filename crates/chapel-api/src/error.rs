use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use chapel_types::api::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Wrong email/password and a failed lookup look the same to the caller.
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    /// A store failure whose message is forwarded verbatim.
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
