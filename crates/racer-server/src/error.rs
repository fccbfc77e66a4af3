use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use racer_core::error::RuleError;

#[derive(Debug)]
pub enum AppError {
    /// Body missing, not JSON, or not the expected shape.
    BadRequest(String),
    /// The rules engine refused the request.
    Rule(RuleError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rule(
                RuleError::IllegalMove(_)
                | RuleError::SkipNotPermitted(_)
                | RuleError::InvalidState(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rule(
                RuleError::WrongTurn { .. } | RuleError::GameOver | RuleError::Stalemate(_),
            ) => StatusCode::CONFLICT,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Rule(e) => e.kind(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(m) => write!(f, "{m}"),
            Self::Rule(e) => write!(f, "{e}"),
        }
    }
}

impl From<RuleError> for AppError {
    fn from(e: RuleError) -> Self {
        Self::Rule(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(kind = self.kind(), %status, "Request rejected: {self}");
        let body = serde_json::json!({ "error": self.to_string(), "kind": self.kind() });
        (status, Json(body)).into_response()
    }
}
