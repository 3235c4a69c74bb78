use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bugsage_conversation::ChatError;

use crate::types::ErrorResponse;

/// HTTP-facing error. Callers always receive a structured JSON body
/// distinguishing bad input, unknown session, and server/provider
/// failure; internal stacks never leak.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::InvalidRequest(msg) => Self::BadRequest(msg),
            ChatError::SessionNotFound(id) => {
                Self::NotFound(format!("chat session does not exist: {id}"))
            }
            ChatError::Provider(cause) => {
                Self::Internal(format!("AI processing failed: {cause}"))
            }
            ChatError::Storage(cause) => {
                Self::Internal(format!("session storage unavailable: {cause}"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
