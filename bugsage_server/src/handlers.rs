//! HTTP request handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::types::{ChatRequest, ChatResponse, StartResponse};

/// Build the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/ai/start", post(start_session))
        .route("/api/ai/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn start_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<StartResponse>), AppError> {
    let session_id = state.orchestrator.create_session().await?;
    Ok((StatusCode::CREATED, Json(StartResponse { session_id })))
}

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let (Some(session_id), Some(user_message)) = (req.session_id, req.user_message) else {
        return Err(AppError::BadRequest(
            "sessionId and userMessage are required".to_string(),
        ));
    };

    // The id is opaque to clients, so a malformed one is
    // indistinguishable from an unknown one.
    let id = Uuid::parse_str(&session_id).map_err(|_| {
        warn!("Rejecting unparseable session id: {session_id}");
        AppError::NotFound(format!("chat session does not exist: {session_id}"))
    })?;

    let outcome = state.orchestrator.submit_message(&id, &user_message).await?;

    Ok(Json(ChatResponse {
        ai_response: outcome.reply,
        session: outcome.session,
    }))
}
