#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! HTTP transport for the chat service.

mod error;
mod handlers;
mod types;

pub use error::AppError;
pub use handlers::create_router;
pub use types::{ChatRequest, ChatResponse, ErrorResponse, StartResponse};

use bugsage_conversation::ConversationOrchestrator;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConversationOrchestrator>,
}

impl AppState {
    #[must_use]
    pub fn new(orchestrator: Arc<ConversationOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// Bind and serve the API until the process is stopped.
pub async fn run(state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Listening on http://{addr}");
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
