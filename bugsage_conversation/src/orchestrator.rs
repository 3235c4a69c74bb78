//! Session-bounded conversation orchestration.
//!
//! The orchestrator owns the control flow of a chat turn: look up the
//! session, durably append the user message, assemble the bounded
//! prompt, call the completion provider, and commit the assistant
//! reply. It holds no per-session state between calls; every request
//! is a whole-session read-modify-write against the store.

use std::sync::Arc;

use bugsage_core::{CompletionProvider, Role, Session, SessionStore};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::prompt::{FALLBACK_REPLY, build_prompt};

/// Errors surfaced to the transport layer.
///
/// Transient provider faults are retried inside the provider and never
/// appear here unless exhausted.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("chat session does not exist: {0}")]
    SessionNotFound(Uuid),

    #[error("completion provider failed after retries: {0}")]
    Provider(#[source] anyhow::Error),

    #[error("session storage unavailable: {0}")]
    Storage(#[source] anyhow::Error),
}

/// Result of a successfully processed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Assistant reply text (possibly the fallback string).
    pub reply: String,
    /// Full session state after the turn.
    pub session: Session,
}

/// Orchestrates session lifecycle and message turns.
pub struct ConversationOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    store: Arc<dyn SessionStore>,
}

impl ConversationOrchestrator {
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, store: Arc<dyn SessionStore>) -> Self {
        Self { provider, store }
    }

    /// Create and persist an empty session, returning its id.
    pub async fn create_session(&self) -> Result<Uuid, ChatError> {
        let id = Uuid::now_v7();
        self.store.create(&id).await.map_err(ChatError::Storage)?;

        info!("New chat session started: {id}");
        Ok(id)
    }

    /// Process one user turn against an existing session.
    ///
    /// The user message is persisted before the provider is invoked, so
    /// it survives a provider failure. A failed completion leaves the
    /// session with a trailing unanswered user message; no rollback is
    /// performed.
    pub async fn submit_message(
        &self,
        session_id: &Uuid,
        user_text: &str,
    ) -> Result<TurnOutcome, ChatError> {
        if user_text.trim().is_empty() {
            return Err(ChatError::InvalidRequest(
                "user message must not be empty".to_string(),
            ));
        }

        let mut session = self
            .store
            .get(session_id)
            .await
            .map_err(ChatError::Storage)?
            .ok_or(ChatError::SessionNotFound(*session_id))?;

        // Durability point: the user's input is committed before the
        // external call so it is never lost to a provider outage.
        session.append(Role::User, user_text.to_string());
        self.store.save(&session).await.map_err(ChatError::Storage)?;

        let prompt = build_prompt(&session);
        debug!(
            "Submitting turn for session {session_id}: {} prompt messages, {} total in history",
            prompt.len(),
            session.message_count()
        );

        let completion = self
            .provider
            .complete(&prompt)
            .await
            .map_err(ChatError::Provider)?;

        let reply = completion
            .content
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());

        session.append(Role::Assistant, reply.clone());
        self.store.save(&session).await.map_err(ChatError::Storage)?;

        debug!("Turn completed for session {session_id}");

        Ok(TurnOutcome { reply, session })
    }
}
