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

//! Shared data model and collaborator traits for the bugsage chat service.
//!
//! Everything here is provider- and storage-agnostic: concrete
//! implementations live in `bugsage_providers` and `bugsage_session`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message.
///
/// `System` only ever appears inside an assembled prompt; persisted
/// session history is restricted to `User` and `Assistant`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A persisted conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The wire form of a message sent to the completion provider.
///
/// Timestamps are dropped during prompt assembly; the provider only
/// sees `(role, content)` pairs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

/// Reply parsed out of a provider response.
///
/// `content` is `None` when the response was structurally valid but
/// carried no usable text. That is not an error at the client level;
/// the orchestrator substitutes its fallback string.
#[derive(Debug, Clone)]
pub struct CompletionReply {
    pub content: Option<String>,
}

/// A server-tracked conversation with ordered message history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "sessionId")]
    pub id: Uuid,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new empty session.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a message, stamping it with the current time.
    ///
    /// Timestamps are clamped so they never decrease within a session,
    /// even if the wall clock steps backwards between appends.
    pub fn append(&mut self, role: Role, content: String) {
        let now = Utc::now();
        let timestamp = self.messages.last().map_or(now, |m| now.max(m.timestamp));
        self.messages.push(Message {
            role,
            content,
            timestamp,
        });
    }

    /// The last `n` messages of the history, in original order.
    #[must_use]
    pub fn last_n_messages(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    #[must_use]
    pub const fn message_count(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Stateless adapter to an external completion endpoint.
///
/// Implementations own the retry policy; a returned error means the
/// call is exhausted, not merely that one attempt failed.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[PromptMessage]) -> anyhow::Result<CompletionReply>;
}

/// Durable mapping from session id to ordered message history.
///
/// Every operation is a full-document read or write; `get` must return
/// messages in insertion order. Concurrent `save` calls for the same id
/// are last-writer-wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, id: &Uuid) -> anyhow::Result<()>;
    async fn get(&self, id: &Uuid) -> anyhow::Result<Option<Session>>;
    async fn save(&self, session: &Session) -> anyhow::Result<()>;
}
