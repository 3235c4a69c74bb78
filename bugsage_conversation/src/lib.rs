#![warn(
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

//! Session-bounded conversation orchestration.
//!
//! This crate ties together the session store and the completion
//! provider: session lifecycle, durable message-history accumulation,
//! fixed-window context truncation, and fallback handling for empty
//! provider replies.

mod orchestrator;
mod prompt;

pub use orchestrator::{ChatError, ConversationOrchestrator, TurnOutcome};
pub use prompt::{FALLBACK_REPLY, HISTORY_WINDOW, SYSTEM_INSTRUCTION, build_prompt};
