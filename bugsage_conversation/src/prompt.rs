//! Prompt assembly for the completion provider.
//!
//! The context window is a fixed raw-message count: the most recent
//! messages are replayed verbatim and anything older is silently
//! dropped. No summarization is attempted. This bounds the request
//! payload sent to the provider regardless of conversation length, at
//! the cost of losing long-range context.

use bugsage_core::{PromptMessage, Role, Session};

/// Number of trailing history messages included in each prompt.
pub const HISTORY_WINDOW: usize = 15;

/// Instruction prefixed to every prompt. Never persisted.
pub const SYSTEM_INSTRUCTION: &str = "You are an advanced AI specializing in software debugging. \
     Analyze errors, suggest fixes, and provide improved code snippets when necessary.";

/// Assistant text substituted when the provider returns no usable reply.
pub const FALLBACK_REPLY: &str = "AI did not generate a response.";

/// Build the bounded prompt: one system instruction followed by the
/// last [`HISTORY_WINDOW`] messages of the session, timestamps dropped.
#[must_use]
pub fn build_prompt(session: &Session) -> Vec<PromptMessage> {
    let window = session.last_n_messages(HISTORY_WINDOW);

    let mut prompt = Vec::with_capacity(window.len() + 1);
    prompt.push(PromptMessage {
        role: Role::System,
        content: SYSTEM_INSTRUCTION.to_string(),
    });
    prompt.extend(window.iter().map(|m| PromptMessage {
        role: m.role.clone(),
        content: m.content.clone(),
    }));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session_with(count: usize) -> Session {
        let mut session = Session::new(Uuid::now_v7());
        for i in 0..count {
            let role = if i % 2 == 0 {
                Role::User
            } else {
                Role::Assistant
            };
            session.append(role, format!("message {i}"));
        }
        session
    }

    #[test]
    fn short_history_is_included_whole() {
        let prompt = build_prompt(&session_with(4));

        assert_eq!(prompt.len(), 5);
        assert_eq!(prompt[0].role, Role::System);
        assert_eq!(prompt[0].content, SYSTEM_INSTRUCTION);
        assert_eq!(prompt[1].content, "message 0");
        assert_eq!(prompt[4].content, "message 3");
    }

    #[test]
    fn long_history_keeps_only_the_last_window() {
        let prompt = build_prompt(&session_with(40));

        // One system instruction plus exactly the window.
        assert_eq!(prompt.len(), HISTORY_WINDOW + 1);
        assert_eq!(prompt[0].role, Role::System);
        assert_eq!(prompt[1].content, "message 25");
        assert_eq!(prompt[HISTORY_WINDOW].content, "message 39");
    }

    #[test]
    fn window_preserves_original_order() {
        let prompt = build_prompt(&session_with(20));

        let contents: Vec<&str> = prompt[1..].iter().map(|m| m.content.as_str()).collect();
        let expected: Vec<String> = (5..20).map(|i| format!("message {i}")).collect();
        assert_eq!(contents, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn exactly_one_system_instruction() {
        let prompt = build_prompt(&session_with(40));
        let system_count = prompt.iter().filter(|m| m.role == Role::System).count();
        assert_eq!(system_count, 1);
    }

    #[test]
    fn empty_history_yields_system_only() {
        let prompt = build_prompt(&Session::new(Uuid::now_v7()));
        assert_eq!(prompt.len(), 1);
        assert_eq!(prompt[0].role, Role::System);
    }
}
