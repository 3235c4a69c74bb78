//! Terminal chat against the debugging assistant.

use std::io::Write;

use bugsage_conversation::ConversationOrchestrator;
use tracing::info;
use uuid::Uuid;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional session ID to resume (creates a new one if not provided)
    pub session: Option<Uuid>,
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
}

/// Strategy for executing the Chat command.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = super::init_common_components().await?;

        let session_id = match input.session {
            Some(id) => id,
            None => common.orchestrator.create_session().await?,
        };
        info!("Chat session: {session_id}");

        if let Some(msg) = input.message {
            let outcome = common.orchestrator.submit_message(&session_id, &msg).await?;
            println!("{}", outcome.reply);
        } else {
            run_interactive(&common.orchestrator, &session_id).await?;
        }

        Ok(())
    }
}

async fn run_interactive(
    orchestrator: &ConversationOrchestrator,
    session_id: &Uuid,
) -> anyhow::Result<()> {
    println!("=== Debugging session: {session_id} ===");
    println!("Type 'exit', 'quit', or Ctrl+C to end the session.\n");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if matches!(input, "exit" | "quit" | "q") {
            break;
        }

        if input.is_empty() {
            continue;
        }

        match orchestrator.submit_message(session_id, input).await {
            Ok(outcome) => println!("\n{}\n", outcome.reply),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Ok(())
}
