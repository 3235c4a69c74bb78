//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type,
//! dispatched statically from `main`.

use std::sync::Arc;

use bugsage_config::Config;
use bugsage_conversation::ConversationOrchestrator;
use bugsage_core::{CompletionProvider, SessionStore};
use bugsage_providers::CompletionClient;
use bugsage_session::SessionManager;
use tracing::info;

mod chat;
mod init;
mod serve;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use init::InitStrategy;
pub use serve::{ServeInput, ServeStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type, enabling type-safe
/// parameter passing without runtime casting or boxing.
pub trait CommandStrategy: Send + Sync + 'static {
    type Input;

    /// Execute the command with the given input.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Components shared by the `serve` and `chat` commands.
pub struct CommonComponents {
    pub config: Config,
    pub orchestrator: Arc<ConversationOrchestrator>,
}

/// Load configuration and wire provider, store, and orchestrator.
///
/// The credential and model are resolved once here; `Config::load`
/// refuses to proceed without a credential, so the process never
/// starts in a silently degraded state.
pub async fn init_common_components() -> anyhow::Result<CommonComponents> {
    let config = Config::load()?;

    let mut client = CompletionClient::new(
        config.provider.api_key.clone(),
        config.provider.model.clone(),
    );
    if let Some(base_url) = &config.provider.base_url {
        client = client.with_base_url(base_url.clone());
    }

    let db_path = config.db_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    info!("Database path: {}", db_path.display());

    let store = SessionManager::new(&db_path).await?;

    let provider: Arc<dyn CompletionProvider> = Arc::new(client);
    let store: Arc<dyn SessionStore> = Arc::new(store);
    let orchestrator = Arc::new(ConversationOrchestrator::new(provider, store));

    Ok(CommonComponents {
        config,
        orchestrator,
    })
}
