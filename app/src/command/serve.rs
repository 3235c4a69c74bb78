use bugsage_server::AppState;
use tracing::info;

/// Input parameters for the Serve command strategy.
#[derive(Debug, Clone, Copy)]
pub struct ServeInput {
    /// Optional port override (falls back to the configured port)
    pub port: Option<u16>,
}

/// Strategy for running the HTTP API server.
#[derive(Debug, Clone, Copy)]
pub struct ServeStrategy;

impl super::CommandStrategy for ServeStrategy {
    type Input = ServeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = super::init_common_components().await?;
        let port = input.port.unwrap_or(common.config.server.port);

        info!(
            "Starting API server: model={}, port={port}",
            common.config.provider.model
        );

        let state = AppState::new(common.orchestrator);
        bugsage_server::run(state, port).await
    }
}
