use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
const DEFAULT_PORT: u16 = 5000;

pub(crate) const CONFIG_TEMPLATE: &str = r#"{
  "provider": {
    "api_key": "your-api-key-here",
    "model": "mistralai/Mistral-7B-Instruct-v0.2"
  },
  "server": {
    "port": 5000
  }
}"#;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "ProviderConfig::default_model")]
    pub model: String,
    /// Endpoint override, mainly for tests against a local stub.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: Self::default_model(),
            base_url: None,
        }
    }
}

impl ProviderConfig {
    fn default_model() -> String {
        DEFAULT_MODEL.to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: Self::default_port(),
        }
    }
}

impl ServerConfig {
    const fn default_port() -> u16 {
        DEFAULT_PORT
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Session database path; defaults to `~/bugsage/sessions.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration for process start.
    ///
    /// Reads `~/bugsage/config.json` when present (a missing file is
    /// not an error: the credential can come from the environment),
    /// then applies `BUGSAGE_API_KEY` / `BUGSAGE_MODEL` overrides.
    /// A missing credential is fatal here so the process refuses to
    /// start rather than degrading at the first provider call.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Self = serde_json::from_str(&content)?;
            info!("Loaded config from {}", config_path.display());
            config
        } else {
            Self {
                provider: ProviderConfig::default(),
                server: ServerConfig::default(),
                database: DatabaseConfig::default(),
            }
        };

        if let Ok(key) = std::env::var("BUGSAGE_API_KEY") {
            config.provider.api_key = key;
        }
        if let Ok(model) = std::env::var("BUGSAGE_MODEL") {
            config.provider.model = model;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the process must not start with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.provider.api_key.trim().is_empty() {
            anyhow::bail!(
                "Missing provider API key. Set BUGSAGE_API_KEY or add provider.api_key \
                 to the config file (run 'bugsage init' to create one)."
            );
        }
        Ok(())
    }

    /// Resolved path of the session database.
    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        self.database.path.clone().map_or_else(
            || Ok(Self::config_dir()?.join("sessions.db")),
            Ok,
        )
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("bugsage"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Next steps:");
        println!("   1. Edit the config file and add your provider API key");
        println!("      (or export BUGSAGE_API_KEY instead)");
        println!("   2. Run 'bugsage serve' to start the HTTP API");
        println!("   3. Or run 'bugsage chat' for a terminal session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_with_expected_defaults() {
        let config: Config = serde_json::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(config.database.path.is_none());
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let config: Config =
            serde_json::from_str(r#"{"provider": {"api_key": "k"}}"#).unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_credential_fails_validation() {
        let config: Config =
            serde_json::from_str(r#"{"provider": {"api_key": "  "}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_database_path_wins() {
        let config: Config = serde_json::from_str(
            r#"{"provider": {"api_key": "k"}, "database": {"path": "/tmp/custom.db"}}"#,
        )
        .unwrap();
        assert_eq!(config.db_path().unwrap(), PathBuf::from("/tmp/custom.db"));
    }
}
