use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::{Deserialize, Serialize};
use txmatch::EngineConfig;

/// Prefix of environment overrides, e.g. `TXMATCH__PORT=9000` or
/// `TXMATCH__ENGINE__SEMANTIC__MODE=api`.
pub const ENV_PREFIX: &str = "TXMATCH";

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Enable permissive CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Install the Prometheus recorder and serve `/metrics`
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Load records and build the embedder before accepting requests
    #[serde(default)]
    pub eager_load: bool,

    /// Name reported by `GET /`
    #[serde(default = "default_title")]
    pub title: String,

    /// Record sources, threshold and embedding provider
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            eager_load: false,
            title: default_title(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `server.{toml,yaml,json}`
    /// file and `TXMATCH__*` environment variables, in increasing priority.
    pub fn load() -> anyhow::Result<Self> {
        // A missing .env is normal outside development.
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    pub(crate) fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let config: ServerConfig = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        self.socket_addr()?;
        self.engine.validate()?;
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        addr_str
            .parse()
            .with_context(|| format!("invalid bind address '{addr_str}'"))
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_title() -> String {
    "Transaction Matching API".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str) -> anyhow::Result<ServerConfig> {
        ServerConfig::from_builder(
            config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.timeout_secs, 30);
        assert!(cfg.enable_cors);
        assert!(cfg.metrics_enabled);
        assert!(!cfg.eager_load);
        assert_eq!(cfg.engine.similarity_threshold, 0.3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn empty_source_gives_defaults() {
        let cfg = from_toml("").unwrap();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.title, "Transaction Matching API");
    }

    #[test]
    fn nested_engine_settings() {
        let cfg = from_toml(
            r#"
            port = 9100
            eager_load = true

            [engine]
            users_path = "fixtures/users.csv"
            similarity_threshold = 0.45

            [engine.semantic]
            dimension = 64
            "#,
        )
        .unwrap();
        assert_eq!(cfg.port, 9100);
        assert!(cfg.eager_load);
        assert_eq!(cfg.engine.similarity_threshold, 0.45);
        assert_eq!(cfg.engine.semantic.dimension, 64);
        assert_eq!(
            cfg.engine.transactions_path,
            std::path::PathBuf::from("data/transactions.csv")
        );
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(from_toml("timeout_secs = 0").is_err());
        assert!(from_toml("bind_addr = \"not an address\"").is_err());
        assert!(from_toml("[engine]\nsimilarity_threshold = 2.0").is_err());
    }
}
