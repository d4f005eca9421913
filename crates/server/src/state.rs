use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use txmatch::Engine;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Matching engine (shared across requests)
    pub engine: Arc<Engine>,

    /// Prometheus render handle, present when the recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create state with an engine built from `config.engine`. Records and the
    /// embedder are not loaded until first use (or an explicit warm-up).
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let engine = Engine::from_config(&config.engine)?;
        Ok(Self::with_engine(config, engine))
    }

    /// Create state around an already constructed engine.
    pub fn with_engine(config: ServerConfig, engine: Engine) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
