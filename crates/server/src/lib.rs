//! txmatch server - HTTP API for transaction matching
//!
//! Exposes the [`txmatch::Engine`] over two read endpoints:
//!
//! - **User matching**: which users' names appear in a transaction's
//!   description, via the fuzzy matching cascade
//! - **Similar descriptions**: which transactions are semantically close to a
//!   free-text query, via embedding similarity
//!
//! # Features
//!
//! - **Middleware**: Compression, CORS, request ID tracking, structured logging
//! - **Configuration**: `.env`, optional `server.*` file and `TXMATCH__*`
//!   environment variables
//! - **Metrics**: Prometheus text exposition at `/metrics`
//! - **Graceful Shutdown**: Proper signal handling for production deployments
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with component states
//! - `GET /metrics` - Prometheus metrics
//! - `GET /match-users/{id}` - Users matching transaction `id`
//! - `GET /search-similar-descriptions?query=...` - Semantically similar transactions

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
