//! Planet Finder Server - HTTP JSON API for catalog matching
//!
//! Exposes the matcher over HTTP: single queries, JSON and CSV bulk uploads,
//! and catalog inspection and reload.
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
//! - `GET /ready` - Readiness probe with catalog size
//! - `GET /api/v1/schema` - Attribute keys in schema order
//! - `POST /api/v1/match` - Match one query object
//! - `POST /api/v1/match/bulk` - Match `{ "rows": [...] }`
//! - `POST /api/v1/match/bulk/csv` - Match a CSV upload
//! - `GET /api/v1/catalog/stats` - Catalog size and source
//! - `POST /api/v1/catalog/reload` - Re-read the catalog file
//!
//! Errors use `{ "error": { "code": "...", "message": "..." } }`; malformed
//! bulk uploads are `400 MALFORMED_BULK_INPUT`.

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
