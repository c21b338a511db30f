//! HTTP server for the Galleria admin API.
//!
//! Exposes the gallery ingestion endpoint and the category listing behind an
//! optional shared-secret header. The handlers work against the collaborator
//! traits in `galleria-db` and `galleria-storage`, so tests run the full
//! router with in-memory doubles.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use routes::build_router;
pub use state::AppState;
