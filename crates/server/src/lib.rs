//! shadowscan HTTP server: learned-model ingestion and request anomaly
//! detection over axum.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
