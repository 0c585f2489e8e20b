//! Sunsights Server
//!
//! HTTP API in front of the feedback analyzer: single and bulk analysis,
//! plus the dashboard analytics endpoints.

pub mod bulk;
pub mod config;
pub mod ingest;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::{create_router, AppError};
pub use state::AppState;
