//! HTTP surface for the health record service.
//!
//! Thin orchestration layer: handlers sequence the extraction gateway, the
//! merge store, and the calendar publisher, and own nothing else. The
//! router is composable and can be mounted on any axum server.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use types::{ApiContext, UserContext};
