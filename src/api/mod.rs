//! API Module
//!
//! HTTP handlers and routing exposing the two-tier cache over REST.
//!
//! # Endpoints
//! - `GET|PUT|DELETE /cache/:scope/:key` - Per-key operations
//! - `DELETE /cache/:scope`, `DELETE /cache` - Clear one or every scope
//! - `POST /flush/:scope`, `POST /flush` - Snapshot to durable storage
//! - `POST /storage-event` - Cross-context invalidation
//! - `GET /stats` - Per-scope statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
