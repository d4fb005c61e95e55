//! HTTP API server for the Vivarium simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - `GET /api/new_single_sim` -- validate query parameters and run one
//!   simulation
//! - `GET /api/new_random_sim` -- draw a random configuration and run
//!   one simulation
//! - `GET /api/new_multiple_sim/{iterations}` -- run a concurrent batch
//!   of randomized simulations
//! - **Minimal HTML status page** (`GET /`) listing the endpoints
//!
//! # Architecture
//!
//! Handlers read the immutable rule table and interval map out of the
//! shared [`AppState`](state::AppState) and call into `vivarium-core`
//! for engine invocation and batch orchestration. Every response is
//! JSON; failures use the `{"error": "..."}` envelope with 400 for
//! validation problems, 504 for deadline expiry, and 500 for engine
//! faults. A whole-request deadline bounds each simulation call.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
