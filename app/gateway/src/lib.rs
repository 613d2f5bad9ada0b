//! Agentgate gateway: configuration, shared state, HTTP API and serving.
//!
//! Composes the token authentication from `agentgate-auth` with the
//! executor bridge from `agentgate-executor` behind an axum router.

pub mod api;
pub mod config;
pub mod gateway;
pub mod utils;

pub use api::{ApiError, router};
pub use config::GatewayConfig;
pub use gateway::{
    Gateway,
    builder::{build_backend, build_gateway},
    serve::{ServeHandle, serve, serve_with},
};
