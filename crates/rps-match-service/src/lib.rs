//! RPS Match Service
//!
//! HTTP host for a single rock/paper/scissors match. Players register for a
//! bearer token, then join, commit, reveal and settle through JSON calls.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use handlers::*;
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Principals
        .route("/api/principals", post(register))
        // Queries
        .route("/api/match", get(get_match))
        .route("/api/match/commitment/:slot", get(get_commitment))
        .route("/api/match/revealed/:slot", get(get_revealed))
        .route("/api/events", get(list_events))
        // Operations
        .route("/api/match/join", post(join))
        .route("/api/match/leave", post(leave))
        .route("/api/match/commit", post(commit))
        .route("/api/match/reveal", post(reveal))
        .route("/api/match/settle", post(settle))
        // Health
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
