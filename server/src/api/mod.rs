//! API Router and Application State
//!
//! Central routing configuration and shared state.

pub mod access;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::permissions::{Role, RoleRegistry};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Role registry, read-only after startup
    pub registry: Arc<RoleRegistry>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: Config, registry: RoleRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Role registry for UI badges
        .route("/api/roles", get(list_roles))
        // Access evaluation
        .route("/api/access/check", post(access::check))
        .route("/api/access/moderate", post(access::moderate))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Number of registered roles
    roles: usize,
    /// Registry file path, or `built-in`
    source: String,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        roles: state.registry.len(),
        source: state.config.registry_source(),
    })
}

/// List registered roles, highest level first.
async fn list_roles(State(state): State<AppState>) -> Json<Vec<Role>> {
    Json(state.registry.roles().cloned().collect())
}
