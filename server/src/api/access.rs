//! Access evaluation handlers.
//!
//! Lets the website's UI and route handlers ask the evaluator about a
//! caller's role ids without linking this crate.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::permissions::{can_moderate, check_access_names, permission_level};

/// Request body for `POST /api/access/check`.
#[derive(Debug, Deserialize)]
pub struct CheckAccessRequest {
    /// Caller's role ids.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Requested permission names.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Require every permission instead of any one.
    #[serde(default)]
    pub require_all: bool,
}

/// Response body for `POST /api/access/check`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckAccessResponse {
    pub allowed: bool,
    /// Denial message, empty when allowed.
    pub message: String,
    /// Caller's hierarchy level.
    pub level: u32,
}

/// Request body for `POST /api/access/moderate`.
#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    #[serde(default)]
    pub actor_roles: Vec<String>,
    #[serde(default)]
    pub target_roles: Vec<String>,
}

/// Response body for `POST /api/access/moderate`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModerateResponse {
    pub allowed: bool,
    pub actor_level: u32,
    pub target_level: u32,
}

/// Evaluate a permission request.
///
/// Names outside the vocabulary can never be satisfied. Under ALL they deny
/// the request; under ANY they simply do not count.
#[tracing::instrument(skip(state, body))]
pub async fn check(
    State(state): State<AppState>,
    Json(body): Json<CheckAccessRequest>,
) -> Json<CheckAccessResponse> {
    let registry = &state.registry;
    let decision = check_access_names(registry, &body.roles, &body.permissions, body.require_all);

    Json(CheckAccessResponse {
        allowed: decision.allowed,
        message: decision.message,
        level: permission_level(registry, &body.roles),
    })
}

/// Decide whether the actor outranks the target.
#[tracing::instrument(skip(state, body))]
pub async fn moderate(
    State(state): State<AppState>,
    Json(body): Json<ModerateRequest>,
) -> Json<ModerateResponse> {
    let registry = &state.registry;

    Json(ModerateResponse {
        allowed: can_moderate(registry, &body.actor_roles, &body.target_roles),
        actor_level: permission_level(registry, &body.actor_roles),
        target_level: permission_level(registry, &body.target_roles),
    })
}
