//! Permission guards for API handlers.
//!
//! Route handlers call these instead of scanning role id lists themselves.
//! A failed guard converts into a 403 JSON response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use super::evaluator::{
    can_moderate, denial_message, has_all_permissions, has_any_permission, has_permission,
    permission_level,
};
use super::registry::RoleRegistry;
use super::vocabulary::Permissions;

/// Guard failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Caller lacks the requested permission(s).
    #[error("{}", denial_message(.0.wire_names()))]
    MissingPermission(Permissions),

    /// Actor does not outrank the target.
    #[error("Cannot moderate a member at level {target_level} (your level: {actor_level})")]
    RoleHierarchy { actor_level: u32, target_level: u32 },
}

/// Error response body for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let code = match &self {
            Self::MissingPermission(_) => "FORBIDDEN",
            Self::RoleHierarchy { .. } => "HIERARCHY",
        };

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        });

        (StatusCode::FORBIDDEN, body).into_response()
    }
}

/// Require a single permission (or every flag of a combined one from one role).
pub fn require_permission<S: AsRef<str>>(
    registry: &RoleRegistry,
    caller_roles: &[S],
    permission: Permissions,
) -> Result<(), AccessError> {
    if has_permission(registry, caller_roles, permission) {
        Ok(())
    } else {
        tracing::debug!(%permission, "Permission check denied");
        Err(AccessError::MissingPermission(permission))
    }
}

/// Require at least one of `permissions`.
pub fn require_any<S: AsRef<str>>(
    registry: &RoleRegistry,
    caller_roles: &[S],
    permissions: Permissions,
) -> Result<(), AccessError> {
    if has_any_permission(registry, caller_roles, permissions) {
        Ok(())
    } else {
        tracing::debug!(%permissions, "Permission check (any) denied");
        Err(AccessError::MissingPermission(permissions))
    }
}

/// Require every one of `permissions`.
pub fn require_all<S: AsRef<str>>(
    registry: &RoleRegistry,
    caller_roles: &[S],
    permissions: Permissions,
) -> Result<(), AccessError> {
    if has_all_permissions(registry, caller_roles, permissions) {
        Ok(())
    } else {
        tracing::debug!(%permissions, "Permission check (all) denied");
        Err(AccessError::MissingPermission(permissions))
    }
}

/// Require that the actor may moderate the target.
///
/// Checks the moderation permission first, then strict hierarchy.
pub fn require_moderation<A: AsRef<str>, T: AsRef<str>>(
    registry: &RoleRegistry,
    actor_roles: &[A],
    target_roles: &[T],
    permission: Permissions,
) -> Result<(), AccessError> {
    require_permission(registry, actor_roles, permission)?;

    if can_moderate(registry, actor_roles, target_roles) {
        return Ok(());
    }

    let actor_level = permission_level(registry, actor_roles);
    let target_level = permission_level(registry, target_roles);
    tracing::debug!(actor_level, target_level, "Moderation denied by hierarchy");
    Err(AccessError::RoleHierarchy {
        actor_level,
        target_level,
    })
}
