//! Access evaluation.
//!
//! Pure functions over a caller's role identifiers and the role registry.
//! Nothing here fails: unknown role ids are ignored, an empty match yields no
//! permissions and level 0, and every check is fail-closed.

use serde::Serialize;

use super::grant::PermissionGrant;
use super::registry::{Role, RoleRegistry};
use super::vocabulary::Permissions;

/// Hierarchy level of a caller holding no registered role.
pub const GUEST_LEVEL: u32 = 0;

/// Outcome of [`check_access`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    /// Whether access is granted.
    pub allowed: bool,
    /// Human-readable denial message. Empty when allowed.
    pub message: String,
}

impl AccessDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            message: String::new(),
        }
    }

    fn deny(message: String) -> Self {
        Self {
            allowed: false,
            message,
        }
    }
}

/// Union of every grant the caller's registered roles confer.
pub fn effective_permissions<S: AsRef<str>>(
    registry: &RoleRegistry,
    caller_roles: &[S],
) -> PermissionGrant {
    registry
        .matched(caller_roles)
        .fold(PermissionGrant::NONE, |acc, role| acc.union(role.permissions))
}

/// Check whether any of the caller's roles grants `permission`.
///
/// A multi-flag `permission` must be covered by a single role.
pub fn has_permission<S: AsRef<str>>(
    registry: &RoleRegistry,
    caller_roles: &[S],
    permission: Permissions,
) -> bool {
    registry
        .matched(caller_roles)
        .any(|role| role.permissions.allows(permission))
}

/// Check whether the caller holds at least one of `permissions`.
///
/// Vacuously `false` for an empty set.
pub fn has_any_permission<S: AsRef<str>>(
    registry: &RoleRegistry,
    caller_roles: &[S],
    permissions: Permissions,
) -> bool {
    permissions
        .iter()
        .any(|perm| has_permission(registry, caller_roles, perm))
}

/// Check whether the caller holds every one of `permissions`.
///
/// Vacuously `true` for an empty set. Flags may come from different roles.
pub fn has_all_permissions<S: AsRef<str>>(
    registry: &RoleRegistry,
    caller_roles: &[S],
    permissions: Permissions,
) -> bool {
    permissions
        .iter()
        .all(|perm| has_permission(registry, caller_roles, perm))
}

/// Highest hierarchy level across the caller's roles, [`GUEST_LEVEL`] if none match.
pub fn permission_level<S: AsRef<str>>(registry: &RoleRegistry, caller_roles: &[S]) -> u32 {
    registry
        .matched(caller_roles)
        .map(|role| role.level)
        .max()
        .unwrap_or(GUEST_LEVEL)
}

/// The caller's highest-ranked registered role.
///
/// Ties go to the role listed first by the caller.
pub fn highest_role<'a, S: AsRef<str>>(
    registry: &'a RoleRegistry,
    caller_roles: &'a [S],
) -> Option<&'a Role> {
    registry
        .matched(caller_roles)
        .reduce(|best, role| if role.level > best.level { role } else { best })
}

/// Check whether the actor strictly outranks the target.
///
/// Equal levels never authorize moderation, so a caller cannot moderate
/// someone holding the same roles.
pub fn can_moderate<A: AsRef<str>, T: AsRef<str>>(
    registry: &RoleRegistry,
    actor_roles: &[A],
    target_roles: &[T],
) -> bool {
    permission_level(registry, actor_roles) > permission_level(registry, target_roles)
}

/// Check whether the caller holds any staff permission.
pub fn is_staff<S: AsRef<str>>(registry: &RoleRegistry, caller_roles: &[S]) -> bool {
    has_any_permission(registry, caller_roles, Permissions::STAFF)
}

/// Evaluate a permission request and describe a denial.
///
/// `require_all` selects the ALL combinator, otherwise ANY. The denial
/// message names the full requested set, not only what the caller lacks.
pub fn check_access<S: AsRef<str>>(
    registry: &RoleRegistry,
    caller_roles: &[S],
    permissions: Permissions,
    require_all: bool,
) -> AccessDecision {
    decide(registry, caller_roles, permissions, &[], require_all)
}

/// Evaluate a permission request given as wire names.
///
/// Names outside the vocabulary can never be satisfied: under ALL they deny
/// the request, under ANY they do not count. The denial message lists the
/// known names in vocabulary order, then the unknown ones as first sent,
/// each once.
pub fn check_access_names<S: AsRef<str>, N: AsRef<str>>(
    registry: &RoleRegistry,
    caller_roles: &[S],
    names: &[N],
    require_all: bool,
) -> AccessDecision {
    let mut known = Permissions::empty();
    let mut unknown: Vec<&str> = Vec::new();
    for name in names {
        match Permissions::from_wire_name(name.as_ref()) {
            Some(perm) => known |= perm,
            None => {
                let name = name.as_ref().trim();
                if !unknown.contains(&name) {
                    unknown.push(name);
                }
            }
        }
    }

    if !unknown.is_empty() {
        tracing::debug!(unknown = unknown.len(), "Access check named unknown permissions");
    }

    decide(registry, caller_roles, known, &unknown, require_all)
}

fn decide<S: AsRef<str>>(
    registry: &RoleRegistry,
    caller_roles: &[S],
    known: Permissions,
    unknown: &[&str],
    require_all: bool,
) -> AccessDecision {
    let allowed = if require_all {
        unknown.is_empty() && has_all_permissions(registry, caller_roles, known)
    } else {
        has_any_permission(registry, caller_roles, known)
    };

    if allowed {
        return AccessDecision::allow();
    }

    let mut requested: Vec<&str> = Vec::with_capacity(unknown.len());
    for name in known.wire_names() {
        requested.push(name);
    }
    requested.extend_from_slice(unknown);
    AccessDecision::deny(denial_message(requested))
}

/// Format the denial message for a requested permission list.
pub fn denial_message<I, N>(names: I) -> String
where
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    let names: Vec<N> = names.into_iter().collect();
    match names.as_slice() {
        [] => "No permissions requested".to_string(),
        [only] => format!("Missing required permission: {}", only.as_ref()),
        many => {
            let joined: Vec<&str> = many.iter().map(|name| name.as_ref()).collect();
            format!("Missing required permissions: {}", joined.join(", "))
        }
    }
}
