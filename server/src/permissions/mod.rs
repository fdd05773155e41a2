//! Permission system types and utilities.
//!
//! Three pieces:
//! - Vocabulary: the fixed set of community permissions
//! - Registry: role ids mapped to level, color and permission table entry
//! - Evaluator: pure allow/deny and hierarchy checks over a caller's role ids

pub mod evaluator;
pub mod grant;
pub mod guard;
pub mod registry;
pub mod vocabulary;

pub use evaluator::{
    can_moderate, check_access, check_access_names, denial_message, effective_permissions,
    has_all_permissions, has_any_permission, has_permission, highest_role, is_staff,
    permission_level, AccessDecision, GUEST_LEVEL,
};
pub use grant::{PermissionGrant, WILDCARD};
pub use guard::{require_all, require_any, require_moderation, require_permission, AccessError};
pub use registry::{RegistryError, Role, RoleRegistry};
pub use vocabulary::Permissions;
