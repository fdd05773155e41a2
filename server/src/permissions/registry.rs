//! Role registry.
//!
//! Maps Discord role identifiers to role metadata and the permission table
//! entry each role confers. Built once at startup and shared read-only.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grant::PermissionGrant;
use super::vocabulary::Permissions;
use crate::config::ConclaveRoleIds;

/// A community role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// External (Discord) role identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hierarchy rank. Higher outranks lower; guests sit at 0.
    pub level: u32,
    /// Display color (hex, e.g. `#3498db`).
    pub color: String,
    /// Permission table entry for this role.
    pub permissions: PermissionGrant,
}

impl Role {
    fn new(
        id: &str,
        name: &str,
        level: u32,
        color: &str,
        permissions: PermissionGrant,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            level,
            color: color.to_string(),
            permissions,
        }
    }
}

/// Errors raised while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A role was declared without an identifier.
    #[error("Role '{0}' has an empty id")]
    EmptyRoleId(String),

    /// Two roles share an identifier.
    #[error("Duplicate role id: {0}")]
    DuplicateRole(String),

    /// Registry file could not be read.
    #[error("Failed to read registry file: {0}")]
    Io(#[from] std::io::Error),

    /// Registry JSON is malformed or names an unknown permission.
    #[error("Invalid registry: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk registry layout.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    roles: Vec<Role>,
}

/// Immutable role table keyed by role identifier.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    /// Roles ordered by descending level.
    roles: Vec<Role>,
    /// Role id -> index into `roles`.
    index: HashMap<String, usize>,
}

impl RoleRegistry {
    /// Build a registry from a list of roles.
    ///
    /// Rejects empty and duplicate identifiers. Roles are kept in descending
    /// level order; declaration order breaks ties.
    pub fn from_roles(mut roles: Vec<Role>) -> Result<Self, RegistryError> {
        roles.sort_by(|a, b| b.level.cmp(&a.level));

        let mut index = HashMap::with_capacity(roles.len());
        for (i, role) in roles.iter().enumerate() {
            if role.id.trim().is_empty() {
                return Err(RegistryError::EmptyRoleId(role.name.clone()));
            }
            if index.insert(role.id.clone(), i).is_some() {
                return Err(RegistryError::DuplicateRole(role.id.clone()));
            }
        }

        Ok(Self { roles, index })
    }

    /// The canonical Conclave role table.
    ///
    /// | role       | level | permissions            |
    /// |------------|-------|------------------------|
    /// | Owner      | 100   | `*`                    |
    /// | Admin      | 70    | every current flag     |
    /// | Moderator  | 50    | moderation and review  |
    /// | Event Host | 30    | events, announcements  |
    /// | Creator    | 20    | submissions, gaming    |
    /// | Gamer      | 10    | gaming                 |
    /// | Member     | 5     | submissions            |
    pub fn conclave(ids: &ConclaveRoleIds) -> Result<Self, RegistryError> {
        Self::from_roles(vec![
            Role::new(&ids.owner, "Owner", 100, "#e74c3c", PermissionGrant::All),
            Role::new(
                &ids.admin,
                "Admin",
                70,
                "#e67e22",
                Permissions::ADMIN_DEFAULT.into(),
            ),
            Role::new(
                &ids.moderator,
                "Moderator",
                50,
                "#3498db",
                Permissions::MODERATOR_DEFAULT.into(),
            ),
            Role::new(
                &ids.event_host,
                "Event Host",
                30,
                "#9b59b6",
                Permissions::EVENT_HOST_DEFAULT.into(),
            ),
            Role::new(
                &ids.creator,
                "Creator",
                20,
                "#1abc9c",
                Permissions::CREATOR_DEFAULT.into(),
            ),
            Role::new(
                &ids.gamer,
                "Gamer",
                10,
                "#2ecc71",
                Permissions::GAMER_DEFAULT.into(),
            ),
            Role::new(
                &ids.member,
                "Member",
                5,
                "#95a5a6",
                Permissions::MEMBER_DEFAULT.into(),
            ),
        ])
    }

    /// Parse a registry from JSON: `{"roles": [{"id", "name", "level", "color", "permissions"}]}`.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        Self::from_roles(file.roles)
    }

    /// Load a registry from a JSON file.
    #[tracing::instrument]
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        let registry = Self::from_json_str(&json)?;
        tracing::info!(roles = registry.len(), "Loaded role registry from file");
        Ok(registry)
    }

    /// Look up a role by identifier.
    #[must_use]
    pub fn role(&self, id: &str) -> Option<&Role> {
        self.index.get(id).map(|&i| &self.roles[i])
    }

    /// Permission table entry for a role identifier.
    #[must_use]
    pub fn grant(&self, id: &str) -> Option<PermissionGrant> {
        self.role(id).map(|role| role.permissions)
    }

    /// Registered roles a caller holds, in the caller's order.
    ///
    /// Unknown identifiers are skipped.
    pub fn matched<'a, S: AsRef<str>>(
        &'a self,
        caller_roles: &'a [S],
    ) -> impl Iterator<Item = &'a Role> + 'a {
        caller_roles.iter().filter_map(|id| self.role(id.as_ref()))
    }

    /// All roles, highest level first.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RoleRegistry {
        RoleRegistry::conclave(&ConclaveRoleIds::default()).unwrap()
    }

    #[test]
    fn test_conclave_table_levels() {
        let registry = registry();
        assert_eq!(registry.role("OWNER_ID").map(|r| r.level), Some(100));
        assert_eq!(registry.role("ADMIN_ID").map(|r| r.level), Some(70));
        assert_eq!(registry.role("MODERATOR_ID").map(|r| r.level), Some(50));
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_only_owner_is_wildcard() {
        let registry = registry();
        let wildcards: Vec<&str> = registry
            .roles()
            .filter(|r| r.permissions.is_wildcard())
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(wildcards, vec!["Owner"]);
    }

    #[test]
    fn test_roles_sorted_by_descending_level() {
        let levels: Vec<u32> = registry().roles().map(|r| r.level).collect();
        let mut sorted = levels.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(levels, sorted);
    }

    #[test]
    fn test_unknown_role_has_no_entry() {
        let registry = registry();
        assert!(registry.role("123456789012345678").is_none());
        assert!(registry.grant("").is_none());
    }

    #[test]
    fn test_matched_skips_unknown_ids() {
        let registry = registry();
        let caller = ["nope", "GAMER_ID", "also-nope", "MEMBER_ID"];
        let names: Vec<&str> = registry.matched(&caller).map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Gamer", "Member"]);
    }

    #[test]
    fn test_custom_role_ids() {
        let ids = ConclaveRoleIds {
            owner: "1100000000000000001".into(),
            ..ConclaveRoleIds::default()
        };
        let registry = RoleRegistry::conclave(&ids).unwrap();
        assert!(registry.role("1100000000000000001").is_some());
        assert!(registry.role("OWNER_ID").is_none());
    }

    #[test]
    fn test_duplicate_role_ids_rejected() {
        let ids = ConclaveRoleIds {
            gamer: "MEMBER_ID".into(),
            ..ConclaveRoleIds::default()
        };
        let err = RoleRegistry::conclave(&ids).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRole(id) if id == "MEMBER_ID"));
    }

    #[test]
    fn test_empty_role_id_rejected() {
        let err = RoleRegistry::from_json_str(
            r##"{"roles": [{"id": " ", "name": "Ghost", "level": 1, "color": "#000000", "permissions": []}]}"##,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyRoleId(name) if name == "Ghost"));
    }

    #[test]
    fn test_from_json_str() {
        let registry = RoleRegistry::from_json_str(
            r##"{
                "roles": [
                    {"id": "10", "name": "Helper", "level": 20, "color": "#ffffff", "permissions": ["timeout_members"]},
                    {"id": "20", "name": "Founder", "level": 90, "color": "#000000", "permissions": ["*"]}
                ]
            }"##,
        )
        .unwrap();

        let first = registry.roles().next().unwrap();
        assert_eq!(first.name, "Founder");
        assert_eq!(
            registry.grant("10"),
            Some(PermissionGrant::Only(Permissions::TIMEOUT_MEMBERS))
        );
    }

    #[test]
    fn test_from_json_str_rejects_unknown_permission() {
        let err = RoleRegistry::from_json_str(
            r##"{"roles": [{"id": "1", "name": "X", "level": 1, "color": "#000000", "permissions": ["rule_world"]}]}"##,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
        assert!(err.to_string().contains("rule_world"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = RoleRegistry::from_file(Path::new("/nonexistent/roles.json")).unwrap_err();
        assert!(matches!(err, RegistryError::Io(_)));
    }
}
