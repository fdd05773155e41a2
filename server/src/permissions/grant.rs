//! Permission table entries.
//!
//! A role either holds an explicit set of permissions or the `*` wildcard.
//! The wildcard is open-ended: it satisfies every permission, including
//! flags added to the vocabulary after the registry was written.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::vocabulary::Permissions;

/// Wire marker for the wildcard grant.
pub const WILDCARD: &str = "*";

/// The permissions a single role confers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionGrant {
    /// Every permission, present and future.
    All,
    /// Exactly the listed permissions.
    Only(Permissions),
}

impl PermissionGrant {
    /// A grant with no permissions.
    pub const NONE: Self = Self::Only(Permissions::empty());

    /// Check if this grant covers every flag in `permission`.
    #[must_use]
    pub const fn allows(self, permission: Permissions) -> bool {
        match self {
            Self::All => true,
            Self::Only(perms) => perms.contains(permission),
        }
    }

    /// Check if this grant covers at least one flag in `permissions`.
    ///
    /// Always `false` for an empty request, even under the wildcard.
    #[must_use]
    pub const fn allows_any(self, permissions: Permissions) -> bool {
        match self {
            Self::All => !permissions.is_empty(),
            Self::Only(perms) => perms.intersects(permissions),
        }
    }

    /// Combine two grants. The wildcard absorbs everything.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        match (self, other) {
            (Self::All, _) | (_, Self::All) => Self::All,
            (Self::Only(a), Self::Only(b)) => Self::Only(a.union(b)),
        }
    }

    /// Check if this grant is the `*` wildcard.
    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        matches!(self, Self::All)
    }

    /// Concrete flags covered by this grant, resolving the wildcard against
    /// the current vocabulary.
    #[must_use]
    pub const fn resolve(self) -> Permissions {
        match self {
            Self::All => Permissions::all(),
            Self::Only(perms) => perms,
        }
    }
}

impl Default for PermissionGrant {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<Permissions> for PermissionGrant {
    fn from(perms: Permissions) -> Self {
        Self::Only(perms)
    }
}

impl Serialize for PermissionGrant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(WILDCARD)?;
                seq.end()
            }
            Self::Only(perms) => perms.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for PermissionGrant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GrantVisitor;

        impl<'de> Visitor<'de> for GrantVisitor {
            type Value = PermissionGrant;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of permission names or \"*\"")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut grant = PermissionGrant::NONE;
                while let Some(name) = seq.next_element::<String>()? {
                    let entry = if name.trim() == WILDCARD {
                        PermissionGrant::All
                    } else {
                        Permissions::from_wire_name(&name)
                            .map(PermissionGrant::Only)
                            .ok_or_else(|| {
                                de::Error::custom(format!("unknown permission: {name}"))
                            })?
                    };
                    grant = grant.union(entry);
                }
                Ok(grant)
            }
        }

        deserializer.deserialize_seq(GrantVisitor)
    }
}
