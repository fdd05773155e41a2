//! Community permission vocabulary using bitflags.
//!
//! Permissions are organized into categories:
//! - Administration (bits 0-1): Admin panel and role management
//! - Moderation (bits 2-6): Member and message moderation
//! - Review (bits 7-9): Applications and content workflow
//! - Community (bits 10-11): Events and announcements
//! - Participation (bits 12-13): Member-facing features
//!
//! Every flag has a canonical snake_case name (`ban_members`, `access_gaming`)
//! used on the wire, in registry files and in denial messages.

use std::fmt;

use bitflags::bitflags;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Community permissions represented as a 64-bit bitfield.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        // === Administration (bits 0-1) ===
        /// Permission to see admin dashboard affordances
        const VIEW_ADMIN_PANEL    = 1 << 0;
        /// Permission to grant and revoke community roles
        const MANAGE_ROLES        = 1 << 1;

        // === Moderation (bits 2-6) ===
        /// Permission to ban members
        const BAN_MEMBERS         = 1 << 2;
        /// Permission to kick members
        const KICK_MEMBERS        = 1 << 3;
        /// Permission to timeout members (temporary mute)
        const TIMEOUT_MEMBERS     = 1 << 4;
        /// Permission to delete messages and posts from other members
        const MANAGE_MESSAGES     = 1 << 5;
        /// Permission to read the moderation log
        const VIEW_AUDIT_LOG      = 1 << 6;

        // === Review (bits 7-9) ===
        /// Permission to accept or reject membership and staff applications
        const REVIEW_APPLICATIONS = 1 << 7;
        /// Permission to approve submitted content for publication
        const APPROVE_CONTENT     = 1 << 8;
        /// Permission to edit or remove published content
        const MANAGE_CONTENT      = 1 << 9;

        // === Community (bits 10-11) ===
        /// Permission to create and edit community events
        const MANAGE_EVENTS       = 1 << 10;
        /// Permission to post announcements through the webhook
        const SEND_ANNOUNCEMENTS  = 1 << 11;

        // === Participation (bits 12-13) ===
        /// Permission to submit content for review
        const SUBMIT_CONTENT      = 1 << 12;
        /// Permission to access the gaming section
        const ACCESS_GAMING       = 1 << 13;
    }
}

/// Canonical wire names, in vocabulary (bit) order.
static VOCABULARY: [(Permissions, &str); 14] = [
    (Permissions::VIEW_ADMIN_PANEL, "view_admin_panel"),
    (Permissions::MANAGE_ROLES, "manage_roles"),
    (Permissions::BAN_MEMBERS, "ban_members"),
    (Permissions::KICK_MEMBERS, "kick_members"),
    (Permissions::TIMEOUT_MEMBERS, "timeout_members"),
    (Permissions::MANAGE_MESSAGES, "manage_messages"),
    (Permissions::VIEW_AUDIT_LOG, "view_audit_log"),
    (Permissions::REVIEW_APPLICATIONS, "review_applications"),
    (Permissions::APPROVE_CONTENT, "approve_content"),
    (Permissions::MANAGE_CONTENT, "manage_content"),
    (Permissions::MANAGE_EVENTS, "manage_events"),
    (Permissions::SEND_ANNOUNCEMENTS, "send_announcements"),
    (Permissions::SUBMIT_CONTENT, "submit_content"),
    (Permissions::ACCESS_GAMING, "access_gaming"),
];

impl Permissions {
    // === Preset Combinations ===

    /// Default permissions for the Member role.
    pub const MEMBER_DEFAULT: Self = Self::SUBMIT_CONTENT;

    /// Default permissions for the Gamer role.
    pub const GAMER_DEFAULT: Self = Self::ACCESS_GAMING;

    /// Default permissions for content creators.
    pub const CREATOR_DEFAULT: Self = Self::SUBMIT_CONTENT.union(Self::ACCESS_GAMING);

    /// Default permissions for event hosts.
    ///
    /// Creator permissions plus event management and announcements.
    pub const EVENT_HOST_DEFAULT: Self = Self::CREATOR_DEFAULT
        .union(Self::MANAGE_EVENTS)
        .union(Self::SEND_ANNOUNCEMENTS);

    /// Default permissions for moderators.
    ///
    /// Member moderation, application review and content approval.
    pub const MODERATOR_DEFAULT: Self = Self::CREATOR_DEFAULT
        .union(Self::VIEW_ADMIN_PANEL)
        .union(Self::BAN_MEMBERS)
        .union(Self::KICK_MEMBERS)
        .union(Self::TIMEOUT_MEMBERS)
        .union(Self::MANAGE_MESSAGES)
        .union(Self::VIEW_AUDIT_LOG)
        .union(Self::REVIEW_APPLICATIONS)
        .union(Self::APPROVE_CONTENT);

    /// Default permissions for admins: every flag known today.
    ///
    /// This is a closed set. Flags added to the vocabulary later are only
    /// granted to wildcard roles.
    pub const ADMIN_DEFAULT: Self = Self::all();

    /// Permissions that mark the holder as staff.
    pub const STAFF: Self = Self::BAN_MEMBERS
        .union(Self::KICK_MEMBERS)
        .union(Self::TIMEOUT_MEMBERS)
        .union(Self::MANAGE_MESSAGES)
        .union(Self::REVIEW_APPLICATIONS)
        .union(Self::APPROVE_CONTENT);

    // === Permission Checking ===

    /// Check if this permission set includes the specified permission(s).
    ///
    /// # Examples
    ///
    /// ```
    /// use conclave_server::permissions::Permissions;
    ///
    /// let perms = Permissions::SUBMIT_CONTENT | Permissions::ACCESS_GAMING;
    /// assert!(perms.has(Permissions::ACCESS_GAMING));
    /// assert!(!perms.has(Permissions::BAN_MEMBERS));
    /// ```
    #[must_use]
    pub const fn has(self, permission: Self) -> bool {
        self.contains(permission)
    }

    // === Names ===

    /// Look up a single permission by its snake_case name.
    ///
    /// Matching is ASCII case-insensitive. Returns `None` for names outside
    /// the vocabulary, including the `*` wildcard marker.
    ///
    /// ```
    /// use conclave_server::permissions::Permissions;
    ///
    /// assert_eq!(Permissions::from_wire_name("ban_members"), Some(Permissions::BAN_MEMBERS));
    /// assert_eq!(Permissions::from_wire_name("fly"), None);
    /// ```
    #[must_use]
    pub fn from_wire_name(name: &str) -> Option<Self> {
        let name = name.trim();
        VOCABULARY
            .iter()
            .find(|(_, wire)| wire.eq_ignore_ascii_case(name))
            .map(|(perm, _)| *perm)
    }

    /// Snake_case names of every flag in this set, in vocabulary order.
    pub fn wire_names(self) -> impl Iterator<Item = &'static str> {
        VOCABULARY
            .iter()
            .filter(move |(perm, _)| self.contains(*perm))
            .map(|(_, wire)| *wire)
    }

    /// Every flag in the vocabulary with its wire name.
    #[must_use]
    pub fn vocabulary() -> &'static [(Self, &'static str)] {
        &VOCABULARY
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.wire_names().collect();
        f.write_str(&names.join(", "))
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.wire_names().count()))?;
        for name in self.wire_names() {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PermissionsVisitor;

        impl<'de> Visitor<'de> for PermissionsVisitor {
            type Value = Permissions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of permission names")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut perms = Permissions::empty();
                while let Some(name) = seq.next_element::<String>()? {
                    let perm = Permissions::from_wire_name(&name).ok_or_else(|| {
                        de::Error::custom(format!("unknown permission: {name}"))
                    })?;
                    perms |= perm;
                }
                Ok(perms)
            }
        }

        deserializer.deserialize_seq(PermissionsVisitor)
    }
}
