//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::permissions::RoleRegistry;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// JSON role registry file (optional, replaces the built-in table)
    pub roles_file: Option<PathBuf>,

    /// Discord role ids for the built-in table
    pub role_ids: ConclaveRoleIds,
}

/// Discord role identifiers backing the built-in Conclave table.
///
/// Defaults are placeholders; deployments set the real snowflakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConclaveRoleIds {
    pub owner: String,
    pub admin: String,
    pub moderator: String,
    pub event_host: String,
    pub creator: String,
    pub gamer: String,
    pub member: String,
}

impl Default for ConclaveRoleIds {
    fn default() -> Self {
        Self {
            owner: "OWNER_ID".into(),
            admin: "ADMIN_ID".into(),
            moderator: "MODERATOR_ID".into(),
            event_host: "EVENT_HOST_ID".into(),
            creator: "CREATOR_ID".into(),
            gamer: "GAMER_ID".into(),
            member: "MEMBER_ID".into(),
        }
    }
}

impl ConclaveRoleIds {
    /// Creates role ids from environment variables.
    ///
    /// Environment variables (each optional, blank values ignored):
    /// - `ROLE_ID_OWNER`
    /// - `ROLE_ID_ADMIN`
    /// - `ROLE_ID_MODERATOR`
    /// - `ROLE_ID_EVENT_HOST`
    /// - `ROLE_ID_CREATOR`
    /// - `ROLE_ID_GAMER`
    /// - `ROLE_ID_MEMBER`
    pub fn from_env() -> Self {
        let mut ids = Self::default();

        for (var, slot) in [
            ("ROLE_ID_OWNER", &mut ids.owner),
            ("ROLE_ID_ADMIN", &mut ids.admin),
            ("ROLE_ID_MODERATOR", &mut ids.moderator),
            ("ROLE_ID_EVENT_HOST", &mut ids.event_host),
            ("ROLE_ID_CREATOR", &mut ids.creator),
            ("ROLE_ID_GAMER", &mut ids.gamer),
            ("ROLE_ID_MEMBER", &mut ids.member),
        ] {
            if let Ok(val) = env::var(var) {
                let val = val.trim();
                if !val.is_empty() {
                    *slot = val.to_string();
                }
            }
        }

        ids
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            roles_file: env::var("ROLES_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            role_ids: ConclaveRoleIds::from_env(),
        })
    }

    /// Build the role registry this configuration describes.
    ///
    /// A registry file takes precedence over the built-in table.
    pub fn load_registry(&self) -> Result<RoleRegistry> {
        match &self.roles_file {
            Some(path) => RoleRegistry::from_file(path)
                .with_context(|| format!("Failed to load role registry from {}", path.display())),
            None => RoleRegistry::conclave(&self.role_ids)
                .context("Invalid role ids for the built-in registry"),
        }
    }

    /// Where [`Config::load_registry`] reads roles from: the file path, or `built-in`.
    #[must_use]
    pub fn registry_source(&self) -> String {
        self.roles_file
            .as_ref()
            .map_or_else(|| "built-in".to_string(), |path| path.display().to_string())
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            roles_file: None,
            role_ids: ConclaveRoleIds::default(),
        }
    }
}
