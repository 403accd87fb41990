//! Cache Keys Module
//!
//! The closed set of logical keys and the durability scopes they live in.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Scope ==
/// Durability class of a memory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Survives across sessions
    Local,
    /// Survives only for the current session
    Session,
}

impl Scope {
    pub const ALL: [Scope; 2] = [Scope::Local, Scope::Session];

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Session => "session",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Cache Key ==
/// Logical keys the application may store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheKey {
    AuthToken,
    UserInfo,
    RoleList,
    LockInfo,
    ProjectConfig,
}

impl CacheKey {
    pub const ALL: [CacheKey; 5] = [
        CacheKey::AuthToken,
        CacheKey::UserInfo,
        CacheKey::RoleList,
        CacheKey::LockInfo,
        CacheKey::ProjectConfig,
    ];

    /// Name used inside the memory table and snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            CacheKey::AuthToken => "auth-token",
            CacheKey::UserInfo => "user-info",
            CacheKey::RoleList => "role-list",
            CacheKey::LockInfo => "lock-info",
            CacheKey::ProjectConfig => "project-config",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_match_serde() {
        for key in CacheKey::ALL {
            let encoded = serde_json::to_string(&key).unwrap();
            assert_eq!(encoded, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn test_scope_deserialize() {
        let scope: Scope = serde_json::from_str("\"session\"").unwrap();
        assert_eq!(scope, Scope::Session);
        assert!(serde_json::from_str::<Scope>("\"global\"").is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(serde_json::from_str::<CacheKey>("\"password\"").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Scope::Local.to_string(), "local");
        assert_eq!(CacheKey::ProjectConfig.to_string(), "project-config");
    }
}
