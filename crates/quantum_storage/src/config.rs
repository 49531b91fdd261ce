#![forbid(unsafe_code)]

use std::env;

/// How `grant_access` treats the permission table once ownership checks pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrantMode {
    /// Ownership is checked; no permission entry is written.
    #[default]
    ValidateOnly,
    /// Ownership is checked and the grantee receives an active entry.
    Record,
}

impl GrantMode {
    fn from_env_value(value: Option<String>) -> Self {
        match value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("record") => Self::Record,
            _ => Self::ValidateOnly,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidateOnly => "validate_only",
            Self::Record => "record",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    pub grant_mode: GrantMode,
    pub audit_enabled: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            grant_mode: GrantMode::ValidateOnly,
            audit_enabled: true,
        }
    }
}

impl RegistryConfig {
    /// Reads `QUANTUM_REGISTRY_GRANT_MODE` and `QUANTUM_REGISTRY_AUDIT` from the process
    /// environment. Parsing lives in [`RegistryConfig::from_lookup`], which is what tests drive.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let audit_enabled = !matches!(
            lookup("QUANTUM_REGISTRY_AUDIT")
                .map(|v| v.trim().to_ascii_lowercase())
                .as_deref(),
            Some("off") | Some("false") | Some("0")
        );
        Self {
            grant_mode: GrantMode::from_env_value(lookup("QUANTUM_REGISTRY_GRANT_MODE")),
            audit_enabled,
        }
    }
}
