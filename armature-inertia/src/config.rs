//! Configuration for the Inertia adapter

use serde::{Deserialize, Serialize};

/// Name of the root template registered by default.
pub const DEFAULT_ROOT_TEMPLATE: &str = "inertia";

/// Inertia adapter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertiaConfig {
    /// Template rendered for full page loads
    pub root_template: String,

    /// Initial asset version (None = unversioned)
    pub version: Option<String>,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            root_template: DEFAULT_ROOT_TEMPLATE.to_string(),
            version: None,
        }
    }
}

impl InertiaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `INERTIA_ROOT_TEMPLATE` and `INERTIA_VERSION`.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup; empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let defaults = Self::default();

        Self {
            root_template: get("INERTIA_ROOT_TEMPLATE").unwrap_or(defaults.root_template),
            version: get("INERTIA_VERSION").or(defaults.version),
        }
    }

    pub fn with_root_template(mut self, template: impl Into<String>) -> Self {
        self.root_template = template.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}
