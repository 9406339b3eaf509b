//! Asset version shared by the responder and the protocol guard

use parking_lot::RwLock;
use std::sync::Arc;

/// Identifier of the currently deployed client bundle.
///
/// Cloning shares the underlying value, so an override through
/// [`AssetVersion::set`] is seen by every holder.
#[derive(Debug, Clone, Default)]
pub struct AssetVersion {
    inner: Arc<RwLock<Option<String>>>,
}

impl AssetVersion {
    pub fn new(version: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(version)),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.inner.read().clone()
    }

    /// Current version, or an empty string when unset.
    pub fn current(&self) -> String {
        self.inner.read().clone().unwrap_or_default()
    }

    /// Administrative override.
    pub fn set(&self, version: Option<String>) {
        *self.inner.write() = version;
    }

    /// Compare a client-supplied token with the current version.
    pub fn matches(&self, client_version: &str) -> bool {
        self.inner.read().as_deref().unwrap_or("") == client_version
    }
}
