//! The backend registry: every valid descriptor, keyed by path.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::{BackendDescriptor, ConfigError, RawBackendConfig};

/// A backend that failed validation and was left out of the registry.
#[derive(Debug)]
pub struct RejectedBackend {
    pub path: String,
    pub error: ConfigError,
}

/// All configured identity backends.
///
/// Built once per config load. A backend whose table fails validation is
/// dropped on its own (and logged); the others still load.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<BackendDescriptor>>,
    rejected: Vec<RejectedBackend>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every `[services.*]` table.
    pub fn from_config(services: &BTreeMap<String, RawBackendConfig>) -> Self {
        let mut registry = Self::new();
        for (path, raw) in services {
            match BackendDescriptor::from_raw(path.clone(), raw.clone()) {
                Ok(descriptor) => {
                    tracing::debug!(
                        backend = %path,
                        name = descriptor.name(),
                        enabled = descriptor.is_enabled(),
                        "identity backend loaded"
                    );
                    registry.insert(descriptor);
                }
                Err(error) => {
                    tracing::warn!(
                        backend = %path,
                        %error,
                        "identity backend rejected"
                    );
                    registry.rejected.push(RejectedBackend {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }
        tracing::info!(
            loaded = registry.len(),
            rejected = registry.rejected.len(),
            "identity backends configured"
        );
        registry
    }

    /// Adds (or replaces) a descriptor under its path.
    pub fn insert(&mut self, descriptor: BackendDescriptor) -> Arc<BackendDescriptor> {
        let descriptor = Arc::new(descriptor);
        self.backends
            .insert(descriptor.path().to_string(), Arc::clone(&descriptor));
        descriptor
    }

    /// Looks up a backend by path, enabled or not.
    pub fn get(&self, path: &str) -> Option<Arc<BackendDescriptor>> {
        self.backends.get(path).cloned()
    }

    /// The backend's display name, or `path` itself if it is not registered.
    pub fn display_name(&self, path: &str) -> String {
        self.backends
            .get(path)
            .map(|d| d.name().to_string())
            .unwrap_or_else(|| path.to_string())
    }

    /// Backends that accept logins, sorted by path.
    pub fn enabled(&self) -> Vec<Arc<BackendDescriptor>> {
        let mut enabled: Vec<_> = self
            .backends
            .values()
            .filter(|d| d.is_enabled())
            .cloned()
            .collect();
        enabled.sort_by(|a, b| a.path().cmp(b.path()));
        enabled
    }

    /// Backends dropped during [`from_config`](Self::from_config).
    pub fn rejected(&self) -> &[RejectedBackend] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
