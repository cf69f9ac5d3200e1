//! Gateway configuration: the TOML file, its immutable snapshot, and the
//! shared handle that swaps snapshots on reload.
//!
//! ```toml
//! name_allowed_regular = "^[0-9a-zA-Z_]{1,16}$"
//! whitelist = false
//!
//! [pipeline]
//! max_local_id_attempts = 16
//!
//! [services.official]
//! enable = true
//! name = "Official"
//! # ...
//! ```
//!
//! Loading order: parse the file → validate every backend (bad ones are
//! dropped individually) → compile the global name pattern → publish the
//! snapshot. Readers grab an `Arc` of the current snapshot and keep using
//! it for the whole login attempt, so a reload never changes the rules
//! halfway through a verification.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{BackendRegistry, ConfigError, NamePattern, RawBackendConfig};

const DEFAULT_MAX_LOCAL_ID_ATTEMPTS: u32 = 16;
const DEFAULT_MAX_CONCURRENT_LOGINS: usize = 64;
const DEFAULT_TASK_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_QUEUE_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

/// Tuning for the verification pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// How many local identities collision avoidance may try before the
    /// attempt fails with an internal error.
    pub max_local_id_attempts: u32,

    /// Login attempts verified concurrently.
    pub max_concurrent_logins: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_local_id_attempts: DEFAULT_MAX_LOCAL_ID_ATTEMPTS,
            max_concurrent_logins: DEFAULT_MAX_CONCURRENT_LOGINS,
        }
    }
}

/// Tuning for the hand-off to the session-owning task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// How long a login waits for its session task before giving up.
    pub task_timeout_ms: u64,

    /// Pending session tasks before submitters wait for room.
    pub queue_capacity: usize,
}

impl SessionSettings {
    pub fn task_timeout(&self) -> Duration {
        Duration::from_millis(self.task_timeout_ms)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            task_timeout_ms: DEFAULT_TASK_TIMEOUT_MS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// The gateway configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Global name pattern; empty means no global policy.
    pub name_allowed_regular: String,

    /// Whether every backend requires a whitelist.
    pub whitelist: bool,

    pub pipeline: PipelineSettings,
    pub session: SessionSettings,

    /// Backend tables, keyed by path.
    pub services: BTreeMap<String, RawBackendConfig>,
}

impl GatewayConfig {
    /// Parses config text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// GatewaySnapshot
// ---------------------------------------------------------------------------

/// An immutable, validated view of one config load.
#[derive(Debug)]
pub struct GatewaySnapshot {
    name_pattern: Option<NamePattern>,
    whitelist: bool,
    pipeline: PipelineSettings,
    session: SessionSettings,
    registry: BackendRegistry,
}

impl GatewaySnapshot {
    /// Validates `config`.
    ///
    /// # Errors
    /// [`ConfigError::InvalidRegex`] if the global name pattern does not
    /// compile. Invalid backends are not errors here; they are dropped and
    /// listed in [`BackendRegistry::rejected`].
    pub fn build(config: GatewayConfig) -> Result<Self, ConfigError> {
        let name_pattern =
            NamePattern::optional(Some(&config.name_allowed_regular))?;
        let registry = BackendRegistry::from_config(&config.services);
        Ok(Self {
            name_pattern,
            whitelist: config.whitelist,
            pipeline: config.pipeline,
            session: config.session,
            registry,
        })
    }

    /// A snapshot with global defaults and the given registry.
    pub fn with_registry(registry: BackendRegistry) -> Self {
        Self {
            name_pattern: None,
            whitelist: false,
            pipeline: PipelineSettings::default(),
            session: SessionSettings::default(),
            registry,
        }
    }

    /// Sets the global name pattern.
    pub fn name_pattern_from(
        mut self,
        pattern: &str,
    ) -> Result<Self, ConfigError> {
        self.name_pattern = NamePattern::optional(Some(pattern))?;
        Ok(self)
    }

    /// Sets the global whitelist flag.
    pub fn whitelist_required(mut self, required: bool) -> Self {
        self.whitelist = required;
        self
    }

    pub fn pipeline_settings(mut self, settings: PipelineSettings) -> Self {
        self.pipeline = settings;
        self
    }

    /// The global name pattern, used when a backend has none.
    pub fn name_pattern(&self) -> Option<&NamePattern> {
        self.name_pattern.as_ref()
    }

    pub fn whitelist(&self) -> bool {
        self.whitelist
    }

    pub fn pipeline(&self) -> &PipelineSettings {
        &self.pipeline
    }

    pub fn session(&self) -> &SessionSettings {
        &self.session
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }
}

// ---------------------------------------------------------------------------
// SharedConfig
// ---------------------------------------------------------------------------

/// The current snapshot, swappable at runtime.
///
/// Cheap to clone; all clones see the same snapshot.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    current: Arc<RwLock<Arc<GatewaySnapshot>>>,
}

impl SharedConfig {
    pub fn new(snapshot: GatewaySnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// The snapshot in effect right now.
    pub fn load(&self) -> Arc<GatewaySnapshot> {
        Arc::clone(&*self.current.read())
    }

    /// Publishes `snapshot`, returning the one it replaced.
    pub fn replace(&self, snapshot: GatewaySnapshot) -> Arc<GatewaySnapshot> {
        std::mem::replace(&mut *self.current.write(), Arc::new(snapshot))
    }

    /// Builds a snapshot from `config` and publishes it. On error the
    /// current snapshot stays in effect.
    pub fn reload(&self, config: GatewayConfig) -> Result<(), ConfigError> {
        let snapshot = GatewaySnapshot::build(config)?;
        self.replace(snapshot);
        tracing::info!("gateway configuration reloaded");
        Ok(())
    }
}
