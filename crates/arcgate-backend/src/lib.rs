//! Identity backend configuration for Arcgate.
//!
//! # Key types
//!
//! - [`BackendDescriptor`] — one validated identity backend
//! - [`BackendBody`] — its request shape, one variant per server type
//! - [`Template`] — positional `{0}` request templates
//! - [`UuidConversion`] — remote → local identity policy
//! - [`BackendRegistry`] — every valid backend, by path
//! - [`GatewayConfig`] / [`GatewaySnapshot`] / [`SharedConfig`] — the
//!   config file, its validated form, and the reloadable handle

mod config;
mod conversion;
mod descriptor;
mod error;
mod pattern;
mod registry;
mod template;

pub use config::{
    GatewayConfig, GatewaySnapshot, PipelineSettings, SessionSettings,
    SharedConfig,
};
pub use conversion::{UuidConversion, offline_uuid};
pub use descriptor::{
    BLESSING_SKIN_HAS_JOINED_PATH, BackendBody, BackendDescriptor,
    OFFICIAL_HAS_JOINED_URL, RawBackendConfig, RawBody, RequestMode,
    ServerType,
};
pub use error::ConfigError;
pub use pattern::NamePattern;
pub use registry::{BackendRegistry, RejectedBackend};
pub use template::Template;
