//! Identity backend descriptors.
//!
//! A descriptor is the validated, immutable configuration of one identity
//! backend. It is built from a [`RawBackendConfig`] (every key optional, as
//! it comes out of TOML) and fails fast on the first missing or malformed
//! value, so a descriptor that exists is always usable.
//!
//! The request shape differs per server type. Instead of a bag of optional
//! fields checked at request time, each type is a [`BackendBody`] variant
//! carrying exactly the templates it needs:
//!
//! ```text
//! official      → fixed session-server URL            (GET)
//! blessing_skin → configured root + hasJoined path     (GET)
//! custom        → configured URL, GET or POST + body
//! ```

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, NamePattern, Template, UuidConversion};

/// The official session server's `hasJoined` endpoint.
pub const OFFICIAL_HAS_JOINED_URL: &str = "https://sessionserver.mojang.com/session/minecraft/hasJoined?username={0}&serverId={1}{2}";

/// Path appended to a blessing-skin root URL.
pub const BLESSING_SKIN_HAS_JOINED_PATH: &str =
    "/sessionserver/session/minecraft/hasJoined?username={0}&serverId={1}{2}";

/// Arguments of a URL or POST-body template: username, server id, IP segment.
const REQUEST_ARITY: usize = 3;

/// Arguments of an IP sub-template: the IP.
const IP_ARITY: usize = 1;

// ---------------------------------------------------------------------------
// Raw config
// ---------------------------------------------------------------------------

/// Which kind of identity service a backend is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerType {
    /// The default, fully trusted session server.
    #[serde(alias = "minecraft", alias = "MINECRAFT")]
    Official,

    /// A third-party skin site exposing a compatible session server.
    #[serde(alias = "BLESSING_SKIN")]
    BlessingSkin,

    /// Anything else, described entirely by templates.
    #[serde(alias = "CUSTOM")]
    Custom,
}

/// The `body` table of a backend, as written in config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBody {
    pub server_type: Option<ServerType>,
    pub post_mode: Option<bool>,
    pub url: Option<String>,
    pub post_content: Option<String>,
    pub pass_ip: Option<bool>,
    pub pass_ip_content: Option<String>,
    pub pass_ip_content_by_post: Option<String>,
}

/// One `[services.<path>]` table, as written in config.
///
/// Every key is optional here; [`BackendDescriptor::from_raw`] decides
/// which ones are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBackendConfig {
    pub enable: Option<bool>,
    pub name: Option<String>,
    pub body: Option<RawBody>,
    pub conv_uuid: Option<UuidConversion>,
    pub conv_repeat: Option<bool>,
    pub name_allowed_regular: Option<String>,
    pub whitelist: Option<bool>,
    pub refuse_repeated_login: Option<bool>,
    pub safe_id: Option<bool>,
    pub auth_retry: Option<u32>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::MissingField(field))
}

// ---------------------------------------------------------------------------
// BackendBody
// ---------------------------------------------------------------------------

/// GET or POST, with the POST body template when posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMode {
    Get,
    Post { content: Template },
}

/// The validated request shape of a backend.
///
/// `pass_ip` is `Some` exactly when IP passing is enabled, and then holds
/// the sub-template for the active mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendBody {
    Official {
        url: Template,
        pass_ip: Option<Template>,
    },
    BlessingSkin {
        url: Template,
        pass_ip: Option<Template>,
    },
    Custom {
        url: Template,
        mode: RequestMode,
        pass_ip: Option<Template>,
    },
}

impl BackendBody {
    /// Validates a raw body.
    ///
    /// # Errors
    /// - [`ConfigError::MissingField`] — `server_type`; `post_mode` for
    ///   custom; `post_content` when posting; `url` for URL-bearing types;
    ///   `pass_ip`; the IP sub-template for the active mode when passing IPs
    /// - [`ConfigError::InvalidTemplate`] — any template fails to parse
    pub fn from_raw(raw: RawBody) -> Result<Self, ConfigError> {
        let server_type = required(raw.server_type, "server_type")?;

        let mode = match server_type {
            ServerType::Custom => {
                if required(raw.post_mode, "post_mode")? {
                    let content = required(raw.post_content, "post_content")?;
                    RequestMode::Post {
                        content: Template::parse(content, REQUEST_ARITY)?,
                    }
                } else {
                    RequestMode::Get
                }
            }
            ServerType::Official | ServerType::BlessingSkin => RequestMode::Get,
        };

        let url = match server_type {
            ServerType::Official => {
                Template::parse(OFFICIAL_HAS_JOINED_URL, REQUEST_ARITY)?
            }
            ServerType::BlessingSkin => {
                let root = required(raw.url, "url")?;
                let root = root.trim_end_matches('/');
                Template::parse(
                    format!("{root}{BLESSING_SKIN_HAS_JOINED_PATH}"),
                    REQUEST_ARITY,
                )?
            }
            ServerType::Custom => {
                Template::parse(required(raw.url, "url")?, REQUEST_ARITY)?
            }
        };

        let pass_ip = if required(raw.pass_ip, "pass_ip")? {
            let template = match mode {
                RequestMode::Post { .. } => required(
                    raw.pass_ip_content_by_post,
                    "pass_ip_content_by_post",
                )?,
                RequestMode::Get => {
                    required(raw.pass_ip_content, "pass_ip_content")?
                }
            };
            Some(Template::parse(template, IP_ARITY)?)
        } else {
            None
        };

        Ok(match server_type {
            ServerType::Official => Self::Official { url, pass_ip },
            ServerType::BlessingSkin => Self::BlessingSkin { url, pass_ip },
            ServerType::Custom => Self::Custom { url, mode, pass_ip },
        })
    }

    pub fn server_type(&self) -> ServerType {
        match self {
            Self::Official { .. } => ServerType::Official,
            Self::BlessingSkin { .. } => ServerType::BlessingSkin,
            Self::Custom { .. } => ServerType::Custom,
        }
    }

    pub fn url(&self) -> &Template {
        match self {
            Self::Official { url, .. }
            | Self::BlessingSkin { url, .. }
            | Self::Custom { url, .. } => url,
        }
    }

    /// The IP sub-template, if IP passing is enabled.
    pub fn pass_ip(&self) -> Option<&Template> {
        match self {
            Self::Official { pass_ip, .. }
            | Self::BlessingSkin { pass_ip, .. }
            | Self::Custom { pass_ip, .. } => pass_ip.as_ref(),
        }
    }

    /// The POST body template, if this backend posts.
    pub fn post_content(&self) -> Option<&Template> {
        match self {
            Self::Custom {
                mode: RequestMode::Post { content },
                ..
            } => Some(content),
            _ => None,
        }
    }

    pub fn is_post(&self) -> bool {
        self.post_content().is_some()
    }

    fn ip_segment(&self, ip: Option<&str>) -> String {
        match (self.pass_ip(), ip.filter(|ip| !ip.is_empty())) {
            (Some(template), Some(ip)) => template.format(&[ip]),
            _ => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// BackendDescriptor
// ---------------------------------------------------------------------------

/// Validated configuration for one identity backend.
///
/// Two descriptors with the same `path` are the same identity domain:
/// equality and hashing look at `path` only.
#[derive(Debug, Clone)]
pub struct BackendDescriptor {
    path: String,
    enabled: bool,
    name: String,
    body: BackendBody,
    conv_uuid: UuidConversion,
    conv_repeat: bool,
    name_pattern: Option<NamePattern>,
    whitelist: bool,
    refuse_repeated_login: bool,
    safe_id: bool,
    auth_retry: u32,
}

impl BackendDescriptor {
    /// Builds and validates the descriptor for `path`.
    ///
    /// `safe_id` defaults to `false`; every other key is required.
    /// `name_allowed_regular` must be present but may be empty (no
    /// per-backend pattern).
    pub fn from_raw(
        path: impl Into<String>,
        raw: RawBackendConfig,
    ) -> Result<Self, ConfigError> {
        let path = path.into();
        let enabled = required(raw.enable, "enable")?;
        let name = required(raw.name, "name")?;
        let body = required(raw.body, "body")?;
        let conv_uuid = required(raw.conv_uuid, "conv_uuid")?;
        let conv_repeat = required(raw.conv_repeat, "conv_repeat")?;
        let name_allowed_regular =
            required(raw.name_allowed_regular, "name_allowed_regular")?;
        let whitelist = required(raw.whitelist, "whitelist")?;
        let refuse_repeated_login =
            required(raw.refuse_repeated_login, "refuse_repeated_login")?;
        let auth_retry = required(raw.auth_retry, "auth_retry")?;

        let body = BackendBody::from_raw(body)?;
        let name_pattern = NamePattern::optional(Some(&name_allowed_regular))?;

        Ok(Self {
            path,
            enabled,
            name,
            body,
            conv_uuid,
            conv_repeat,
            name_pattern,
            whitelist,
            refuse_repeated_login,
            safe_id: raw.safe_id.unwrap_or(false),
            auth_retry,
        })
    }

    /// Parses a single `[services.<path>]` table from TOML text.
    pub fn from_toml(
        path: impl Into<String>,
        text: &str,
    ) -> Result<Self, ConfigError> {
        let raw: RawBackendConfig = toml::from_str(text)?;
        Self::from_raw(path, raw)
    }

    /// The config key of this backend; stored on every record it creates.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Display name, used in player-facing messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &BackendBody {
        &self.body
    }

    pub fn conv_uuid(&self) -> UuidConversion {
        self.conv_uuid
    }

    /// Whether new local identities are re-rolled until unique.
    pub fn conv_repeat(&self) -> bool {
        self.conv_repeat
    }

    /// The per-backend name pattern, overriding the global one.
    pub fn name_pattern(&self) -> Option<&NamePattern> {
        self.name_pattern.as_ref()
    }

    /// Whether this backend requires players to be whitelisted.
    pub fn whitelist(&self) -> bool {
        self.whitelist
    }

    pub fn refuse_repeated_login(&self) -> bool {
        self.refuse_repeated_login
    }

    /// Whether the backend guarantees unique names per identity, which
    /// exempts it from the name-collision check.
    pub fn safe_id(&self) -> bool {
        self.safe_id
    }

    /// Retries the gateway should make for the network call.
    pub fn auth_retry(&self) -> u32 {
        self.auth_retry
    }

    /// The request URL.
    ///
    /// In POST mode this is the configured URL as written; otherwise the
    /// URL template filled with username, server id, and, when IP passing
    /// is on and `ip` is non-empty, the rendered IP segment.
    pub fn build_request_url(
        &self,
        username: &str,
        server_id: &str,
        ip: Option<&str>,
    ) -> String {
        if self.body.is_post() {
            return self.body.url().source().to_string();
        }
        let ip_segment = self.body.ip_segment(ip);
        self.body.url().format(&[username, server_id, &ip_segment])
    }

    /// The POST body, or `None` for GET backends.
    pub fn build_request_body(
        &self,
        username: &str,
        server_id: &str,
        ip: Option<&str>,
    ) -> Option<String> {
        let content = self.body.post_content()?;
        let ip_segment = self.body.ip_segment(ip);
        Some(content.format(&[username, server_id, &ip_segment]))
    }
}

impl PartialEq for BackendDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for BackendDescriptor {}

impl Hash for BackendDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
