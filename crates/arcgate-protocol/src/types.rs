//! Core identity types shared by every Arcgate layer.
//!
//! Two UUIDs describe a player:
//!
//! - the **remote** identity, issued by whichever identity backend
//!   vouched for the player, and
//! - the **local** identity, which the rest of the game server uses.
//!
//! They may be equal, derived from one another, or unrelated, depending on
//! the backend's conversion policy. Keeping them as distinct newtypes means
//! the compiler refuses to mix them up.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The identity token assigned to a player by an identity backend.
///
/// Stable per backend, per account. `#[serde(transparent)]` keeps the
/// on-disk form a bare UUID string rather than `{ "0": "..." }`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct RemoteId(pub Uuid);

impl RemoteId {
    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for RemoteId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Hyphenated lowercase form. Pending whitelist entries that name a
/// player by identity are compared against exactly this string.
impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// The identity the game server uses for a player after reconciliation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct LocalId(pub Uuid);

impl LocalId {
    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// A fresh random (v4) local identity.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for LocalId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<RemoteId> for LocalId {
    fn from(id: RemoteId) -> Self {
        Self(id.0)
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

// ---------------------------------------------------------------------------
// VerifiedProfile — what a backend vouches for
// ---------------------------------------------------------------------------

/// A signed profile property (skin textures and similar) returned by a
/// session server. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileProperty {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// The identity an identity backend confirmed for a connecting client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedProfile {
    /// The remote identity.
    pub id: RemoteId,

    /// The display name, as the backend reports it.
    pub name: String,

    /// Extra profile properties. Empty for most custom backends.
    #[serde(default)]
    pub properties: Vec<ProfileProperty>,
}

impl VerifiedProfile {
    /// Creates a profile without properties.
    pub fn new(id: impl Into<RemoteId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// LoginContext — what the client claimed
// ---------------------------------------------------------------------------

/// The connecting client's side of a login attempt.
///
/// Only used for request building and log context; the pipeline never
/// trusts `username` over the backend's [`VerifiedProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginContext {
    /// The name the client sent in its login packet.
    pub username: String,

    /// The server id hash the client joined with.
    pub server_id: String,

    /// The client's address, if the gateway knows it.
    pub ip: Option<String>,
}

impl LoginContext {
    pub fn new(
        username: impl Into<String>,
        server_id: impl Into<String>,
        ip: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            server_id: server_id.into(),
            ip,
        }
    }

    /// The address for logging, `"unknown"` when absent.
    pub fn ip_or_unknown(&self) -> &str {
        self.ip.as_deref().unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(s: &str) -> Uuid {
        Uuid::parse_str(s).expect("valid uuid literal")
    }

    #[test]
    fn test_remote_id_display_is_hyphenated_lowercase() {
        let id = RemoteId(uuid("069A79F444E94726A5BEFCA90E38AAF5"));
        assert_eq!(id.to_string(), "069a79f4-44e9-4726-a5be-fca90e38aaf5");
    }

    #[test]
    fn test_local_id_from_remote_keeps_uuid() {
        let remote = RemoteId(uuid("069a79f4-44e9-4726-a5be-fca90e38aaf5"));
        let local = LocalId::from(remote);
        assert_eq!(local.as_uuid(), remote.as_uuid());
    }

    #[test]
    fn test_local_id_random_differs() {
        assert_ne!(LocalId::random(), LocalId::random());
    }

    #[test]
    fn test_login_context_ip_or_unknown() {
        let ctx = LoginContext::new("Steve", "abc", None);
        assert_eq!(ctx.ip_or_unknown(), "unknown");

        let ctx = LoginContext::new("Steve", "abc", Some("10.0.0.1".into()));
        assert_eq!(ctx.ip_or_unknown(), "10.0.0.1");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_remote_id_serializes_as_bare_string() {
        let id = RemoteId(uuid("069a79f4-44e9-4726-a5be-fca90e38aaf5"));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"069a79f4-44e9-4726-a5be-fca90e38aaf5\"");
    }
}
