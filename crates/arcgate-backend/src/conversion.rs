//! Local identity derivation policies.

use arcgate_protocol::{LocalId, RemoteId};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

/// How a backend's remote identity becomes a local identity for a
/// player seen for the first time.
///
/// `Preserve` and `NameDerived` are pure, so re-deriving for the same
/// input always yields the same candidate; `Random` draws a fresh v4 UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UuidConversion {
    /// The backend is the identity source: local equals remote.
    #[serde(alias = "default", alias = "DEFAULT")]
    Preserve,

    /// The offline-mode UUID for the display name, so identity-agnostic
    /// servers behind the gateway see the id they would compute themselves.
    #[serde(alias = "offline", alias = "OFFLINE")]
    NameDerived,

    /// A new random identity per record.
    #[serde(alias = "RANDOM")]
    Random,
}

impl UuidConversion {
    /// Derives the candidate local identity.
    pub fn derive(&self, remote_id: RemoteId, name: &str) -> LocalId {
        match self {
            Self::Preserve => LocalId::from(remote_id),
            Self::NameDerived => LocalId(offline_uuid(name)),
            Self::Random => LocalId::random(),
        }
    }
}

/// The offline-mode UUID for `name`: MD5 of `"OfflinePlayer:" + name`,
/// stamped as a version-3, RFC 4122 variant UUID.
pub fn offline_uuid(name: &str) -> Uuid {
    let digest = Md5::digest(format!("OfflinePlayer:{name}").as_bytes());
    Builder::from_md5_bytes(digest.into()).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> RemoteId {
        RemoteId(Uuid::parse_str("069a79f4-44e9-4726-a5be-fca90e38aaf5").unwrap())
    }

    #[test]
    fn test_offline_uuid_known_values() {
        assert_eq!(
            offline_uuid("Notch").to_string(),
            "b50ad385-829d-3141-a216-7e7d7539ba7f"
        );
        assert_eq!(
            offline_uuid("Steve").to_string(),
            "5627dd98-e6be-3c21-b8a8-e92344183641"
        );
    }

    #[test]
    fn test_offline_uuid_is_version_3() {
        assert_eq!(offline_uuid("Alex").get_version_num(), 3);
    }

    #[test]
    fn test_preserve_keeps_remote_id() {
        let local = UuidConversion::Preserve.derive(remote(), "Notch");
        assert_eq!(local.as_uuid(), remote().as_uuid());
    }

    #[test]
    fn test_name_derived_ignores_remote_id() {
        let other = RemoteId(Uuid::new_v4());
        let a = UuidConversion::NameDerived.derive(remote(), "Steve");
        let b = UuidConversion::NameDerived.derive(other, "Steve");
        assert_eq!(a, b);
        assert_ne!(a, UuidConversion::NameDerived.derive(remote(), "Alex"));
    }

    #[test]
    fn test_random_differs_per_call() {
        let a = UuidConversion::Random.derive(remote(), "Steve");
        let b = UuidConversion::Random.derive(remote(), "Steve");
        assert_ne!(a, b);
    }

    #[test]
    fn test_deserialize_accepts_legacy_names() {
        #[derive(Deserialize)]
        struct Holder {
            conv: UuidConversion,
        }
        let h: Holder = toml::from_str("conv = \"DEFAULT\"").unwrap();
        assert_eq!(h.conv, UuidConversion::Preserve);
        let h: Holder = toml::from_str("conv = \"offline\"").unwrap();
        assert_eq!(h.conv, UuidConversion::NameDerived);
        let h: Holder = toml::from_str("conv = \"name_derived\"").unwrap();
        assert_eq!(h.conv, UuidConversion::NameDerived);
    }
}
