//! Codecs for the structured results identity backends return.
//!
//! A session server answers a `hasJoined` query with a small JSON profile:
//!
//! ```json
//! { "id": "069a79f444e94726a5befca90e38aaf5", "name": "Notch", "properties": [] }
//! ```
//!
//! The id may be undashed (most session servers) or hyphenated (some
//! custom backends); both decode to the same [`RemoteId`](crate::RemoteId).
//! The HTTP call itself belongs to the gateway — this layer only turns the
//! body bytes into a [`VerifiedProfile`].

use serde::{Serialize, de::DeserializeOwned};

use crate::{ProtocolError, VerifiedProfile};

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `encode`/`decode` are generic over any serde type, so the same codec
/// that reads profiles can also write records for a storage engine.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;

    /// Decodes a backend's `hasJoined` body into a verified profile.
    ///
    /// # Errors
    /// - [`ProtocolError::Decode`] — malformed body or id
    /// - [`ProtocolError::InvalidMessage`] — the profile has an empty name
    fn decode_profile(
        &self,
        data: &[u8],
    ) -> Result<VerifiedProfile, ProtocolError> {
        let profile: VerifiedProfile = self.decode(data)?;
        if profile.name.trim().is_empty() {
            return Err(ProtocolError::InvalidMessage(
                "profile has an empty name".into(),
            ));
        }
        Ok(profile)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`. Behind the `json` feature (default).
///
/// ```rust
/// use arcgate_protocol::{Codec, JsonCodec};
///
/// let body = br#"{"id":"069a79f444e94726a5befca90e38aaf5","name":"Notch"}"#;
/// let profile = JsonCodec.decode_profile(body).unwrap();
/// assert_eq!(profile.name, "Notch");
/// assert_eq!(profile.id.to_string(), "069a79f4-44e9-4726-a5be-fca90e38aaf5");
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
