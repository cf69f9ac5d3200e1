//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding backend payloads.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing field, or an id
    /// that is not a UUID.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The payload decoded but violates a protocol rule.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
