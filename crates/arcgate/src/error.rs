//! Unified error type for Arcgate.

use arcgate_backend::ConfigError;
use arcgate_protocol::ProtocolError;
use arcgate_session::{CoordinatorError, SessionError};
use arcgate_store::StoreError;

use crate::VerifyError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `arcgate` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ArcgateError {
    /// Decoding a backend's profile body failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The gateway config could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The identity store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Live-session bookkeeping failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The live-session owner did not answer.
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    /// A login could not be verified.
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcgate_protocol::{LocalId, RemoteId, Uuid};

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let arcgate_err: ArcgateError = err.into();
        assert!(matches!(arcgate_err, ArcgateError::Protocol(_)));
        assert!(arcgate_err.to_string().contains("bad"));
    }

    #[test]
    fn test_from_config_error() {
        let err = ConfigError::MissingField("url");
        let arcgate_err: ArcgateError = err.into();
        assert!(matches!(arcgate_err, ArcgateError::Config(_)));
        assert!(arcgate_err.to_string().contains("url"));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::NotFound(RemoteId(Uuid::nil()));
        let arcgate_err: ArcgateError = err.into();
        assert!(matches!(arcgate_err, ArcgateError::Store(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::AlreadyConnected(LocalId(Uuid::nil()));
        let arcgate_err: ArcgateError = err.into();
        assert!(matches!(arcgate_err, ArcgateError::Session(_)));
    }

    #[test]
    fn test_from_coordinator_error() {
        let err = CoordinatorError::Unavailable;
        let arcgate_err: ArcgateError = err.into();
        assert!(matches!(arcgate_err, ArcgateError::Coordinator(_)));
    }

    #[test]
    fn test_from_verify_error_keeps_source_message() {
        let err = VerifyError::LocalIdExhausted { attempts: 3 };
        let arcgate_err: ArcgateError = err.into();
        assert!(matches!(arcgate_err, ArcgateError::Verify(_)));
        assert!(arcgate_err.to_string().contains('3'));
    }
}
