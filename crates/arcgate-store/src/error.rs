//! Error types for the storage layer.

use arcgate_protocol::RemoteId;

/// Errors a [`UserRecordStore`](crate::UserRecordStore) can report.
///
/// The pipeline treats every variant as an internal failure of the login
/// attempt, except `AlreadyExists` on insert, which means a concurrent
/// attempt for the same identity won the race.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert found a record with this remote identity already present.
    #[error("a record for {0} already exists")]
    AlreadyExists(RemoteId),

    /// An update targeted a record that is not stored.
    #[error("no record for {0}")]
    NotFound(RemoteId),

    /// The storage engine failed (connection lost, query error, ...).
    #[error("storage backend failure: {0}")]
    Backend(String),
}
