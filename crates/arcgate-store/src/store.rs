//! The storage contract the verification pipeline relies on.

use std::future::Future;

use arcgate_protocol::{LocalId, RemoteId};

use crate::{StoreError, UserRecord};

/// Persistent identity records.
///
/// # Atomicity
///
/// Implementations must make `insert` a compare-and-swap: when two login
/// attempts for the same `remote_id` race, exactly one insert succeeds and
/// the other gets [`StoreError::AlreadyExists`]. Each write must be atomic
/// per record; a half-applied write must never be observable. The pipeline
/// does no locking of its own.
///
/// Failures are always reported, never swallowed: an `update` of a record
/// that is not stored is [`StoreError::NotFound`].
pub trait UserRecordStore: Send + Sync + 'static {
    /// The record for `remote_id`, if any.
    fn get_by_remote_id(
        &self,
        remote_id: RemoteId,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send;

    /// Every record whose `current_name` equals `name` exactly.
    fn get_by_current_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<UserRecord>, StoreError>> + Send;

    /// Every record whose `local_id` equals `local_id`.
    fn get_by_local_id(
        &self,
        local_id: LocalId,
    ) -> impl Future<Output = Result<Vec<UserRecord>, StoreError>> + Send;

    /// Stores a new record. Fails with [`StoreError::AlreadyExists`] if
    /// its `remote_id` is taken.
    fn insert(
        &self,
        record: &UserRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Overwrites the stored record with the same `remote_id`.
    fn update(
        &self,
        record: &UserRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
