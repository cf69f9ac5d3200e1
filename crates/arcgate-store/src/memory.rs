//! In-memory [`UserRecordStore`].

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use arcgate_protocol::{LocalId, RemoteId};
use parking_lot::RwLock;

use crate::{StoreError, UserRecord, UserRecordStore};

/// Records kept in a `HashMap` behind one lock.
///
/// Every operation takes the lock once and never holds it across an
/// `.await`, so each call is atomic and `insert` is a true
/// compare-and-swap. Name and local-id lookups scan all records; fine for
/// tests and small deployments, not for a large player base.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    records: RwLock<HashMap<RemoteId, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `records` (later duplicates win).
    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.remote_id, r))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// A copy of every record, in no particular order.
    pub fn records(&self) -> Vec<UserRecord> {
        self.records.read().values().cloned().collect()
    }
}

impl UserRecordStore for MemoryUserStore {
    async fn get_by_remote_id(
        &self,
        remote_id: RemoteId,
    ) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.records.read().get(&remote_id).cloned())
    }

    async fn get_by_current_name(
        &self,
        name: &str,
    ) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|r| r.current_name == name)
            .cloned()
            .collect())
    }

    async fn get_by_local_id(
        &self,
        local_id: LocalId,
    ) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|r| r.local_id == local_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, record: &UserRecord) -> Result<(), StoreError> {
        match self.records.write().entry(record.remote_id) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(record.remote_id)),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                tracing::debug!(
                    remote_id = %record.remote_id,
                    local_id = %record.local_id,
                    "record inserted"
                );
                Ok(())
            }
        }
    }

    async fn update(&self, record: &UserRecord) -> Result<(), StoreError> {
        match self.records.write().get_mut(&record.remote_id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(record.remote_id)),
        }
    }
}
