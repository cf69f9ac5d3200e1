//! The durable identity record.

use arcgate_protocol::{LocalId, RemoteId};
use serde::{Deserialize, Serialize};

/// Binds a remote identity, as vouched for by one backend, to the local
/// identity the game server uses.
///
/// - `remote_id` is unique across all records.
/// - `backend_path` never changes once set; a login for the same
///   `remote_id` through another backend is refused.
/// - `local_id` is unique among records created with collision avoidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub remote_id: RemoteId,
    pub current_name: String,
    pub local_id: LocalId,
    pub backend_path: String,
    pub whitelisted: bool,
}

impl UserRecord {
    /// A fresh, not-yet-whitelisted record.
    pub fn new(
        remote_id: RemoteId,
        current_name: impl Into<String>,
        local_id: LocalId,
        backend_path: impl Into<String>,
    ) -> Self {
        Self {
            remote_id,
            current_name: current_name.into(),
            local_id,
            backend_path: backend_path.into(),
            whitelisted: false,
        }
    }

    /// Sets `current_name`, returning the previous name if it changed.
    pub fn rename(&mut self, name: &str) -> Option<String> {
        if self.current_name == name {
            return None;
        }
        Some(std::mem::replace(&mut self.current_name, name.to_string()))
    }
}
