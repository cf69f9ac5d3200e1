//! Live session data and the registry contract.

use arcgate_protocol::{DisconnectReason, LocalId};

/// A connected player, as the login core sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveSession {
    /// The identity the game server knows the player by.
    pub local_id: LocalId,

    /// The display name the player is connected under.
    pub name: String,
}

impl LiveSession {
    pub fn new(local_id: LocalId, name: impl Into<String>) -> Self {
        Self {
            local_id,
            name: name.into(),
        }
    }
}

/// The game server's live-session state, seen from the login core.
///
/// Implementations are only ever touched from the task that owns them;
/// login attempts reach them through a
/// [`SessionCoordinator`](crate::SessionCoordinator). That is why the
/// methods take `&mut self` / `&self` without any locking and the trait
/// only needs `Send`.
pub trait SessionRegistry: Send + 'static {
    /// Every live session connected under `name` (exact match).
    fn find_by_name(&self, name: &str) -> Vec<LiveSession>;

    /// The live session bound to `local_id`, if any.
    fn find_by_local_id(&self, local_id: LocalId) -> Option<LiveSession>;

    /// Ends `session`, telling the player why.
    ///
    /// Disconnecting a session that is already gone is a no-op.
    fn disconnect(&mut self, session: &LiveSession, reason: DisconnectReason);
}
