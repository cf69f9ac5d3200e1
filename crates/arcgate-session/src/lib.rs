//! Live session state for Arcgate.
//!
//! The game server keeps its connected players on one authoritative task
//! (its main loop). Login attempts run elsewhere, so this crate provides:
//!
//! 1. **A registry contract** ([`SessionRegistry`]) — what the login core
//!    needs to know about live sessions, and how it disconnects them
//! 2. **An in-memory registry** ([`SessionManager`]) — one session per
//!    local identity, with a disconnect notice channel per player
//! 3. **A handoff** ([`SessionCoordinator`]) — runs a closure on the task
//!    that owns the registry and waits for the result, with a timeout
//!
//! # How it fits in the stack
//!
//! ```text
//! Pipeline (above)  ← submits the final session check through the coordinator
//!     ↕
//! Session Layer (this crate)  ← owns live-session state
//!     ↕
//! Protocol Layer (below)  ← provides LocalId, DisconnectReason
//! ```

mod coordinator;
mod error;
mod manager;
mod session;

pub use coordinator::{CoordinatorConfig, SessionCoordinator, TaskQueue};
pub use error::{CoordinatorError, SessionError};
pub use manager::{DisconnectNotices, SessionManager};
pub use session::{LiveSession, SessionRegistry};
