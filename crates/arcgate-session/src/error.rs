//! Error types for the session layer.

use std::time::Duration;

use arcgate_protocol::LocalId;

/// Errors from [`SessionManager`](crate::SessionManager) bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The local identity already has a live session.
    #[error("player {0} already has a live session")]
    AlreadyConnected(LocalId),

    /// No live session exists for the given local identity.
    #[error("no live session for player {0}")]
    NotFound(LocalId),
}

/// Errors from handing a task to the authoritative task.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// No reply arrived within the configured timeout. A task the owner
    /// had not started yet is skipped.
    #[error("session task timed out after {0:?}")]
    Timeout(Duration),

    /// The owning task has stopped; the queue is closed.
    #[error("session coordinator is not running")]
    Unavailable,

    /// The task panicked on the owning task. The owner keeps running.
    #[error("session task panicked")]
    TaskPanicked,
}
