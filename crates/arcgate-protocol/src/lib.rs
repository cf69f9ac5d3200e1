//! Shared vocabulary for Arcgate.
//!
//! This crate defines the types every other layer speaks:
//!
//! - **Identities** ([`RemoteId`], [`LocalId`]) — who a player is according
//!   to an identity backend, and who they are to the game server.
//! - **Login inputs** ([`VerifiedProfile`], [`LoginContext`]) — what the
//!   backend confirmed and what the client claimed.
//! - **Reasons** ([`RejectReason`], [`DisconnectReason`]) — structured,
//!   renderer-keyed explanations; never pre-formatted text.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — decoding a backend's
//!   profile body.
//!
//! # Architecture
//!
//! ```text
//! Backend (descriptors) → Protocol (identities) → Store / Session → Pipeline
//! ```

mod codec;
mod error;
mod reason;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use reason::{
    DisconnectReason, INTERNAL_FAILURE_KEY, MessageParam, MessageRenderer,
    PlainRenderer, RejectReason,
};
pub use types::{
    LocalId, LoginContext, ProfileProperty, RemoteId, VerifiedProfile,
};

pub use uuid::Uuid;
