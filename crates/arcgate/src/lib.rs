//! # Arcgate
//!
//! Login verification core for game server gateways that accept players
//! from several identity backends at once.
//!
//! A gateway asks some identity backend whether a connecting client is who
//! it claims to be. Arcgate takes the backend's answer and decides whether
//! to let the player in: it reconciles the answer with the stored identity
//! record, enforces name and whitelist policy, keeps local identities
//! stable and unique, and resolves clashes with players already online.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use arcgate::prelude::*;
//!
//! # async fn demo(config: GatewayConfig, profile: VerifiedProfile)
//! #     -> Result<(), ArcgateError> {
//! let coordinator_config = CoordinatorConfig {
//!     task_timeout: config.session.task_timeout(),
//!     queue_capacity: config.session.queue_capacity,
//! };
//! let shared = SharedConfig::new(GatewaySnapshot::build(config)?);
//! let sessions =
//!     SessionCoordinator::spawn(SessionManager::new(), coordinator_config);
//! let pipeline = VerificationPipeline::new(
//!     Arc::new(MemoryUserStore::new()),
//!     Arc::new(WhitelistCache::new()),
//!     sessions,
//!     shared.clone(),
//! );
//! let gate = LoginGate::new(pipeline, PlainRenderer);
//!
//! let backend = shared.load().registry().get("official").unwrap();
//! let decision = gate
//!     .login(
//!         BackendResult::new(backend, profile),
//!         LoginContext::new("Steve", "server-hash", None),
//!     )
//!     .await;
//! # Ok(())
//! # }
//! ```

mod error;
mod gate;
pub mod logging;
mod pipeline;

pub use error::ArcgateError;
pub use gate::{LoginDecision, LoginGate};
pub use pipeline::{BackendResult, VerificationPipeline, VerifyError, VerifyOutcome};

pub use arcgate_backend as backend;
pub use arcgate_protocol as protocol;
pub use arcgate_session as session;
pub use arcgate_store as store;

/// Everything a gateway needs to wire Arcgate up.
pub mod prelude {
    pub use crate::{
        ArcgateError, BackendResult, LoginDecision, LoginGate,
        VerificationPipeline, VerifyError, VerifyOutcome,
    };
    pub use arcgate_backend::{
        BackendDescriptor, BackendRegistry, ConfigError, GatewayConfig,
        GatewaySnapshot, SharedConfig, UuidConversion,
    };
    pub use arcgate_protocol::{
        DisconnectReason, LocalId, LoginContext, MessageRenderer,
        PlainRenderer, RejectReason, RemoteId, VerifiedProfile,
    };
    pub use arcgate_session::{
        CoordinatorConfig, CoordinatorError, LiveSession, SessionCoordinator,
        SessionManager, SessionRegistry,
    };
    pub use arcgate_store::{
        MemoryUserStore, StoreError, UserRecord, UserRecordStore,
        WhitelistCache,
    };
}
