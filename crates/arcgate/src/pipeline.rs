//! The verification pipeline: from a backend's answer to an admission
//! decision.
//!
//! One [`VerificationPipeline::verify`] call handles one login attempt.
//! Steps run in a fixed order and any of them may end the attempt:
//!
//! ```text
//! lookup ─→ backend path ─→ name pattern ─→ name owner ─→ new record /
//! rename ─→ local id collisions ─→ whitelist ─→ persist ─→ live sessions
//! ```
//!
//! Policy refusals come back as [`VerifyOutcome::Rejected`]. Only storage
//! failures, a stuck session owner, or an unresolvable local-id collision
//! are errors.

use std::sync::Arc;

use arcgate_backend::{BackendDescriptor, GatewaySnapshot, SharedConfig};
use arcgate_protocol::{
    DisconnectReason, LocalId, LoginContext, RejectReason, VerifiedProfile,
};
use arcgate_session::{CoordinatorError, SessionCoordinator, SessionRegistry};
use arcgate_store::{StoreError, UserRecord, UserRecordStore, WhitelistCache};

/// What an identity backend vouched for, and which backend it was.
#[derive(Debug, Clone)]
pub struct BackendResult {
    pub backend: Arc<BackendDescriptor>,
    pub profile: VerifiedProfile,
}

impl BackendResult {
    pub fn new(backend: Arc<BackendDescriptor>, profile: VerifiedProfile) -> Self {
        Self { backend, profile }
    }
}

/// The pipeline's decision for one login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Let the player in. Carries the record as persisted.
    Allowed(UserRecord),

    /// Refuse the login for a policy reason.
    Rejected(RejectReason),
}

impl VerifyOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// The admitted record, if any.
    pub fn record(&self) -> Option<&UserRecord> {
        match self {
            Self::Allowed(record) => Some(record),
            Self::Rejected(_) => None,
        }
    }

    /// The refusal reason, if any.
    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Allowed(_) => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Internal failures. The player only ever sees a generic message.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("identity store failed: {0}")]
    Store(#[from] StoreError),

    #[error("live session check failed: {0}")]
    Coordinator(#[from] CoordinatorError),

    /// Every candidate local identity drawn was already taken.
    #[error("no free local identity after {attempts} attempts")]
    LocalIdExhausted { attempts: u32 },
}

/// Runs the login verification steps against a store, the pending
/// whitelist, and the live-session owner.
///
/// Cheap to clone; clones share every collaborator.
pub struct VerificationPipeline<S, R> {
    store: Arc<S>,
    whitelist: Arc<WhitelistCache>,
    sessions: SessionCoordinator<R>,
    config: SharedConfig,
}

impl<S, R> Clone for VerificationPipeline<S, R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            whitelist: Arc::clone(&self.whitelist),
            sessions: self.sessions.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S, R> VerificationPipeline<S, R>
where
    S: UserRecordStore,
    R: SessionRegistry,
{
    pub fn new(
        store: Arc<S>,
        whitelist: Arc<WhitelistCache>,
        sessions: SessionCoordinator<R>,
        config: SharedConfig,
    ) -> Self {
        Self {
            store,
            whitelist,
            sessions,
            config,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn whitelist(&self) -> &Arc<WhitelistCache> {
        &self.whitelist
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Decides whether the player `result` vouches for may log in.
    ///
    /// The whole attempt sees one config snapshot, even if the config is
    /// reloaded meanwhile.
    ///
    /// # Errors
    /// See [`VerifyError`]. A first login that loses an insert race to a
    /// concurrent first login for the same remote identity is retried once
    /// transparently.
    pub async fn verify(
        &self,
        result: &BackendResult,
        login: &LoginContext,
    ) -> Result<VerifyOutcome, VerifyError> {
        let snapshot = self.config.load();
        match self.verify_once(&snapshot, result, login).await {
            Err(VerifyError::Store(StoreError::AlreadyExists(remote_id))) => {
                tracing::debug!(
                    %remote_id,
                    "lost first-login race, verifying against stored record"
                );
                self.verify_once(&snapshot, result, login).await
            }
            other => other,
        }
    }

    async fn verify_once(
        &self,
        snapshot: &GatewaySnapshot,
        result: &BackendResult,
        login: &LoginContext,
    ) -> Result<VerifyOutcome, VerifyError> {
        let backend = &result.backend;
        let remote_id = result.profile.id;
        let name = result.profile.name.as_str();
        let path = backend.path();

        tracing::debug!(
            %remote_id,
            backend = %path,
            name,
            ip = login.ip_or_unknown(),
            "verifying login"
        );

        let existing = self.store.get_by_remote_id(remote_id).await?;

        if let Some(record) = &existing {
            if record.backend_path != path {
                let backend_name =
                    snapshot.registry().display_name(&record.backend_path);
                tracing::warn!(
                    %remote_id,
                    backend = %path,
                    bound_backend = %record.backend_path,
                    "identity bound to another backend"
                );
                return Ok(VerifyOutcome::Rejected(RejectReason::PathMismatch {
                    backend_name,
                }));
            }
        }

        if let Some(pattern) =
            backend.name_pattern().or_else(|| snapshot.name_pattern())
        {
            if !pattern.is_match(name) {
                tracing::debug!(%remote_id, name, pattern = pattern.as_str(), "name rejected");
                return Ok(VerifyOutcome::Rejected(
                    RejectReason::UsernameMismatch {
                        name: name.to_string(),
                        pattern: pattern.as_str().to_string(),
                    },
                ));
            }
        }

        if !backend.safe_id() {
            let owners = self.store.get_by_current_name(name).await?;
            if owners.iter().any(|r| r.remote_id != remote_id) {
                tracing::debug!(%remote_id, name, "name owned by another identity");
                return Ok(VerifyOutcome::Rejected(
                    RejectReason::UsernameRepeated {
                        name: name.to_string(),
                    },
                ));
            }
        }

        let is_new = existing.is_none();
        let mut record = match existing {
            Some(record) => record,
            None => UserRecord::new(
                remote_id,
                name,
                backend.conv_uuid().derive(remote_id, name),
                path,
            ),
        };

        if let Some(old_name) = record.rename(name) {
            tracing::debug!(%remote_id, %old_name, name, "display name changed");
        }

        if is_new && backend.conv_repeat() {
            record.local_id = self
                .free_local_id(
                    record.local_id,
                    snapshot.pipeline().max_local_id_attempts,
                )
                .await?;
        }

        let mut consumed = Vec::new();
        if (snapshot.whitelist() || backend.whitelist()) && !record.whitelisted {
            // Remove both forms; a short-circuit would leave the id entry
            // pending after the name entry matched.
            let id_entry = remote_id.to_string();
            if self.whitelist.remove(name) {
                consumed.push(name.to_string());
            }
            if self.whitelist.remove(&id_entry) {
                consumed.push(id_entry);
            }
            if consumed.is_empty() {
                tracing::debug!(%remote_id, name, "not whitelisted");
                return Ok(VerifyOutcome::Rejected(RejectReason::NoWhitelist));
            }
            record.whitelisted = true;
            tracing::info!(%remote_id, name, "pending whitelist entry consumed");
        }

        let persisted = if is_new {
            self.store.insert(&record).await
        } else {
            self.store.update(&record).await
        };
        if let Err(e) = persisted {
            // Nothing was written, so the approval must stay pending.
            if !consumed.is_empty() {
                tracing::warn!(%remote_id, name, "restoring pending whitelist entries");
            }
            for entry in consumed {
                self.whitelist.add(entry);
            }
            return Err(e.into());
        }

        if !self.reconcile_sessions(&record, backend.refuse_repeated_login()).await? {
            tracing::debug!(%remote_id, local_id = %record.local_id, "already online");
            return Ok(VerifyOutcome::Rejected(RejectReason::RepeatLogin));
        }

        tracing::info!(
            %remote_id,
            local_id = %record.local_id,
            backend = %path,
            name,
            new = is_new,
            "login admitted"
        );
        Ok(VerifyOutcome::Allowed(record))
    }

    /// Returns `candidate` if no stored record uses it, else draws random
    /// candidates. `max_attempts` counts every candidate checked.
    async fn free_local_id(
        &self,
        mut candidate: LocalId,
        max_attempts: u32,
    ) -> Result<LocalId, VerifyError> {
        let attempts = max_attempts.max(1);
        for attempt in 1..=attempts {
            if self.store.get_by_local_id(candidate).await?.is_empty() {
                return Ok(candidate);
            }
            tracing::debug!(local_id = %candidate, attempt, "local id taken");
            candidate = LocalId::random();
        }
        Err(VerifyError::LocalIdExhausted { attempts })
    }

    /// Settles clashes with players already online, on the task that owns
    /// the session registry. Returns `false` if the login must be refused
    /// as a repeat login.
    async fn reconcile_sessions(
        &self,
        record: &UserRecord,
        refuse_repeated_login: bool,
    ) -> Result<bool, VerifyError> {
        let local_id = record.local_id;
        let name = record.current_name.clone();

        let admitted = self
            .sessions
            .run(move |registry: &mut R| {
                for session in registry.find_by_name(&name) {
                    if session.local_id != local_id {
                        registry.disconnect(&session, DisconnectReason::BusyUsername);
                    }
                }
                match registry.find_by_local_id(local_id) {
                    Some(_) if refuse_repeated_login => false,
                    Some(session) => {
                        registry.disconnect(&session, DisconnectReason::SessionReplaced);
                        true
                    }
                    None => true,
                }
            })
            .await?;
        Ok(admitted)
    }
}
