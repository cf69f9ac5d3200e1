//! The client-facing front of the pipeline.

use std::sync::Arc;

use arcgate_protocol::{
    INTERNAL_FAILURE_KEY, LoginContext, MessageRenderer, RejectReason,
};
use arcgate_session::SessionRegistry;
use arcgate_store::{UserRecord, UserRecordStore};
use tokio::sync::Semaphore;

use crate::{BackendResult, VerificationPipeline, VerifyOutcome};

/// What the gateway should do with the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginDecision {
    /// Continue the login as this record.
    Admit(UserRecord),

    /// Close the connection with `message`. `reason` is `None` when the
    /// login failed for an internal reason; the message is then generic.
    Deny {
        reason: Option<RejectReason>,
        message: String,
    },
}

impl LoginDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit(_))
    }
}

/// Bounds how many logins are verified at once and turns pipeline results
/// into [`LoginDecision`]s.
///
/// Internal errors are logged here and never shown to the player.
pub struct LoginGate<S, R, M> {
    pipeline: VerificationPipeline<S, R>,
    renderer: Arc<M>,
    permits: Arc<Semaphore>,
}

impl<S, R, M> Clone for LoginGate<S, R, M> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            renderer: Arc::clone(&self.renderer),
            permits: Arc::clone(&self.permits),
        }
    }
}

impl<S, R, M> LoginGate<S, R, M>
where
    S: UserRecordStore,
    R: SessionRegistry,
    M: MessageRenderer,
{
    /// Creates a gate sized by the current config's
    /// `pipeline.max_concurrent_logins`.
    pub fn new(pipeline: VerificationPipeline<S, R>, renderer: M) -> Self {
        let limit = pipeline.config().load().pipeline().max_concurrent_logins;
        Self::with_limit(pipeline, renderer, limit)
    }

    /// Creates a gate admitting at most `limit` concurrent verifications.
    pub fn with_limit(
        pipeline: VerificationPipeline<S, R>,
        renderer: M,
        limit: usize,
    ) -> Self {
        Self {
            pipeline,
            renderer: Arc::new(renderer),
            permits: Arc::new(Semaphore::new(limit.max(1))),
        }
    }

    pub fn pipeline(&self) -> &VerificationPipeline<S, R> {
        &self.pipeline
    }

    /// Verification slots currently free.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Verifies one login, waiting for a free slot first.
    pub async fn login(
        &self,
        result: BackendResult,
        login: LoginContext,
    ) -> LoginDecision {
        let Ok(_permit) = self.permits.acquire().await else {
            return self.internal_failure();
        };

        match self.pipeline.verify(&result, &login).await {
            Ok(VerifyOutcome::Allowed(record)) => LoginDecision::Admit(record),
            Ok(VerifyOutcome::Rejected(reason)) => {
                tracing::info!(
                    remote_id = %result.profile.id,
                    backend = %result.backend.path(),
                    name = %result.profile.name,
                    ip = login.ip_or_unknown(),
                    %reason,
                    "login rejected"
                );
                let message = reason.render(self.renderer.as_ref());
                LoginDecision::Deny {
                    reason: Some(reason),
                    message,
                }
            }
            Err(e) => {
                tracing::error!(
                    remote_id = %result.profile.id,
                    backend = %result.backend.path(),
                    name = %result.profile.name,
                    ip = login.ip_or_unknown(),
                    error = %e,
                    "login failed"
                );
                self.internal_failure()
            }
        }
    }

    fn internal_failure(&self) -> LoginDecision {
        LoginDecision::Deny {
            reason: None,
            message: self.renderer.render(INTERNAL_FAILURE_KEY, &[]),
        }
    }
}
