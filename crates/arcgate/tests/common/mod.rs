//! Shared fixtures for the pipeline and gate integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use arcgate::prelude::*;
use arcgate_backend::{RawBackendConfig, RawBody, ServerType};
use arcgate_protocol::LoginContext;
use arcgate_session::DisconnectNotices;
use uuid::Uuid;

/// An official-type backend with every policy switched off.
pub fn backend(display_name: &str) -> RawBackendConfig {
    RawBackendConfig {
        enable: Some(true),
        name: Some(display_name.to_string()),
        body: Some(RawBody {
            server_type: Some(ServerType::Official),
            pass_ip: Some(false),
            ..RawBody::default()
        }),
        conv_uuid: Some(UuidConversion::Preserve),
        conv_repeat: Some(false),
        name_allowed_regular: Some(String::new()),
        whitelist: Some(false),
        refuse_repeated_login: Some(false),
        safe_id: None,
        auth_retry: Some(1),
    }
}

pub fn snapshot(backends: Vec<(&str, RawBackendConfig)>) -> GatewaySnapshot {
    let services: BTreeMap<String, RawBackendConfig> = backends
        .into_iter()
        .map(|(path, raw)| (path.to_string(), raw))
        .collect();
    let registry = BackendRegistry::from_config(&services);
    assert!(registry.rejected().is_empty(), "fixture backend rejected");
    GatewaySnapshot::with_registry(registry)
}

pub fn remote(n: u128) -> RemoteId {
    RemoteId(Uuid::from_u128(n))
}

pub fn login(name: &str) -> LoginContext {
    LoginContext::new(name, "server-hash", Some("127.0.0.1".into()))
}

/// A pipeline over in-memory engines, with its collaborators exposed.
pub struct Harness<S: UserRecordStore = MemoryUserStore> {
    pub store: Arc<S>,
    pub whitelist: Arc<WhitelistCache>,
    pub config: SharedConfig,
    pub sessions: SessionCoordinator<SessionManager>,
    pub pipeline: VerificationPipeline<S, SessionManager>,
}

impl Harness<MemoryUserStore> {
    pub fn new(snapshot: GatewaySnapshot) -> Self {
        Self::with_store(snapshot, MemoryUserStore::new())
    }
}

impl<S: UserRecordStore> Harness<S> {
    pub fn with_store(snapshot: GatewaySnapshot, store: S) -> Self {
        let sessions = SessionCoordinator::spawn(
            SessionManager::new(),
            CoordinatorConfig {
                task_timeout: Duration::from_secs(2),
                queue_capacity: 16,
            },
        );
        Self::with_parts(snapshot, store, sessions)
    }

    pub fn with_parts(
        snapshot: GatewaySnapshot,
        store: S,
        sessions: SessionCoordinator<SessionManager>,
    ) -> Self {
        let store = Arc::new(store);
        let whitelist = Arc::new(WhitelistCache::new());
        let config = SharedConfig::new(snapshot);
        let pipeline = VerificationPipeline::new(
            Arc::clone(&store),
            Arc::clone(&whitelist),
            sessions.clone(),
            config.clone(),
        );
        Self {
            store,
            whitelist,
            config,
            sessions,
            pipeline,
        }
    }

    /// A backend answer from the backend registered under `path`.
    pub fn result(&self, path: &str, id: RemoteId, name: &str) -> BackendResult {
        let backend = self
            .config
            .load()
            .registry()
            .get(path)
            .expect("backend registered in fixture");
        BackendResult::new(backend, VerifiedProfile::new(id, name))
    }

    pub async fn verify(&self, path: &str, id: RemoteId, name: &str) -> VerifyOutcome {
        self.try_verify(path, id, name)
            .await
            .expect("verification should not fail internally")
    }

    pub async fn try_verify(
        &self,
        path: &str,
        id: RemoteId,
        name: &str,
    ) -> Result<VerifyOutcome, VerifyError> {
        let result = self.result(path, id, name);
        self.pipeline.verify(&result, &login(name)).await
    }

    /// Registers a live session, as the game server would after admission.
    pub async fn connect(&self, local_id: LocalId, name: &str) -> DisconnectNotices {
        let name = name.to_string();
        self.sessions
            .run(move |m: &mut SessionManager| m.admit(local_id, name))
            .await
            .expect("coordinator running")
            .expect("not yet connected")
    }

    pub async fn is_connected(&self, local_id: LocalId) -> bool {
        self.sessions
            .run(move |m: &mut SessionManager| m.get(&local_id).is_some())
            .await
            .expect("coordinator running")
    }
}

/// A store whose reads work but whose writes always fail.
#[derive(Default)]
pub struct ReadOnlyStore {
    inner: MemoryUserStore,
}

impl ReadOnlyStore {
    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            inner: MemoryUserStore::with_records(records),
        }
    }
}

impl UserRecordStore for ReadOnlyStore {
    async fn get_by_remote_id(
        &self,
        remote_id: RemoteId,
    ) -> Result<Option<UserRecord>, StoreError> {
        self.inner.get_by_remote_id(remote_id).await
    }

    async fn get_by_current_name(
        &self,
        name: &str,
    ) -> Result<Vec<UserRecord>, StoreError> {
        self.inner.get_by_current_name(name).await
    }

    async fn get_by_local_id(
        &self,
        local_id: LocalId,
    ) -> Result<Vec<UserRecord>, StoreError> {
        self.inner.get_by_local_id(local_id).await
    }

    async fn insert(&self, _record: &UserRecord) -> Result<(), StoreError> {
        Err(StoreError::Backend("database is read-only".into()))
    }

    async fn update(&self, _record: &UserRecord) -> Result<(), StoreError> {
        Err(StoreError::Backend("database is read-only".into()))
    }
}

/// A store where every local identity is already taken.
#[derive(Default)]
pub struct CrowdedStore {
    inner: MemoryUserStore,
}

impl UserRecordStore for CrowdedStore {
    async fn get_by_remote_id(
        &self,
        remote_id: RemoteId,
    ) -> Result<Option<UserRecord>, StoreError> {
        self.inner.get_by_remote_id(remote_id).await
    }

    async fn get_by_current_name(
        &self,
        name: &str,
    ) -> Result<Vec<UserRecord>, StoreError> {
        self.inner.get_by_current_name(name).await
    }

    async fn get_by_local_id(
        &self,
        local_id: LocalId,
    ) -> Result<Vec<UserRecord>, StoreError> {
        Ok(vec![UserRecord::new(
            RemoteId(Uuid::new_v4()),
            "someone",
            local_id,
            "elsewhere",
        )])
    }

    async fn insert(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.inner.insert(record).await
    }

    async fn update(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.inner.update(record).await
    }
}
