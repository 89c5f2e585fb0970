//! Per-user session context
//!
//! A [`Session`] owns one conversation store together with the credential
//! and model client it was built with. The [`SessionRegistry`] hands out
//! sessions behind a per-session async mutex so each session processes one
//! turn at a time while separate sessions never contend. Sessions left
//! idle longer than the registry's TTL are evicted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{store::ConversationStore, SYSTEM_PROMPT};
use crate::{
    error::{AppError, AppResult},
    llm::{ChatModel, ModelFactory},
};

/// Outcome of reconciling the session with the credential of a new turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSync {
    /// The held client was built with this credential already
    Unchanged,
    /// A client was built for the first time (or after a reset)
    Initialized,
    /// The credential differs from the one in use; history was cleared
    Rotated,
}

impl CredentialSync {
    /// Whether the conversation was cleared by this sync
    pub fn cleared_history(&self) -> bool {
        matches!(self, CredentialSync::Rotated)
    }
}

/// Session-scoped state: store, active credential, cached client handle
pub struct Session {
    id: String,
    store: ConversationStore,
    credential: Option<String>,
    client: Option<Arc<dyn ChatModel>>,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session whose store is seeded with the system prompt
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            store: ConversationStore::seeded(SYSTEM_PROMPT),
            credential: None,
            client: None,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConversationStore {
        &mut self.store
    }

    /// The held model client, if one has been built
    pub fn client(&self) -> Option<Arc<dyn ChatModel>> {
        self.client.clone()
    }

    /// Explicit reset: clear the conversation and drop the client handle
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn reset(&mut self) {
        self.store.reset();
        self.client = None;
        self.credential = None;
        info!("Session reset");
    }

    /// Make sure the held client matches `api_key`
    ///
    /// Builds a client when none is held or when the credential changed.
    /// A changed credential also clears the conversation. If the factory
    /// rejects the key, the old handle is discarded so no further turn can
    /// run until a valid key arrives; the last accepted credential is kept
    /// so a later, different key still counts as a change.
    #[instrument(skip(self, api_key, factory), fields(session_id = %self.id))]
    pub fn sync_credential(
        &mut self,
        api_key: &str,
        factory: &dyn ModelFactory,
    ) -> AppResult<CredentialSync> {
        let api_key = api_key.trim();
        if self.client.is_some() && self.credential.as_deref() == Some(api_key) {
            return Ok(CredentialSync::Unchanged);
        }

        let rotated = matches!(&self.credential, Some(previous) if previous != api_key);

        let client = match factory.build(api_key) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Model client construction failed");
                self.client = None;
                return Err(e);
            }
        };

        self.client = Some(client);
        self.credential = Some(api_key.to_string());

        if rotated {
            self.store.reset();
            info!("Credential changed, conversation cleared");
            Ok(CredentialSync::Rotated)
        } else {
            debug!("Model client initialized");
            Ok(CredentialSync::Initialized)
        }
    }
}

/// Registry slot: the session plus when it was last handed out
struct SessionEntry {
    session: Arc<Mutex<Session>>,
    last_active: Instant,
}

impl SessionEntry {
    fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            last_active: Instant::now(),
        }
    }

    fn is_expired(&self, idle_ttl: Option<Duration>) -> bool {
        idle_ttl
            .map(|ttl| self.last_active.elapsed() > ttl)
            .unwrap_or(false)
    }
}

/// All live sessions of the process
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    /// `None` keeps sessions until they are removed explicitly
    idle_ttl: Option<Duration>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that evicts sessions idle for longer than `idle_ttl`
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl: Some(idle_ttl),
        }
    }

    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl
    }

    /// Start a new session and return its id
    pub async fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        Self::evict_expired(&mut sessions, self.idle_ttl);
        sessions.insert(id.clone(), SessionEntry::new(Session::new(id.clone())));
        debug!(session_id = %id, "Session created");
        id
    }

    /// Look up a session by id and mark it active
    ///
    /// A session idle past the TTL is evicted here and reported as missing.
    pub async fn get(&self, id: &str) -> AppResult<Arc<Mutex<Session>>> {
        let mut sessions = self.sessions.write().await;

        if sessions
            .get(id)
            .is_some_and(|entry| entry.is_expired(self.idle_ttl))
        {
            sessions.remove(id);
            info!(session_id = %id, "Idle session expired");
        }

        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Session {}", id)))?;
        entry.last_active = Instant::now();
        Ok(entry.session.clone())
    }

    /// End a session; returns whether it existed
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            debug!(session_id = %id, "Session ended");
        }
        removed
    }

    /// Drop every session idle past the TTL; returns how many went
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        Self::evict_expired(&mut sessions, self.idle_ttl)
    }

    fn evict_expired(
        sessions: &mut HashMap<String, SessionEntry>,
        idle_ttl: Option<Duration>,
    ) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(idle_ttl));
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Idle sessions evicted");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
