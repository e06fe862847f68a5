use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Role;

/// SessionData
///
/// The credential state carried by one visitor session. A fresh session is
/// anonymous; sign-ins and gate unlocks upgrade it in place:
/// - `role` is set by a role-authenticated sign-in (exactly one role at a time).
/// - `client_code` is the active client identity written by the client-portal login.
/// - `unlocked` holds the storage keys of password-gated resources opened this
///   session. Membership is terminal: there is no re-lock operation.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub role: Option<Role>,
    pub client_code: Option<String>,
    pub unlocked: HashSet<String>,
    pub created_at: DateTime<Utc>,
}

/// SessionStore Trait
///
/// Defines the abstract contract for the session credential store. Handlers and
/// extractors interact with sessions through this trait only, keeping the
/// concrete backing (in-memory, or something durable later) swappable.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn SessionStore>`) safely shareable across Axum's async task boundaries.
///
/// Every mutating method returns whether the session existed; operating on a
/// destroyed or unknown session is a no-op reported as `false`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a fresh anonymous session and returns its id.
    async fn create(&self) -> Uuid;
    /// Snapshot of a session's current credential state.
    async fn get(&self, id: Uuid) -> Option<SessionData>;
    /// Marks the session role-authenticated.
    async fn set_role(&self, id: Uuid, role: Role) -> bool;
    /// Writes the active client identity.
    async fn set_client(&self, id: Uuid, code: &str) -> bool;
    /// Clears the active client identity (client-portal logout). The rest of
    /// the session survives.
    async fn clear_client(&self, id: Uuid) -> bool;
    /// Records a successful password-gate unlock for `storage_key`.
    async fn grant_unlock(&self, id: Uuid, storage_key: &str) -> bool;
    /// Reads one unlock flag. No side effects.
    async fn is_unlocked(&self, id: Uuid, storage_key: &str) -> bool;
    /// Destroys the session entirely (sign-out). All credential state goes with it.
    async fn destroy(&self, id: Uuid) -> bool;
}

/// SessionState
///
/// The concrete type used to share the session store across the application state.
pub type SessionState = Arc<dyn SessionStore>;

/// InMemorySessionStore
///
/// The concrete implementation of `SessionStore`, holding all sessions in a
/// process-local map. Sessions are ephemeral by design: they live for the
/// duration of a browser tab's visit and die with the process. Each session id
/// keys an independent record, so concurrent visitors never observe each
/// other's credential state.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, SessionData>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let data = SessionData {
            role: None,
            client_code: None,
            unlocked: HashSet::new(),
            created_at: Utc::now(),
        };
        self.sessions.write().await.insert(id, data);
        id
    }

    async fn get(&self, id: Uuid) -> Option<SessionData> {
        self.sessions.read().await.get(&id).cloned()
    }

    async fn set_role(&self, id: Uuid, role: Role) -> bool {
        match self.sessions.write().await.get_mut(&id) {
            Some(data) => {
                data.role = Some(role);
                true
            }
            None => false,
        }
    }

    async fn set_client(&self, id: Uuid, code: &str) -> bool {
        match self.sessions.write().await.get_mut(&id) {
            Some(data) => {
                data.client_code = Some(code.to_string());
                true
            }
            None => false,
        }
    }

    async fn clear_client(&self, id: Uuid) -> bool {
        match self.sessions.write().await.get_mut(&id) {
            Some(data) => {
                data.client_code = None;
                true
            }
            None => false,
        }
    }

    async fn grant_unlock(&self, id: Uuid, storage_key: &str) -> bool {
        match self.sessions.write().await.get_mut(&id) {
            Some(data) => {
                data.unlocked.insert(storage_key.to_string());
                true
            }
            None => false,
        }
    }

    async fn is_unlocked(&self, id: Uuid, storage_key: &str) -> bool {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|data| data.unlocked.contains(storage_key))
            .unwrap_or(false)
    }

    async fn destroy(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }
}
