//! Persistence collaborator — best-effort snapshots of session data.
//!
//! The engine's in-memory state is the source of truth; saving is a side
//! channel that must never block step-to-step navigation or roll back a
//! transition. Retry/backoff is the host's concern, not the engine's.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::flow::OnboardingData;

/// Backend-agnostic snapshot store. Saves must be idempotent: the engine
/// offers no transaction semantics and may send the same snapshot twice.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Persist a snapshot of a user's onboarding data.
    async fn save_snapshot(&self, user_id: &str, data: &OnboardingData) -> Result<(), StoreError>;

    /// Load the most recent snapshot for a user, if any.
    async fn load_snapshot(&self, user_id: &str) -> Result<Option<OnboardingData>, StoreError>;
}

/// In-memory store: the default collaborator and the test double.
#[derive(Default)]
pub struct MemoryStore {
    snapshots: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn save_snapshot(&self, user_id: &str, data: &OnboardingData) -> Result<(), StoreError> {
        let value = serde_json::to_value(data)?;
        self.snapshots
            .write()
            .await
            .insert(user_id.to_string(), value);
        Ok(())
    }

    async fn load_snapshot(&self, user_id: &str) -> Result<Option<OnboardingData>, StoreError> {
        let snapshots = self.snapshots.read().await;
        match snapshots.get(user_id) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }
}

/// Fire-and-forget writer the host calls after each submit or at flow
/// completion. Failures are logged and dropped; the user continues locally.
#[derive(Clone)]
pub struct SnapshotWriter {
    store: Arc<dyn ProfileStore>,
}

impl SnapshotWriter {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Spawn a save of the given snapshot. Returns immediately.
    pub fn save(&self, user_id: &str, data: &OnboardingData) {
        let store = Arc::clone(&self.store);
        let user_id = user_id.to_string();
        let data = data.clone();
        tokio::spawn(async move {
            if let Err(e) = store.save_snapshot(&user_id, &data).await {
                tracing::warn!(user = %user_id, "Failed to persist onboarding snapshot: {e}");
            }
        });
    }
}
