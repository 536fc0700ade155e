//! In-process implementations of the storage collaborators.
//!
//! Used by tests and by embedders that do not run Postgres. Each store guards its
//! data with a `tokio::sync::RwLock`, so single reads and writes are atomic.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::store::{CatalogStore, InteractionLedger, PreferenceStore};
use crate::{
    error::{AppError, AppResult},
    models::{FeatureVector, InteractionEvent, InteractionKind, ItemId, PreferenceVector, UserId},
    services::EngineStores,
};

/// The three in-memory stores, kept as concrete types so callers can seed and inspect them
#[derive(Clone, Default)]
pub struct MemoryStores {
    pub catalog: Arc<MemoryCatalogStore>,
    pub preferences: Arc<MemoryPreferenceStore>,
    pub ledger: Arc<MemoryInteractionLedger>,
}

impl MemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine_stores(&self) -> EngineStores {
        EngineStores {
            catalog: self.catalog.clone(),
            preferences: self.preferences.clone(),
            ledger: self.ledger.clone(),
        }
    }
}

#[derive(Default)]
pub struct MemoryCatalogStore {
    items: RwLock<HashMap<ItemId, FeatureVector>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_item(&self, item_id: ItemId, features: FeatureVector) {
        self.items.write().await.insert(item_id, features);
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn item_features(&self, item_id: &ItemId) -> AppResult<Option<FeatureVector>> {
        Ok(self.items.read().await.get(item_id).copied())
    }
}

/// Users and their raw stored preference arrays
#[derive(Default)]
pub struct MemoryPreferenceStore {
    users: RwLock<HashMap<UserId, Vec<f64>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user with the zero preference vector
    pub async fn create_user(&self, user_id: UserId) {
        self.users
            .write()
            .await
            .insert(user_id, PreferenceVector::zero().to_vec());
    }

    /// Registers a user with an arbitrary stored array, e.g. a legacy empty profile
    pub async fn insert_raw(&self, user_id: UserId, stored: Vec<f64>) {
        self.users.write().await.insert(user_id, stored);
    }

    pub async fn raw(&self, user_id: UserId) -> Option<Vec<f64>> {
        self.users.read().await.get(&user_id).cloned()
    }
}

#[async_trait::async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn preference_vector(&self, user_id: UserId) -> AppResult<Option<PreferenceVector>> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .map(|stored| PreferenceVector::from_stored(stored)))
    }

    async fn set_preference_vector(
        &self,
        user_id: UserId,
        vector: &PreferenceVector,
    ) -> AppResult<()> {
        let mut users = self.users.write().await;
        match users.get_mut(&user_id) {
            Some(stored) => {
                *stored = vector.to_vec();
                Ok(())
            }
            None => Err(AppError::UserNotFound(user_id)),
        }
    }
}

#[derive(Default)]
pub struct MemoryInteractionLedger {
    events: RwLock<Vec<InteractionEvent>>,
}

impl MemoryInteractionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl InteractionLedger for MemoryInteractionLedger {
    async fn append(&self, event: &InteractionEvent) -> AppResult<()> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn by_item(&self, item_id: &ItemId) -> AppResult<Vec<InteractionEvent>> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| &e.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn by_user(&self, user_id: UserId) -> AppResult<Vec<InteractionEvent>> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn latest_reactions(
        &self,
        user_id: UserId,
        item_ids: &[ItemId],
    ) -> AppResult<HashMap<ItemId, InteractionKind>> {
        let events = self.events.read().await;
        let mut latest = HashMap::new();
        // append order is arrival order, so the last match wins
        for event in events.iter() {
            if event.user_id == user_id
                && event.kind.is_reaction()
                && item_ids.contains(&event.item_id)
            {
                latest.insert(event.item_id.clone(), event.kind);
            }
        }
        Ok(latest)
    }
}
