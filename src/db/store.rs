use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{FeatureVector, InteractionEvent, InteractionKind, ItemId, PreferenceVector, UserId},
};

/// Read access to catalog item features
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Returns the feature vector of an item, or `None` if the item is not cataloged
    async fn item_features(&self, item_id: &ItemId) -> AppResult<Option<FeatureVector>>;
}

/// Per-user preference vectors
///
/// Callers are responsible for serializing read-modify-write cycles for one user;
/// implementations only need to make single reads and writes atomic.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Returns the user's preference vector, or `None` if the user does not exist.
    ///
    /// A stored vector of the wrong length reads as the zero vector.
    async fn preference_vector(&self, user_id: UserId) -> AppResult<Option<PreferenceVector>>;

    /// Overwrites the user's preference vector. Fails with `UserNotFound` if the user is gone.
    async fn set_preference_vector(
        &self,
        user_id: UserId,
        vector: &PreferenceVector,
    ) -> AppResult<()>;
}

/// Append-only interaction ledger
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InteractionLedger: Send + Sync {
    async fn append(&self, event: &InteractionEvent) -> AppResult<()>;

    /// All events for an item, oldest first
    async fn by_item(&self, item_id: &ItemId) -> AppResult<Vec<InteractionEvent>>;

    /// All events by a user, oldest first
    async fn by_user(&self, user_id: UserId) -> AppResult<Vec<InteractionEvent>>;

    /// Most recent like/dislike by `user_id` for each of `item_ids`.
    ///
    /// Items without such an event are absent from the map.
    async fn latest_reactions(
        &self,
        user_id: UserId,
        item_ids: &[ItemId],
    ) -> AppResult<HashMap<ItemId, InteractionKind>>;
}
