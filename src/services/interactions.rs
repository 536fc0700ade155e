use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    db::{CatalogStore, InteractionLedger, PreferenceStore},
    error::{AppError, AppResult},
    models::{
        InteractionEvent, InteractionKind, InteractionNotification, InteractionState, ItemId,
        PreferenceVector, RecordedInteraction, UserId,
    },
    services::{
        publisher::EventPublisher,
        scoring::{scale_features, update_preference, EngineSettings},
        user_locks::UserLocks,
    },
};

/// Storage collaborators used by the engine
#[derive(Clone)]
pub struct EngineStores {
    pub catalog: Arc<dyn CatalogStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub ledger: Arc<dyn InteractionLedger>,
}

/// Turns user interactions into ledger entries, preference updates and notifications
///
/// Each accepted interaction:
/// 1. resolves the kind to its weight,
/// 2. scales the item's features by that weight,
/// 3. folds the scaled vector into the user's preference vector (EMA),
/// 4. appends the raw event to the ledger,
/// 5. hands a notification to the publisher without waiting for it.
///
/// Steps 3 and 4 run under the user's lock, so concurrent interactions by one
/// user are applied one after another and the ledger records them in that order.
#[derive(Clone)]
pub struct InteractionEngine {
    stores: EngineStores,
    publisher: EventPublisher,
    settings: Arc<EngineSettings>,
    locks: UserLocks,
}

impl InteractionEngine {
    pub fn new(stores: EngineStores, publisher: EventPublisher, settings: Arc<EngineSettings>) -> Self {
        let locks = UserLocks::new(settings.lock_shards);
        Self {
            stores,
            publisher,
            settings,
            locks,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Records an interaction given its raw kind name
    ///
    /// Unknown kinds fail with `InvalidInteractionKind` before any storage access.
    pub async fn record_interaction(
        &self,
        user_id: UserId,
        item_id: &ItemId,
        kind: &str,
    ) -> AppResult<RecordedInteraction> {
        let (kind, weight) = self.settings.weights.resolve(kind).map_err(|e| {
            tracing::warn!(user_id = %user_id, item_id = %item_id, error = %e, "Rejected interaction");
            e
        })?;
        self.apply(user_id, item_id, kind, weight).await
    }

    /// Records an interaction of an already parsed kind
    pub async fn record(
        &self,
        user_id: UserId,
        item_id: &ItemId,
        kind: InteractionKind,
    ) -> AppResult<RecordedInteraction> {
        let weight = self.settings.weights.weight(kind);
        self.apply(user_id, item_id, kind, weight).await
    }

    async fn apply(
        &self,
        user_id: UserId,
        item_id: &ItemId,
        kind: InteractionKind,
        weight: f64,
    ) -> AppResult<RecordedInteraction> {
        let features = self
            .stores
            .catalog
            .item_features(item_id)
            .await?
            .ok_or_else(|| AppError::ItemNotFound(item_id.clone()))?;
        let scaled = scale_features(&features, weight);

        let guard = self.locks.lock(user_id).await;

        let current = self
            .stores
            .preferences
            .preference_vector(user_id)
            .await?
            .ok_or(AppError::UserNotFound(user_id))?;
        let updated = update_preference(&current, &scaled, self.settings.smoothing);

        self.stores
            .preferences
            .set_preference_vector(user_id, &updated)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Failed to persist preference vector");
                e
            })?;

        let event = InteractionEvent::new(user_id, item_id.clone(), kind);
        if let Err(e) = self.stores.ledger.append(&event).await {
            tracing::error!(
                user_id = %user_id,
                item_id = %item_id,
                error = %e,
                "Failed to append interaction, restoring previous preference vector"
            );
            if let Err(restore) = self
                .stores
                .preferences
                .set_preference_vector(user_id, &current)
                .await
            {
                tracing::error!(
                    user_id = %user_id,
                    error = %restore,
                    "Failed to restore preference vector"
                );
            }
            return Err(e);
        }

        drop(guard);

        self.publisher
            .dispatch(InteractionNotification::from(&event));

        tracing::info!(
            user_id = %user_id,
            item_id = %item_id,
            kind = %kind,
            weight,
            "Interaction recorded"
        );

        Ok(RecordedInteraction {
            event,
            preference: updated,
        })
    }

    /// All ledger events for an item, oldest first
    pub async fn interactions_for_item(&self, item_id: &ItemId) -> AppResult<Vec<InteractionEvent>> {
        tracing::debug!(item_id = %item_id, "Getting interactions for item");
        self.stores.ledger.by_item(item_id).await
    }

    /// All ledger events by a user, oldest first
    pub async fn interactions_for_user(&self, user_id: UserId) -> AppResult<Vec<InteractionEvent>> {
        tracing::debug!(user_id = %user_id, "Getting interactions for user");
        self.stores.ledger.by_user(user_id).await
    }

    /// Liked/disliked/neutral state of each item for a user; latest like or dislike wins
    pub async fn interaction_states_for_items(
        &self,
        user_id: UserId,
        item_ids: &[ItemId],
    ) -> AppResult<HashMap<ItemId, InteractionState>> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let latest = self
            .stores
            .ledger
            .latest_reactions(user_id, item_ids)
            .await?;

        let states = item_ids
            .iter()
            .map(|item_id| {
                let state = InteractionState::from_latest(latest.get(item_id).copied());
                (item_id.clone(), state)
            })
            .collect();

        tracing::debug!(
            user_id = %user_id,
            requested = item_ids.len(),
            with_reaction = latest.len(),
            "Resolved interaction states"
        );

        Ok(states)
    }

    /// Current preference vector of a user
    pub async fn preference_vector(&self, user_id: UserId) -> AppResult<PreferenceVector> {
        self.stores
            .preferences
            .preference_vector(user_id)
            .await?
            .ok_or(AppError::UserNotFound(user_id))
    }
}
