use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use super::{ItemId, PreferenceVector, UserId};
use crate::error::AppError;

/// The closed set of user actions on a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Like,
    Unlike,
    Dislike,
    Undislike,
    Skip,
    Play,
    #[serde(alias = "add_to_playlist")]
    AddToCollection,
    #[serde(alias = "remove_from_playlist")]
    RemoveFromCollection,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 8] = [
        InteractionKind::Like,
        InteractionKind::Unlike,
        InteractionKind::Dislike,
        InteractionKind::Undislike,
        InteractionKind::Skip,
        InteractionKind::Play,
        InteractionKind::AddToCollection,
        InteractionKind::RemoveFromCollection,
    ];

    /// Canonical name, as written to the ledger and the event stream
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Like => "like",
            InteractionKind::Unlike => "unlike",
            InteractionKind::Dislike => "dislike",
            InteractionKind::Undislike => "undislike",
            InteractionKind::Skip => "skip",
            InteractionKind::Play => "play",
            InteractionKind::AddToCollection => "add_to_collection",
            InteractionKind::RemoveFromCollection => "remove_from_collection",
        }
    }

    /// Whether this kind decides the liked/disliked state of an item
    pub fn is_reaction(&self) -> bool {
        matches!(self, InteractionKind::Like | InteractionKind::Dislike)
    }
}

impl Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(InteractionKind::Like),
            "unlike" => Ok(InteractionKind::Unlike),
            "dislike" => Ok(InteractionKind::Dislike),
            "undislike" => Ok(InteractionKind::Undislike),
            "skip" => Ok(InteractionKind::Skip),
            "play" => Ok(InteractionKind::Play),
            "add_to_collection" | "add_to_playlist" => Ok(InteractionKind::AddToCollection),
            "remove_from_collection" | "remove_from_playlist" => {
                Ok(InteractionKind::RemoveFromCollection)
            }
            other => Err(AppError::InvalidInteractionKind(other.to_string())),
        }
    }
}

/// A single ledger entry. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub kind: InteractionKind,
    pub created_at: DateTime<Utc>,
}

impl InteractionEvent {
    pub fn new(user_id: UserId, item_id: ItemId, kind: InteractionKind) -> Self {
        Self {
            user_id,
            item_id,
            kind,
            created_at: Utc::now(),
        }
    }
}

/// Derived per (user, item) classification, computed on read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionState {
    Liked,
    Disliked,
    Neutral,
}

impl InteractionState {
    /// Classifies the most recent like/dislike for a pair, if any
    pub fn from_latest(latest: Option<InteractionKind>) -> Self {
        match latest {
            Some(InteractionKind::Like) => InteractionState::Liked,
            Some(InteractionKind::Dislike) => InteractionState::Disliked,
            _ => InteractionState::Neutral,
        }
    }
}

/// Payload published to the event stream after an interaction is recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionNotification {
    pub event_id: Uuid,
    pub user_id: UserId,
    pub item_id: ItemId,
    pub kind: InteractionKind,
    pub occurred_at: DateTime<Utc>,
}

impl From<&InteractionEvent> for InteractionNotification {
    fn from(event: &InteractionEvent) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            user_id: event.user_id,
            item_id: event.item_id.clone(),
            kind: event.kind,
            occurred_at: event.created_at,
        }
    }
}

/// Outcome of a successfully recorded interaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedInteraction {
    pub event: InteractionEvent,
    pub preference: PreferenceVector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_canonical_name() {
        for kind in InteractionKind::ALL {
            assert_eq!(kind.as_str().parse::<InteractionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_legacy_playlist_spellings() {
        assert_eq!(
            "add_to_playlist".parse::<InteractionKind>().unwrap(),
            InteractionKind::AddToCollection
        );
        assert_eq!(
            "remove_from_playlist".parse::<InteractionKind>().unwrap(),
            InteractionKind::RemoveFromCollection
        );
        assert_eq!(InteractionKind::AddToCollection.as_str(), "add_to_collection");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = "favorite".parse::<InteractionKind>().unwrap_err();
        assert!(matches!(err, AppError::InvalidInteractionKind(k) if k == "favorite"));
    }

    #[test]
    fn test_kind_parse_is_case_sensitive() {
        assert!("Like".parse::<InteractionKind>().is_err());
        assert!("".parse::<InteractionKind>().is_err());
    }

    #[test]
    fn test_kind_serde_uses_snake_case() {
        let json = serde_json::to_string(&InteractionKind::RemoveFromCollection).unwrap();
        assert_eq!(json, "\"remove_from_collection\"");
        let kind: InteractionKind = serde_json::from_str("\"add_to_playlist\"").unwrap();
        assert_eq!(kind, InteractionKind::AddToCollection);
    }

    #[test]
    fn test_state_from_latest() {
        assert_eq!(InteractionState::from_latest(None), InteractionState::Neutral);
        assert_eq!(
            InteractionState::from_latest(Some(InteractionKind::Like)),
            InteractionState::Liked
        );
        assert_eq!(
            InteractionState::from_latest(Some(InteractionKind::Dislike)),
            InteractionState::Disliked
        );
        assert_eq!(
            InteractionState::from_latest(Some(InteractionKind::Play)),
            InteractionState::Neutral
        );
    }

    #[test]
    fn test_notification_carries_event_fields() {
        let event = InteractionEvent::new(UserId(7), ItemId::new("abc"), InteractionKind::Skip);
        let notification = InteractionNotification::from(&event);
        assert_eq!(notification.user_id, UserId(7));
        assert_eq!(notification.item_id, ItemId::new("abc"));
        assert_eq!(notification.kind, InteractionKind::Skip);
        assert_eq!(notification.occurred_at, event.created_at);
    }
}
