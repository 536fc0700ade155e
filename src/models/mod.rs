use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod features;
pub mod interaction;

pub use features::{FeatureVector, PreferenceVector, TrackFeatures, FEATURE_DIMENSIONS};
pub use interaction::{
    InteractionEvent, InteractionKind, InteractionNotification, InteractionState,
    RecordedInteraction,
};

/// Identifier of a registered user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a catalog item (the catalog's track id, e.g. "5SuOikwiRyPMVoIQDJUgSV")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display() {
        assert_eq!(format!("{}", UserId(42)), "42");
    }

    #[test]
    fn test_item_id_serializes_as_plain_string() {
        let id = ItemId::new("5SuOikwiRyPMVoIQDJUgSV");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"5SuOikwiRyPMVoIQDJUgSV\"");
    }
}
