use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{FeatureVector, InteractionKind, PreferenceVector, FEATURE_DIMENSIONS},
};

/// Smoothing constant applied when no configuration overrides it
pub const DEFAULT_SMOOTHING: f64 = 0.45;

const DEFAULT_LOCK_SHARDS: usize = 64;

/// Signed weight carried by each interaction kind
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    like: f64,
    unlike: f64,
    dislike: f64,
    undislike: f64,
    skip: f64,
    play: f64,
    add_to_collection: f64,
    remove_from_collection: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            like: 3.0,
            unlike: -2.5,
            dislike: -4.0,
            undislike: 4.5,
            skip: -1.0,
            play: 1.0,
            add_to_collection: 5.0,
            remove_from_collection: -3.0,
        }
    }
}

impl WeightTable {
    pub fn weight(&self, kind: InteractionKind) -> f64 {
        match kind {
            InteractionKind::Like => self.like,
            InteractionKind::Unlike => self.unlike,
            InteractionKind::Dislike => self.dislike,
            InteractionKind::Undislike => self.undislike,
            InteractionKind::Skip => self.skip,
            InteractionKind::Play => self.play,
            InteractionKind::AddToCollection => self.add_to_collection,
            InteractionKind::RemoveFromCollection => self.remove_from_collection,
        }
    }

    /// Resolves a raw kind name to its kind and weight
    pub fn resolve(&self, kind: &str) -> AppResult<(InteractionKind, f64)> {
        let kind: InteractionKind = kind.parse()?;
        Ok((kind, self.weight(kind)))
    }
}

/// Immutable scoring parameters, built once at startup and shared by reference
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub smoothing: f64,
    pub weights: WeightTable,
    /// Number of per-user lock shards
    pub lock_shards: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            weights: WeightTable::default(),
            lock_shards: DEFAULT_LOCK_SHARDS,
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        config.validate()?;
        Ok(Self::new(config.preference_smoothing, WeightTable::default())?
            .with_lock_shards(config.user_lock_shards))
    }

    pub fn new(smoothing: f64, weights: WeightTable) -> AppResult<Self> {
        if !(0.0..=1.0).contains(&smoothing) {
            return Err(AppError::InvalidConfig(format!(
                "smoothing must be within [0, 1], got {}",
                smoothing
            )));
        }
        Ok(Self {
            smoothing,
            weights,
            lock_shards: DEFAULT_LOCK_SHARDS,
        })
    }

    pub fn with_lock_shards(mut self, lock_shards: usize) -> Self {
        self.lock_shards = lock_shards.max(1);
        self
    }
}

/// Scales every dimension of `features` by `weight`
pub fn scale_features(features: &FeatureVector, weight: f64) -> FeatureVector {
    let mut scaled = [0.0; FEATURE_DIMENSIONS];
    for (out, value) in scaled.iter_mut().zip(features.0.iter()) {
        *out = value * weight;
    }
    FeatureVector(scaled)
}

/// Exponential moving average step: `p[i] = α·p[i] + (1 − α)·v[i]` for every dimension
pub fn update_preference(
    current: &PreferenceVector,
    scaled: &FeatureVector,
    smoothing: f64,
) -> PreferenceVector {
    let mut next = [0.0; FEATURE_DIMENSIONS];
    for i in 0..FEATURE_DIMENSIONS {
        next[i] = smoothing * current.0[i] + (1.0 - smoothing) * scaled.0[i];
    }
    PreferenceVector(next)
}
