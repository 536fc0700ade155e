use serde::{Deserialize, Serialize};

/// Number of acoustic attributes carried by every feature and preference vector.
///
/// Order: danceability, energy, loudness, speechiness, acousticness,
/// instrumentalness, liveness, valence, tempo.
pub const FEATURE_DIMENSIONS: usize = 9;

/// Acoustic attributes of a catalog track, as stored by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub loudness: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub tempo: f64,
}

/// Fixed-length feature vector of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_DIMENSIONS]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_DIMENSIONS]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<TrackFeatures> for FeatureVector {
    fn from(t: TrackFeatures) -> Self {
        Self([
            t.danceability,
            t.energy,
            t.loudness,
            t.speechiness,
            t.acousticness,
            t.instrumentalness,
            t.liveness,
            t.valence,
            t.tempo,
        ])
    }
}

/// A user's running taste profile, same dimensionality as [`FeatureVector`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreferenceVector(pub [f64; FEATURE_DIMENSIONS]);

impl Default for PreferenceVector {
    fn default() -> Self {
        Self::zero()
    }
}

impl PreferenceVector {
    /// The profile every user starts with
    pub fn zero() -> Self {
        Self([0.0; FEATURE_DIMENSIONS])
    }

    /// Builds a preference vector from a stored representation.
    ///
    /// Stores hand back variable-length arrays. Anything that is not exactly
    /// [`FEATURE_DIMENSIONS`] long (a never-initialized profile is typically empty)
    /// reads as the zero vector.
    pub fn from_stored(values: &[f64]) -> Self {
        match <[f64; FEATURE_DIMENSIONS]>::try_from(values) {
            Ok(array) => Self(array),
            Err(_) => {
                tracing::warn!(
                    stored_len = values.len(),
                    expected = FEATURE_DIMENSIONS,
                    "Stored preference vector has unexpected length, treating as zero vector"
                );
                Self::zero()
            }
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_features_preserve_attribute_order() {
        let track = TrackFeatures {
            danceability: 1.0,
            energy: 2.0,
            loudness: 3.0,
            speechiness: 4.0,
            acousticness: 5.0,
            instrumentalness: 6.0,
            liveness: 7.0,
            valence: 8.0,
            tempo: 9.0,
        };
        let vector = FeatureVector::from(track);
        assert_eq!(vector.0, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_from_stored_exact_length() {
        let stored = vec![0.5; FEATURE_DIMENSIONS];
        assert_eq!(PreferenceVector::from_stored(&stored).0, [0.5; FEATURE_DIMENSIONS]);
    }

    #[test]
    fn test_from_stored_empty_is_zero() {
        assert_eq!(PreferenceVector::from_stored(&[]), PreferenceVector::zero());
    }

    #[test]
    fn test_from_stored_narrow_is_zero() {
        assert_eq!(
            PreferenceVector::from_stored(&[1.0, 2.0, 3.0]),
            PreferenceVector::zero()
        );
    }

    #[test]
    fn test_from_stored_wide_is_zero() {
        let stored = vec![1.0; FEATURE_DIMENSIONS + 1];
        assert_eq!(PreferenceVector::from_stored(&stored), PreferenceVector::zero());
    }
}
