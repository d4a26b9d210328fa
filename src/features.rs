use serde::Deserialize;
use thiserror::Error;

/// Number of audio feature dimensions.
pub const FEATURE_DIM: usize = 6;

/// Inclusive bounds for each feature, in vector order.
/// Ratio features live in [0, 1]; tempo is BPM in [0, 244].
pub const FEATURE_BOUNDS: [(f64, f64); FEATURE_DIM] = [
    (0.0, 1.0),   // acousticness
    (0.0, 1.0),   // danceability
    (0.0, 1.0),   // energy
    (0.0, 1.0),   // instrumentalness
    (0.0, 1.0),   // valence
    (0.0, 244.0), // tempo
];

#[derive(Error, Debug, PartialEq)]
#[error("{feature} = {value} is outside [{min}, {max}]")]
pub struct OutOfBounds {
    pub feature: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Audio feature vector for one track (or one query).
///
/// Field order matches `crate::AUDIO_FEATURES` and the catalog CSV columns.
/// Distances are computed on the raw values — no per-dimension scaling —
/// so tempo (0-244) dominates the unit-range features. Callers that want
/// balanced dimensions must scale before querying.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FeatureVector {
    pub acousticness: f64,
    pub danceability: f64,
    pub energy: f64,
    pub instrumentalness: f64,
    pub valence: f64,
    pub tempo: f64,
}

impl FeatureVector {
    pub fn as_array(&self) -> [f64; FEATURE_DIM] {
        [
            self.acousticness,
            self.danceability,
            self.energy,
            self.instrumentalness,
            self.valence,
            self.tempo,
        ]
    }

    /// Check every dimension against `FEATURE_BOUNDS`.
    /// Returns the first violation found, in vector order.
    pub fn check_bounds(&self) -> Result<(), OutOfBounds> {
        for (i, value) in self.as_array().iter().enumerate() {
            let (min, max) = FEATURE_BOUNDS[i];
            // NaN fails the range check too
            if !(min..=max).contains(value) {
                return Err(OutOfBounds {
                    feature: crate::AUDIO_FEATURES[i],
                    value: *value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Euclidean distance between two feature vectors.
pub fn euclidean(a: &[f64; FEATURE_DIM], b: &[f64; FEATURE_DIM]) -> f64 {
    let mut sum = 0.0_f64;
    for i in 0..FEATURE_DIM {
        let diff = a[i] - b[i];
        sum += diff * diff;
    }
    sum.sqrt()
}
