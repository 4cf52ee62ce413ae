mod heuristic;
mod learned;

pub use heuristic::HeuristicScorer;
pub use learned::{
    FeatureVector, LearnedScorer, LinearModel, ModelArtifact, ScorerUnavailable, FEATURE_COUNT,
    FEATURE_NAMES, MODEL_FORMAT_VERSION,
};

use serde::{Deserialize, Serialize};

use super::domain::{CandidateView, Donation};

/// Hours after which a donation no longer earns any urgency credit.
pub const URGENCY_HORIZON_HOURS: f64 = 24.0;

/// Default e-folding distance for the exponential distance decay.
pub const DEFAULT_DECAY_KM: f64 = 25.0;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Fitness function ranking one candidate for the current state of a donation.
///
/// Implementations must be pure: the same donation, candidate view, and remaining quantity
/// always produce the same score. A remaining quantity of zero scores `0.0`. Only the relative
/// order of scores within a round matters to the allocation loop.
pub trait Scorer: Send + Sync {
    fn score(
        &self,
        donation: &Donation,
        candidate: &CandidateView<'_>,
        remaining_quantity: u32,
    ) -> f64;

    /// Short label used in logs and CLI output.
    fn name(&self) -> &'static str;
}

/// Relative importance of each heuristic criterion. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub urgency: f64,
    pub distance: f64,
    pub capacity: f64,
    pub reliability: f64,
    pub fairness: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            urgency: 0.20,
            distance: 0.25,
            capacity: 0.25,
            reliability: 0.15,
            fairness: 0.15,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.urgency + self.distance + self.capacity + self.reliability + self.fairness
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        let all = [
            self.urgency,
            self.distance,
            self.capacity,
            self.reliability,
            self.fairness,
        ];
        if all.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return Err(ScoringError::NegativeWeight);
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::WeightSum { sum });
        }

        Ok(())
    }
}

/// Exponential distance decay, `exp(-distance_km / decay_km)`, bounded to (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceDecay {
    decay_km: f64,
}

impl DistanceDecay {
    /// Falls back to [`DEFAULT_DECAY_KM`] when `decay_km` is not a positive finite number.
    pub fn new(decay_km: f64) -> Self {
        let sanitized = if decay_km.is_finite() && decay_km > 0.0 {
            decay_km
        } else {
            DEFAULT_DECAY_KM
        };

        Self {
            decay_km: sanitized,
        }
    }

    pub fn decay_km(&self) -> f64 {
        self.decay_km
    }

    pub fn fit(&self, distance_km: f64) -> f64 {
        (-distance_km.max(0.0) / self.decay_km).exp()
    }
}

impl Default for DistanceDecay {
    fn default() -> Self {
        Self::new(DEFAULT_DECAY_KM)
    }
}

/// Criteria contributing to a heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Urgency,
    Distance,
    Capacity,
    Reliability,
    Fairness,
}

/// Discrete contribution to a score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    /// Unweighted fit in `[0, 1]`.
    pub fit: f64,
    pub weighted: f64,
}

/// Full audit trail for a single heuristic score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("scoring weights must be finite and non-negative")]
    NegativeWeight,
    #[error("scoring weights must sum to 1.0 (found {sum:.6})")]
    WeightSum { sum: f64 },
}
