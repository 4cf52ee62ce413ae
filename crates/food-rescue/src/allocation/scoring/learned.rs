use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::super::domain::{CandidateView, Donation};
use super::super::geo::haversine_km;
use super::Scorer;

pub const FEATURE_COUNT: usize = 5;

/// Column order of [`FeatureVector`]; persisted in artifacts and checked on load.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "remaining_quantity",
    "capacity",
    "distance_km",
    "reliability",
    "recent_donations",
];

pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Fixed numeric input of the learned scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn extract(
        donation: &Donation,
        candidate: &CandidateView<'_>,
        remaining_quantity: u32,
    ) -> Self {
        Self([
            f64::from(remaining_quantity),
            f64::from(candidate.capacity),
            haversine_km(donation.origin, candidate.candidate.location),
            candidate.candidate.reliability,
            f64::from(candidate.candidate.recent_donations),
        ])
    }
}

/// Linear regression over standardized features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub feature_means: [f64; FEATURE_COUNT],
    pub feature_scales: [f64; FEATURE_COUNT],
    pub coefficients: [f64; FEATURE_COUNT],
    pub intercept: f64,
}

impl LinearModel {
    pub fn predict(&self, features: &FeatureVector) -> f64 {
        features
            .0
            .iter()
            .zip(&self.feature_means)
            .zip(&self.feature_scales)
            .zip(&self.coefficients)
            .fold(self.intercept, |acc, (((value, mean), scale), weight)| {
                acc + weight * (value - mean) / scale
            })
    }

    fn validate(&self) -> Result<(), ScorerUnavailable> {
        let finite = self
            .feature_means
            .iter()
            .chain(&self.coefficients)
            .chain(std::iter::once(&self.intercept))
            .all(|value| value.is_finite());
        if !finite {
            return Err(ScorerUnavailable::InvalidModel(
                "model parameters must be finite".to_string(),
            ));
        }

        if self
            .feature_scales
            .iter()
            .any(|scale| !scale.is_finite() || *scale <= 0.0)
        {
            return Err(ScorerUnavailable::InvalidModel(
                "feature scales must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Serialized form of a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub trained_samples: usize,
    pub seed: u64,
    pub model: LinearModel,
}

impl ModelArtifact {
    pub fn new(model: LinearModel, trained_samples: usize, seed: u64) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            trained_samples,
            seed,
            model,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScorerUnavailable> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ScorerUnavailable::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScorerUnavailable> {
        let artifact: ModelArtifact = serde_json::from_reader(reader)?;
        artifact.check_compatible()?;
        Ok(artifact)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), serde_json::Error> {
        serde_json::to_writer_pretty(writer, self)
    }

    fn check_compatible(&self) -> Result<(), ScorerUnavailable> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(ScorerUnavailable::UnsupportedVersion {
                found: self.format_version,
            });
        }

        if self.feature_names.len() != FEATURE_COUNT
            || self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES)
                .any(|(found, expected)| found != expected)
        {
            return Err(ScorerUnavailable::FeatureMismatch {
                found: self.feature_names.clone(),
            });
        }

        self.model.validate()
    }
}

/// Regression model trained offline to imitate [`super::HeuristicScorer`].
///
/// The feature vector has no urgency term, so two donations differing only in expiry score
/// identically here.
#[derive(Debug, Clone)]
pub struct LearnedScorer {
    model: LinearModel,
}

impl LearnedScorer {
    pub fn new(model: LinearModel) -> Result<Self, ScorerUnavailable> {
        model.validate()?;
        Ok(Self { model })
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ScorerUnavailable> {
        artifact.check_compatible()?;
        Ok(Self {
            model: artifact.model,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScorerUnavailable> {
        Self::from_artifact(ModelArtifact::from_path(path)?)
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }
}

impl Scorer for LearnedScorer {
    fn score(
        &self,
        donation: &Donation,
        candidate: &CandidateView<'_>,
        remaining_quantity: u32,
    ) -> f64 {
        if remaining_quantity == 0 {
            return 0.0;
        }

        let features = FeatureVector::extract(donation, candidate, remaining_quantity);
        self.model.predict(&features)
    }

    fn name(&self) -> &'static str {
        "learned"
    }
}

/// The learned model could not be loaded or is unusable; callers fall back to the heuristic.
#[derive(Debug, thiserror::Error)]
pub enum ScorerUnavailable {
    #[error("failed to read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported model format version {found} (expected {MODEL_FORMAT_VERSION})")]
    UnsupportedVersion { found: u32 },
    #[error("model features {found:?} do not match the expected feature order")]
    FeatureMismatch { found: Vec<String> },
    #[error("model is unusable: {0}")]
    InvalidModel(String),
}
