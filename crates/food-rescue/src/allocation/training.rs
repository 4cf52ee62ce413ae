//! Offline bootstrap for the learned scorer.
//!
//! Synthetic donation/candidate pairs are labelled with the heuristic score and a linear model is
//! fitted to reproduce those labels. The learned scorer therefore approximates the heuristic; it
//! is not trained against independent outcomes.

use std::collections::BTreeSet;

use linfa::metrics::SingleTargetRegression;
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_linear::LinearRegression;
use ndarray::{concatenate, Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{Candidate, CandidateId, CandidateView, Donation, FoodCategory, GeoPoint};
use super::scoring::{FeatureVector, HeuristicScorer, LinearModel, Scorer, FEATURE_COUNT};

pub const DEFAULT_SAMPLE_COUNT: usize = 5_000;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_RIDGE: f64 = 1e-6;

/// Degrees of latitude/longitude scattered around the sampling centre (roughly 50 km).
const SAMPLING_SPREAD_DEGREES: f64 = 0.45;
const SAMPLING_CENTRE: GeoPoint = GeoPoint {
    latitude: 41.5868,
    longitude: -93.625,
};

/// One labelled training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub features: FeatureVector,
    pub label: f64,
}

/// Fit quality on the training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub samples: usize,
    pub r_squared: f64,
    pub mean_absolute_error: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainingError {
    #[error("need at least {required} samples to fit the model (found {found})")]
    NotEnoughSamples { required: usize, found: usize },
    #[error("least-squares solve failed: {0}")]
    Solver(String),
}

/// Seeded generator of heuristic-labelled samples.
pub struct SyntheticSampler {
    rng: StdRng,
    labeller: HeuristicScorer,
}

impl SyntheticSampler {
    pub fn new(seed: u64, labeller: HeuristicScorer) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            labeller,
        }
    }

    pub fn sample(&mut self) -> TrainingSample {
        let category = FoodCategory::ALL[self.rng.random_range(0..FoodCategory::ALL.len())];
        let quantity = self.rng.random_range(1..=500u32);
        let donation = Donation {
            quantity,
            category,
            expiry_hours: self.rng.random_range(0.0..72.0),
            origin: self.scatter(),
        };
        let candidate = Candidate {
            id: CandidateId("synthetic".to_string()),
            name: "synthetic".to_string(),
            accepted_categories: BTreeSet::from([category]),
            capacity: self.rng.random_range(1..=400u32),
            location: self.scatter(),
            reliability: self.rng.random_range(0.0..=1.0),
            recent_donations: self.rng.random_range(0..=12u32),
            schedule: Vec::new(),
        };
        let remaining = self.rng.random_range(1..=quantity);

        let view = CandidateView::fresh(&candidate);
        TrainingSample {
            features: FeatureVector::extract(&donation, &view, remaining),
            label: self.labeller.score(&donation, &view, remaining),
        }
    }

    pub fn samples(&mut self, count: usize) -> Vec<TrainingSample> {
        (0..count).map(|_| self.sample()).collect()
    }

    fn scatter(&mut self) -> GeoPoint {
        GeoPoint::new(
            SAMPLING_CENTRE.latitude
                + self
                    .rng
                    .random_range(-SAMPLING_SPREAD_DEGREES..SAMPLING_SPREAD_DEGREES),
            SAMPLING_CENTRE.longitude
                + self
                    .rng
                    .random_range(-SAMPLING_SPREAD_DEGREES..SAMPLING_SPREAD_DEGREES),
        )
    }
}

/// Least-squares fit over standardized features with a small ridge term.
///
/// Labels are centred so the intercept is their mean and stays out of the penalty. The ridge is
/// applied by appending `sqrt(ridge * n) * I` rows with zero targets before the solve.
pub fn fit_linear_model(
    samples: &[TrainingSample],
    ridge: f64,
) -> Result<(LinearModel, TrainingReport), TrainingError> {
    let required = FEATURE_COUNT + 1;
    if samples.len() < required {
        return Err(TrainingError::NotEnoughSamples {
            required,
            found: samples.len(),
        });
    }

    let n = samples.len() as f64;
    let raw = Array2::from_shape_fn((samples.len(), FEATURE_COUNT), |(row, col)| {
        samples[row].features.0[col]
    });
    let labels: Array1<f64> = samples.iter().map(|sample| sample.label).collect();

    let means = raw.mean_axis(Axis(0)).ok_or(TrainingError::NotEnoughSamples {
        required,
        found: samples.len(),
    })?;
    // Constant columns carry no signal; any positive scale keeps them finite.
    let scales = raw
        .std_axis(Axis(0), 0.0)
        .mapv(|scale| if scale < f64::EPSILON { 1.0 } else { scale });
    let standardized = (&raw - &means) / &scales;

    let label_mean = labels.sum() / n;
    let centred = labels.mapv(|label| label - label_mean);

    let penalty = Array2::<f64>::eye(FEATURE_COUNT) * (ridge.max(0.0) * n).sqrt();
    let records = concatenate(Axis(0), &[standardized.view(), penalty.view()])
        .map_err(|err| TrainingError::Solver(err.to_string()))?;
    let targets = concatenate(
        Axis(0),
        &[centred.view(), Array1::<f64>::zeros(FEATURE_COUNT).view()],
    )
    .map_err(|err| TrainingError::Solver(err.to_string()))?;

    let fitted = LinearRegression::new()
        .with_intercept(false)
        .fit(&Dataset::new(records, targets))
        .map_err(|err| TrainingError::Solver(err.to_string()))?;
    let params = fitted.params();
    if params.len() != FEATURE_COUNT || params.iter().any(|value| !value.is_finite()) {
        return Err(TrainingError::Solver(
            "solution is not a finite coefficient vector".to_string(),
        ));
    }

    let model = LinearModel {
        feature_means: feature_array(&means),
        feature_scales: feature_array(&scales),
        coefficients: feature_array(params),
        intercept: label_mean,
    };

    let report = evaluate(&model, samples);
    info!(
        samples = report.samples,
        r_squared = report.r_squared,
        mae = report.mean_absolute_error,
        "fitted learned scorer"
    );

    Ok((model, report))
}

/// Generates `count` samples with `seed` and fits a model to them.
pub fn bootstrap(
    count: usize,
    seed: u64,
    labeller: HeuristicScorer,
) -> Result<(LinearModel, TrainingReport), TrainingError> {
    let samples = SyntheticSampler::new(seed, labeller).samples(count);
    fit_linear_model(&samples, DEFAULT_RIDGE)
}

/// Scores `model` against labelled samples.
pub fn evaluate(model: &LinearModel, samples: &[TrainingSample]) -> TrainingReport {
    let predictions: Array1<f64> = samples
        .iter()
        .map(|sample| model.predict(&sample.features))
        .collect();
    let labels: Array1<f64> = samples.iter().map(|sample| sample.label).collect();

    TrainingReport {
        samples: samples.len(),
        r_squared: predictions.r2(&labels.view()).unwrap_or(0.0),
        mean_absolute_error: predictions.mean_absolute_error(&labels.view()).unwrap_or(0.0),
    }
}

fn feature_array(values: &Array1<f64>) -> [f64; FEATURE_COUNT] {
    let mut out = [0.0; FEATURE_COUNT];
    for (slot, value) in out.iter_mut().zip(values.iter()) {
        *slot = *value;
    }
    out
}
