use food_rescue::allocation::scoring::ScoringError;
use food_rescue::allocation::{
    Candidate, CandidateGuard, CandidateSubmission, DistanceDecay, Donation, DonationGuard,
    DonationSubmission, HeuristicScorer, LearnedScorer, Scorer,
};
use food_rescue::config::{AllocationConfig, ScorerKind};
use food_rescue::error::AppError;
use food_rescue::roster::RosterImporter;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Scorer chosen for a run, plus the reason it differs from the requested one.
pub(crate) struct ResolvedScorer {
    pub(crate) scorer: Box<dyn Scorer>,
    pub(crate) requested: ScorerKind,
    pub(crate) fallback: Option<String>,
}

impl ResolvedScorer {
    pub(crate) fn label(&self) -> &'static str {
        self.scorer.name()
    }
}

/// Folds command-line overrides into the environment-derived settings.
pub(crate) fn apply_overrides(
    mut config: AllocationConfig,
    scorer: Option<ScorerKind>,
    model: Option<PathBuf>,
    decay_km: Option<f64>,
) -> AllocationConfig {
    if let Some(kind) = scorer {
        config.scorer = kind;
    }
    if let Some(path) = model {
        config.model_path = Some(path);
    }
    if let Some(decay) = decay_km {
        config.distance_decay_km = decay;
    }
    config
}

pub(crate) fn heuristic_scorer(
    config: &AllocationConfig,
) -> Result<HeuristicScorer, ScoringError> {
    HeuristicScorer::new(config.weights, DistanceDecay::new(config.distance_decay_km))
}

/// Loads the configured scorer. A learned scorer that cannot be loaded falls back to the
/// heuristic so a missing model never blocks allocation.
pub(crate) fn resolve_scorer(
    config: &AllocationConfig,
) -> Result<ResolvedScorer, ScoringError> {
    let requested = config.scorer;
    let heuristic = heuristic_scorer(config)?;
    if requested == ScorerKind::Heuristic {
        return Ok(ResolvedScorer {
            scorer: Box::new(heuristic),
            requested,
            fallback: None,
        });
    }

    let Some(path) = config.model_path.as_deref() else {
        let reason = "no model path configured".to_string();
        warn!(reason = %reason, "learned scorer unavailable; using heuristic");
        return Ok(ResolvedScorer {
            scorer: Box::new(heuristic),
            requested,
            fallback: Some(reason),
        });
    };

    let resolved = match LearnedScorer::from_path(path) {
        Ok(scorer) => {
            info!(model = %path.display(), "loaded learned scorer");
            ResolvedScorer {
                scorer: Box::new(scorer),
                requested,
                fallback: None,
            }
        }
        Err(err) => {
            let reason = err.to_string();
            warn!(
                model = %path.display(),
                error = %reason,
                "learned scorer unavailable; using heuristic"
            );
            ResolvedScorer {
                scorer: Box::new(heuristic),
                requested,
                fallback: Some(reason),
            }
        }
    };
    Ok(resolved)
}

pub(crate) fn load_donation(path: &Path) -> Result<Donation, AppError> {
    let reader = BufReader::new(File::open(path)?);
    let submission: DonationSubmission = serde_json::from_reader(reader)?;
    Ok(DonationGuard::validate(submission)?)
}

/// Reads a roster from CSV when the extension says so, otherwise from a JSON array.
pub(crate) fn load_candidates(path: &Path) -> Result<Vec<Candidate>, AppError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        return Ok(RosterImporter::from_path(path)?);
    }

    let reader = BufReader::new(File::open(path)?);
    let submissions: Vec<CandidateSubmission> = serde_json::from_reader(reader)?;
    Ok(CandidateGuard::validate_roster(submissions)?)
}

pub(crate) fn parse_scorer(raw: &str) -> Result<ScorerKind, String> {
    ScorerKind::parse(raw).ok_or_else(|| format!("'{raw}' is not 'heuristic' or 'learned'"))
}

pub(crate) fn parse_decay_km(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or_else(|| format!("'{raw}' is not a positive number of kilometres"))
}
