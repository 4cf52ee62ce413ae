use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::allocation::scoring::{ScoringWeights, DEFAULT_DECAY_KM};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Test => "test",
            AppEnvironment::Production => "production",
        }
    }
}

/// Which scoring strategy a caller should wire into the allocation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerKind {
    Heuristic,
    Learned,
}

impl ScorerKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "heuristic" | "rules" => Some(Self::Heuristic),
            "learned" | "model" | "ml" => Some(Self::Learned),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScorerKind::Heuristic => "heuristic",
            ScorerKind::Learned => "learned",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub allocation: AllocationConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let scorer_raw = env::var("ALLOCATION_SCORER").unwrap_or_else(|_| "heuristic".to_string());
        let scorer =
            ScorerKind::parse(&scorer_raw).ok_or(ConfigError::InvalidScorer { value: scorer_raw })?;

        let model_path = env::var("ALLOCATION_MODEL_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let distance_decay_km = match env::var("ALLOCATION_DISTANCE_DECAY_KM") {
            Ok(raw) => parse_decay(&raw)?,
            Err(_) => DEFAULT_DECAY_KM,
        };

        let weights = match env::var("ALLOCATION_WEIGHTS") {
            Ok(raw) if !raw.trim().is_empty() => parse_weights(&raw)?,
            _ => ScoringWeights::default(),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            allocation: AllocationConfig {
                scorer,
                model_path,
                distance_decay_km,
                weights,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_decay(raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or(ConfigError::InvalidDistanceDecay)
}

/// Reads `urgency=0.2,distance=0.25,...` over the default weights. The result must still sum to
/// 1.0.
fn parse_weights(raw: &str) -> Result<ScoringWeights, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidWeights {
        value: raw.to_string(),
        reason,
    };

    let mut weights = ScoringWeights::default();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| invalid(format!("expected name=value, found '{entry}'")))?;
        let value = value
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("'{}' is not a number", value.trim())))?;
        let slot = match key.trim().to_ascii_lowercase().as_str() {
            "urgency" => &mut weights.urgency,
            "distance" => &mut weights.distance,
            "capacity" => &mut weights.capacity,
            "reliability" => &mut weights.reliability,
            "fairness" => &mut weights.fairness,
            other => return Err(invalid(format!("unknown criterion '{other}'"))),
        };
        *slot = value;
    }

    weights
        .validate()
        .map_err(|err| invalid(err.to_string()))?;
    Ok(weights)
}

/// Settings deciding how donations are scored.
#[derive(Debug, Clone)]
pub struct AllocationConfig {
    pub scorer: ScorerKind,
    pub model_path: Option<PathBuf>,
    pub distance_decay_km: f64,
    pub weights: ScoringWeights,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidScorer { value: String },
    InvalidDistanceDecay,
    InvalidWeights { value: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidScorer { value } => write!(
                f,
                "ALLOCATION_SCORER must be 'heuristic' or 'learned' (found '{}')",
                value
            ),
            ConfigError::InvalidDistanceDecay => write!(
                f,
                "ALLOCATION_DISTANCE_DECAY_KM must be a positive number of kilometres"
            ),
            ConfigError::InvalidWeights { value, reason } => write!(
                f,
                "ALLOCATION_WEIGHTS '{}' is invalid: {}",
                value, reason
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("ALLOCATION_SCORER");
        env::remove_var("ALLOCATION_MODEL_PATH");
        env::remove_var("ALLOCATION_DISTANCE_DECAY_KM");
        env::remove_var("ALLOCATION_WEIGHTS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.allocation.scorer, ScorerKind::Heuristic);
        assert!(config.allocation.model_path.is_none());
        assert_eq!(config.allocation.distance_decay_km, DEFAULT_DECAY_KM);
        assert_eq!(config.allocation.weights, ScoringWeights::default());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_learned_scorer_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("ALLOCATION_SCORER", "Learned");
        env::set_var("ALLOCATION_MODEL_PATH", "/var/lib/food-rescue/model.json");
        env::set_var("ALLOCATION_DISTANCE_DECAY_KM", "12.5");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.allocation.scorer, ScorerKind::Learned);
        assert_eq!(
            config.allocation.model_path,
            Some(PathBuf::from("/var/lib/food-rescue/model.json"))
        );
        assert_eq!(config.allocation.distance_decay_km, 12.5);
    }

    #[test]
    fn rejects_unknown_scorer_and_bad_decay() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ALLOCATION_SCORER", "random");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidScorer { .. })
        ));

        reset_env();
        env::set_var("ALLOCATION_DISTANCE_DECAY_KM", "-4");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidDistanceDecay)
        ));
        reset_env();
    }

    #[test]
    fn reads_custom_weights() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(
            "ALLOCATION_WEIGHTS",
            "urgency=0.4, distance=0.2, capacity=0.2, reliability=0.1, fairness=0.1",
        );
        let config = AppConfig::load().expect("config loads");
        reset_env();

        let weights = config.allocation.weights;
        assert_eq!(weights.urgency, 0.4);
        assert_eq!(weights.distance, 0.2);
        assert_eq!(weights.fairness, 0.1);
    }

    #[test]
    fn rejects_weights_that_do_not_sum_to_one() {
        assert!(matches!(
            parse_weights("urgency=0.9"),
            Err(ConfigError::InvalidWeights { .. })
        ));
        assert!(matches!(
            parse_weights("speed=0.2"),
            Err(ConfigError::InvalidWeights { .. })
        ));
        assert!(matches!(
            parse_weights("urgency"),
            Err(ConfigError::InvalidWeights { .. })
        ));
        assert_eq!(
            parse_weights("urgency=0.20").expect("defaults still sum to one"),
            ScoringWeights::default()
        );
    }

    #[test]
    fn environment_labels_follow_aliases() {
        assert_eq!(AppEnvironment::from_str("PROD").label(), "production");
        assert_eq!(AppEnvironment::from_str("ci").label(), "test");
        assert_eq!(AppEnvironment::from_str("staging").label(), "development");
    }
}
