use crate::allocation::intake::{InvalidCandidate, InvalidDonation};
use crate::allocation::scoring::{ScorerUnavailable, ScoringError};
use crate::allocation::training::TrainingError;
use crate::config::ConfigError;
use crate::roster::RosterImportError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Donation(InvalidDonation),
    Candidate(InvalidCandidate),
    Roster(RosterImportError),
    Scoring(ScoringError),
    Model(ScorerUnavailable),
    Training(TrainingError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::Donation(err) => write!(f, "invalid donation: {}", err),
            AppError::Candidate(err) => write!(f, "invalid candidate: {}", err),
            AppError::Roster(err) => write!(f, "roster error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
            AppError::Model(err) => write!(f, "scorer unavailable: {}", err),
            AppError::Training(err) => write!(f, "training error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Donation(err) => Some(err),
            AppError::Candidate(err) => Some(err),
            AppError::Roster(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Model(err) => Some(err),
            AppError::Training(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<InvalidDonation> for AppError {
    fn from(value: InvalidDonation) -> Self {
        Self::Donation(value)
    }
}

impl From<InvalidCandidate> for AppError {
    fn from(value: InvalidCandidate) -> Self {
        Self::Candidate(value)
    }
}

impl From<RosterImportError> for AppError {
    fn from(value: RosterImportError) -> Self {
        Self::Roster(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

impl From<ScorerUnavailable> for AppError {
    fn from(value: ScorerUnavailable) -> Self {
        Self::Model(value)
    }
}

impl From<TrainingError> for AppError {
    fn from(value: TrainingError) -> Self {
        Self::Training(value)
    }
}
