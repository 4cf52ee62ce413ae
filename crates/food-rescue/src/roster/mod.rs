//! CSV import for recipient rosters.

mod normalizer;
mod parser;

pub use parser::ScheduleError;

use crate::allocation::domain::Candidate;
use crate::allocation::intake::{CandidateGuard, InvalidCandidate};
use parser::RowError;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Schedule(ScheduleError),
    Candidate(InvalidCandidate),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read recipient roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Schedule(err) => write!(f, "invalid roster schedule: {}", err),
            RosterImportError::Candidate(err) => write!(f, "invalid roster entry: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Schedule(err) => Some(err),
            RosterImportError::Candidate(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<InvalidCandidate> for RosterImportError {
    fn from(err: InvalidCandidate) -> Self {
        Self::Candidate(err)
    }
}

/// Reads `id,name,categories,capacity,latitude,longitude,reliability,recent_donations,schedule`
/// rows into validated candidates. List cells are `;`-separated.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Candidate>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Candidate>, RosterImportError> {
        let submissions = parser::parse_rows(reader).map_err(|err| match err {
            RowError::Csv(err) => RosterImportError::Csv(err),
            RowError::Schedule(err) => RosterImportError::Schedule(err),
        })?;
        let candidates = CandidateGuard::validate_roster(submissions)?;
        Ok(candidates)
    }
}
