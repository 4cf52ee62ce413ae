use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::domain::{
    Candidate, CandidateId, Donation, FoodCategory, GeoPoint, PickupWindow, UnknownCategory,
};

/// Donation as received from the intake surface, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationSubmission {
    pub quantity: i64,
    #[serde(default)]
    pub category: Option<String>,
    pub expiry_hours: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Recipient record as received from a roster, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSubmission {
    pub id: String,
    pub name: String,
    pub accepted_categories: Vec<String>,
    pub capacity: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub reliability: f64,
    #[serde(default)]
    pub recent_donations: i64,
    #[serde(default)]
    pub schedule: Vec<PickupWindow>,
}

/// Reasons a donation is rejected before it reaches the allocation engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidDonation {
    #[error("donation quantity must be positive (found {0})")]
    NonPositiveQuantity(i64),
    #[error("donation quantity {0} exceeds the supported maximum")]
    QuantityTooLarge(i64),
    #[error("donation category is missing")]
    MissingCategory,
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    #[error("expiry hours must be a non-negative number (found {0})")]
    InvalidExpiry(f64),
    #[error("origin ({latitude}, {longitude}) is not a valid coordinate")]
    InvalidOrigin { latitude: f64, longitude: f64 },
}

/// Reasons a recipient record is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidCandidate {
    #[error("candidate id is missing")]
    MissingId,
    #[error("candidate {id} listed more than once")]
    DuplicateId { id: String },
    #[error("candidate {id} capacity {capacity} is out of range")]
    CapacityOutOfRange { id: String, capacity: i64 },
    #[error("candidate {id} recent donation count {count} is out of range")]
    RecentDonationsOutOfRange { id: String, count: i64 },
    #[error("candidate {id} reliability {value} must be within [0, 1]")]
    ReliabilityOutOfRange { id: String, value: f64 },
    #[error("candidate {id} location is not a valid coordinate")]
    InvalidLocation { id: String },
    #[error("candidate {id}: {source}")]
    UnknownCategory {
        id: String,
        #[source]
        source: UnknownCategory,
    },
}

/// Precondition gate producing [`Donation`] values the engine can trust.
pub struct DonationGuard;

impl DonationGuard {
    pub fn validate(submission: DonationSubmission) -> Result<Donation, InvalidDonation> {
        let DonationSubmission {
            quantity,
            category,
            expiry_hours,
            latitude,
            longitude,
        } = submission;

        if quantity <= 0 {
            return Err(InvalidDonation::NonPositiveQuantity(quantity));
        }
        let quantity =
            u32::try_from(quantity).map_err(|_| InvalidDonation::QuantityTooLarge(quantity))?;

        let category = category
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or(InvalidDonation::MissingCategory)?
            .parse::<FoodCategory>()?;

        if !expiry_hours.is_finite() || expiry_hours < 0.0 {
            return Err(InvalidDonation::InvalidExpiry(expiry_hours));
        }

        let origin = GeoPoint::new(latitude, longitude);
        if !origin.is_valid() {
            return Err(InvalidDonation::InvalidOrigin {
                latitude,
                longitude,
            });
        }

        Ok(Donation {
            quantity,
            category,
            expiry_hours,
            origin,
        })
    }
}

/// Precondition gate for recipient records.
pub struct CandidateGuard;

impl CandidateGuard {
    pub fn validate(submission: CandidateSubmission) -> Result<Candidate, InvalidCandidate> {
        let CandidateSubmission {
            id,
            name,
            accepted_categories,
            capacity,
            latitude,
            longitude,
            reliability,
            recent_donations,
            schedule,
        } = submission;

        let id = id.trim().to_string();
        if id.is_empty() {
            return Err(InvalidCandidate::MissingId);
        }

        let capacity = u32::try_from(capacity).map_err(|_| InvalidCandidate::CapacityOutOfRange {
            id: id.clone(),
            capacity,
        })?;
        let recent = u32::try_from(recent_donations).map_err(|_| {
            InvalidCandidate::RecentDonationsOutOfRange {
                id: id.clone(),
                count: recent_donations,
            }
        })?;

        if !reliability.is_finite() || !(0.0..=1.0).contains(&reliability) {
            return Err(InvalidCandidate::ReliabilityOutOfRange {
                id,
                value: reliability,
            });
        }

        let location = GeoPoint::new(latitude, longitude);
        if !location.is_valid() {
            return Err(InvalidCandidate::InvalidLocation { id });
        }

        let mut categories = BTreeSet::new();
        for raw in accepted_categories
            .iter()
            .map(|raw| raw.trim())
            .filter(|raw| !raw.is_empty())
        {
            let category = raw
                .parse::<FoodCategory>()
                .map_err(|source| InvalidCandidate::UnknownCategory {
                    id: id.clone(),
                    source,
                })?;
            categories.insert(category);
        }

        let name = match name.trim() {
            "" => id.clone(),
            trimmed => trimmed.to_string(),
        };

        Ok(Candidate {
            id: CandidateId(id),
            name,
            accepted_categories: categories,
            capacity,
            location,
            reliability,
            recent_donations: recent,
            schedule,
        })
    }

    /// Validates every record and rejects rosters that reuse an id.
    pub fn validate_roster<I>(submissions: I) -> Result<Vec<Candidate>, InvalidCandidate>
    where
        I: IntoIterator<Item = CandidateSubmission>,
    {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for submission in submissions {
            let candidate = Self::validate(submission)?;
            if !seen.insert(candidate.id.clone()) {
                return Err(InvalidCandidate::DuplicateId {
                    id: candidate.id.0,
                });
            }
            candidates.push(candidate);
        }

        Ok(candidates)
    }
}
