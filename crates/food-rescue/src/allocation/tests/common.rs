use std::collections::{BTreeSet, HashMap};

use crate::allocation::domain::{
    Candidate, CandidateId, CandidateView, Donation, FoodCategory, GeoPoint,
};
use crate::allocation::scoring::Scorer;

pub(super) fn depot() -> GeoPoint {
    GeoPoint::new(41.5868, -93.625)
}

pub(super) fn donation(quantity: u32) -> Donation {
    Donation {
        quantity,
        category: FoodCategory::Produce,
        expiry_hours: 6.0,
        origin: depot(),
    }
}

pub(super) fn candidate(id: &str, capacity: u32) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        name: format!("{id} community pantry"),
        accepted_categories: BTreeSet::from([FoodCategory::Produce, FoodCategory::Bakery]),
        capacity,
        location: depot(),
        reliability: 0.8,
        recent_donations: 0,
        schedule: Vec::new(),
    }
}

pub(super) fn candidate_at(id: &str, capacity: u32, location: GeoPoint) -> Candidate {
    Candidate {
        location,
        ..candidate(id, capacity)
    }
}

/// Returns the same score for everyone.
pub(super) struct ConstantScorer(pub f64);

impl Scorer for ConstantScorer {
    fn score(&self, _: &Donation, _: &CandidateView<'_>, remaining_quantity: u32) -> f64 {
        if remaining_quantity == 0 {
            0.0
        } else {
            self.0
        }
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// Scores by candidate id, ignoring state.
pub(super) struct TableScorer(pub HashMap<String, f64>);

impl TableScorer {
    pub(super) fn new(entries: &[(&str, f64)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(id, score)| (id.to_string(), *score))
                .collect(),
        )
    }
}

impl Scorer for TableScorer {
    fn score(&self, _: &Donation, candidate: &CandidateView<'_>, remaining_quantity: u32) -> f64 {
        if remaining_quantity == 0 {
            return 0.0;
        }
        self.0
            .get(&candidate.candidate.id.0)
            .copied()
            .unwrap_or(f64::NAN)
    }

    fn name(&self) -> &'static str {
        "table"
    }
}
