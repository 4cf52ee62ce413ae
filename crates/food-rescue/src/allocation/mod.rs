//! Donation-to-recipient allocation: intake validation, scoring strategies, and the greedy
//! partial-split loop.

pub mod domain;
pub mod eligibility;
pub mod engine;
pub mod geo;
pub mod intake;
pub(crate) mod pool;
pub mod scoring;
pub mod training;

#[cfg(test)]
mod tests;

pub use domain::{
    Allocation, Candidate, CandidateId, CandidateView, Donation, FoodCategory, GeoPoint,
    PickupWindow, UnknownCategory,
};
pub use engine::{allocate, AllocationOutcome, AllocationRound, Termination};
pub use geo::haversine_km;
pub use intake::{
    CandidateGuard, CandidateSubmission, DonationGuard, DonationSubmission, InvalidCandidate,
    InvalidDonation,
};
pub use scoring::{
    DistanceDecay, HeuristicScorer, LearnedScorer, ModelArtifact, ScoreBreakdown, Scorer,
    ScorerUnavailable, ScoringWeights,
};
pub use training::{TrainingError, TrainingReport};
