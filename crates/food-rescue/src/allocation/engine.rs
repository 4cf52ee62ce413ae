//! Greedy partial-split allocation.
//!
//! Each round scores every eligible candidate against the quantity still unassigned, hands the
//! best one as much as it can hold, and re-filters. Allocations are never revisited, so the
//! result is locally optimal per round rather than a global assignment; in exchange a call is
//! `O(rounds × candidates)` and every round either exhausts the donation or drains one
//! candidate, bounding rounds by `candidates + 1`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{Allocation, Candidate, CandidateId, Donation};
use super::eligibility::eligible_indices;
use super::pool::CandidatePool;
use super::scoring::Scorer;

/// Why the loop left the allocating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The whole donation was assigned.
    Exhausted,
    /// Quantity remains but no candidate can take it; `leftover_quantity` goes to fallback
    /// handling outside the engine.
    NoEligibleCandidates,
}

/// Replayable record of one round's decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRound {
    pub round: usize,
    pub candidate_id: CandidateId,
    pub capacity_before: u32,
    pub remaining_before: u32,
    pub allocated: u32,
    pub score: f64,
}

/// Result of splitting one donation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub allocations: Vec<Allocation>,
    pub leftover_quantity: u32,
    pub termination: Termination,
    pub rounds: Vec<AllocationRound>,
    /// Capacity left per candidate once the call finished, for the caller to commit.
    pub remaining_capacity: BTreeMap<CandidateId, u32>,
}

impl AllocationOutcome {
    pub fn allocated_quantity(&self) -> u32 {
        self.allocations
            .iter()
            .map(|allocation| allocation.allocated_quantity)
            .sum()
    }

    pub fn is_fully_allocated(&self) -> bool {
        self.leftover_quantity == 0
    }
}

/// Splits `donation` across `candidates` in score order.
///
/// `candidates` is read-only; capacity is tracked in a per-call working copy. The donation must
/// already have passed [`super::intake::DonationGuard`].
pub fn allocate<S>(donation: &Donation, candidates: &[Candidate], scorer: &S) -> AllocationOutcome
where
    S: Scorer + ?Sized,
{
    debug_assert!(donation.quantity > 0, "donation quantity must be positive");

    let mut pool = CandidatePool::new(candidates);
    let mut remaining = donation.quantity;
    let mut eligible = eligible_indices(donation, &pool);
    let mut allocations = Vec::new();
    let mut rounds = Vec::new();

    let termination = loop {
        if remaining == 0 {
            break Termination::Exhausted;
        }

        let Some((winner, score)) = select_winner(donation, &pool, &eligible, remaining, scorer)
        else {
            break Termination::NoEligibleCandidates;
        };

        let candidate = pool.candidate(winner);
        let capacity_before = pool.capacity(winner);
        let allocated = capacity_before.min(remaining);

        debug!(
            round = rounds.len() + 1,
            candidate = %candidate.id,
            score,
            capacity_before,
            remaining_before = remaining,
            allocated,
            "allocation round"
        );

        rounds.push(AllocationRound {
            round: rounds.len() + 1,
            candidate_id: candidate.id.clone(),
            capacity_before,
            remaining_before: remaining,
            allocated,
            score,
        });
        allocations.push(Allocation {
            candidate_id: candidate.id.clone(),
            candidate_name: candidate.name.clone(),
            allocated_quantity: allocated,
            score,
        });

        remaining -= allocated;
        pool.draw(winner, allocated);
        eligible = eligible_indices(donation, &pool);
    };

    info!(
        scorer = scorer.name(),
        category = %donation.category,
        quantity = donation.quantity,
        allocated = donation.quantity - remaining,
        leftover = remaining,
        recipients = allocations.len(),
        ?termination,
        "donation allocation finished"
    );

    AllocationOutcome {
        allocations,
        leftover_quantity: remaining,
        termination,
        rounds,
        remaining_capacity: pool.remaining_by_id(),
    }
}

/// Highest score wins; ties go to the smaller candidate id, then the earlier input position.
fn select_winner<S>(
    donation: &Donation,
    pool: &CandidatePool<'_>,
    eligible: &[usize],
    remaining: u32,
    scorer: &S,
) -> Option<(usize, f64)>
where
    S: Scorer + ?Sized,
{
    eligible
        .iter()
        .map(|&index| {
            let score = scorer.score(donation, &pool.view(index), remaining);
            (index, score)
        })
        .min_by(|(a_index, a_score), (b_index, b_score)| {
            rank_score(*b_score)
                .total_cmp(&rank_score(*a_score))
                .then_with(|| pool.candidate(*a_index).id.cmp(&pool.candidate(*b_index).id))
                .then_with(|| a_index.cmp(b_index))
        })
}

/// NaN never outranks a real score.
fn rank_score(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

