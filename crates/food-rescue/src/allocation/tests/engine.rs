use std::collections::{BTreeSet, HashMap};

use super::common::*;
use crate::allocation::domain::{CandidateId, CandidateView, FoodCategory, GeoPoint};
use crate::allocation::engine::{allocate, Termination};
use crate::allocation::scoring::{HeuristicScorer, Scorer};

#[test]
fn single_candidate_takes_its_capacity_and_reports_leftover() {
    let candidates = vec![candidate("north", 200)];

    let outcome = allocate(&donation(300), &candidates, &HeuristicScorer::default());

    assert_eq!(outcome.allocations.len(), 1);
    assert_eq!(outcome.allocations[0].allocated_quantity, 200);
    assert_eq!(outcome.allocations[0].candidate_name, "north community pantry");
    assert_eq!(outcome.leftover_quantity, 100);
    assert_eq!(outcome.termination, Termination::NoEligibleCandidates);
}

#[test]
fn higher_scoring_small_candidate_is_served_first() {
    let mut preferred = candidate("preferred", 30);
    preferred.reliability = 1.0;
    let mut other = candidate_at("other", 40, GeoPoint::new(41.9, -93.6));
    other.reliability = 0.2;
    other.recent_donations = 4;
    let candidates = vec![other, preferred];

    let outcome = allocate(&donation(50), &candidates, &HeuristicScorer::default());

    let split: Vec<(&str, u32)> = outcome
        .allocations
        .iter()
        .map(|allocation| (allocation.candidate_id.0.as_str(), allocation.allocated_quantity))
        .collect();
    assert_eq!(split, vec![("preferred", 30), ("other", 20)]);
    assert_eq!(outcome.leftover_quantity, 0);
    assert_eq!(outcome.termination, Termination::Exhausted);
    assert!(outcome.allocations[0].score > outcome.allocations[1].score);
}

#[test]
fn category_mismatch_leaves_everything_over() {
    let mut bakery_only = candidate("bakery", 500);
    bakery_only.accepted_categories = BTreeSet::from([FoodCategory::Bakery]);
    let candidates = vec![bakery_only];

    let outcome = allocate(&donation(75), &candidates, &HeuristicScorer::default());

    assert!(outcome.allocations.is_empty());
    assert!(outcome.rounds.is_empty());
    assert_eq!(outcome.leftover_quantity, 75);
    assert_eq!(outcome.termination, Termination::NoEligibleCandidates);
}

#[test]
fn empty_candidate_list_is_not_an_error() {
    let outcome = allocate(&donation(10), &[], &HeuristicScorer::default());

    assert!(outcome.allocations.is_empty());
    assert_eq!(outcome.leftover_quantity, 10);
    assert!(outcome.remaining_capacity.is_empty());
}

#[test]
fn constant_scorer_preserves_quantity() {
    let candidates = vec![
        candidate("c", 15),
        candidate("a", 10),
        candidate("b", 0),
        candidate("d", 40),
    ];

    let outcome = allocate(&donation(60), &candidates, &ConstantScorer(3.5));

    assert_eq!(outcome.allocated_quantity() + outcome.leftover_quantity, 60);
    assert!(outcome.is_fully_allocated());
    assert!(outcome
        .allocations
        .iter()
        .all(|allocation| allocation.allocated_quantity > 0));
}

#[test]
fn ties_go_to_smallest_candidate_id() {
    let candidates = vec![candidate("c", 15), candidate("a", 10), candidate("b", 20)];

    let outcome = allocate(&donation(60), &candidates, &ConstantScorer(1.0));

    let order: Vec<&str> = outcome
        .allocations
        .iter()
        .map(|allocation| allocation.candidate_id.0.as_str())
        .collect();
    assert_eq!(order, vec!["a", "b", "c"]);
    assert_eq!(outcome.leftover_quantity, 15);
}

#[test]
fn nan_scores_lose_to_real_scores() {
    let candidates = vec![candidate("unknown", 50), candidate("known", 50)];
    let scorer = TableScorer::new(&[("known", -10.0)]);

    let outcome = allocate(&donation(70), &candidates, &scorer);

    assert_eq!(outcome.allocations[0].candidate_id.0, "known");
    assert_eq!(outcome.allocations[1].candidate_id.0, "unknown");
    assert_eq!(outcome.allocations[1].allocated_quantity, 20);
}

#[test]
fn caller_candidates_are_not_mutated() {
    let candidates = vec![candidate("a", 10), candidate("b", 10)];
    let before = candidates.clone();

    let outcome = allocate(&donation(15), &candidates, &HeuristicScorer::default());

    assert_eq!(candidates, before);
    let total_remaining: u32 = outcome.remaining_capacity.values().sum();
    assert_eq!(total_remaining, 5);

    let again = allocate(&donation(15), &candidates, &HeuristicScorer::default());
    assert_eq!(outcome, again);
}

#[test]
fn rounds_replay_within_capacity() {
    let candidates = vec![
        candidate("a", 7),
        candidate("b", 3),
        candidate_at("c", 12, GeoPoint::new(41.7, -93.7)),
        candidate_at("d", 1, GeoPoint::new(42.0, -93.6)),
    ];

    let outcome = allocate(&donation(21), &candidates, &HeuristicScorer::default());

    let mut capacity: HashMap<CandidateId, u32> = candidates
        .iter()
        .map(|candidate| (candidate.id.clone(), candidate.capacity))
        .collect();
    let mut remaining = 21;
    for (index, round) in outcome.rounds.iter().enumerate() {
        let available = capacity[&round.candidate_id];
        assert_eq!(round.round, index + 1);
        assert_eq!(round.capacity_before, available);
        assert_eq!(round.remaining_before, remaining);
        assert_eq!(round.allocated, available.min(remaining));
        capacity.insert(round.candidate_id.clone(), available - round.allocated);
        remaining -= round.allocated;
    }
    assert_eq!(remaining, outcome.leftover_quantity);
    assert_eq!(outcome.leftover_quantity, 0);
    assert_eq!(outcome.rounds.len(), outcome.allocations.len());
}

#[test]
fn candidate_that_holds_the_whole_donation_finishes_in_one_round() {
    let candidates = vec![candidate("big", 100), candidate("small", 5)];

    let outcome = allocate(&donation(40), &candidates, &HeuristicScorer::default());

    assert_eq!(outcome.allocations.len(), 1);
    assert_eq!(outcome.allocations[0].candidate_id.0, "big");
    assert_eq!(outcome.allocations[0].allocated_quantity, 40);
    assert_eq!(
        outcome.remaining_capacity.get(&CandidateId("big".to_string())),
        Some(&60)
    );
}

#[test]
fn round_winner_reflects_the_shrunken_remainder() {
    // At 100 units "backup" outranks "snug" on capacity fit; once 20 remain both fit fully and
    // snug's reliability decides.
    let mut roomy = candidate("roomy", 80);
    roomy.reliability = 0.5;
    let mut backup = candidate("backup", 60);
    backup.reliability = 0.6;
    let mut snug = candidate("snug", 30);
    snug.reliability = 1.0;
    let candidates = vec![roomy, backup, snug];
    let scorer = HeuristicScorer::default();
    let donation = donation(100);

    let at_full_quantity = |index: usize| {
        scorer.score(&donation, &CandidateView::fresh(&candidates[index]), 100)
    };
    assert!(at_full_quantity(0) > at_full_quantity(1));
    assert!(at_full_quantity(1) > at_full_quantity(2));

    let outcome = allocate(&donation, &candidates, &scorer);

    let order: Vec<(&str, u32)> = outcome
        .allocations
        .iter()
        .map(|allocation| (allocation.candidate_id.0.as_str(), allocation.allocated_quantity))
        .collect();
    assert_eq!(order, vec![("roomy", 80), ("snug", 20)]);

    let second = &outcome.rounds[1];
    assert_eq!(second.remaining_before, 20);
    let fresh_view = CandidateView {
        candidate: &candidates[2],
        capacity: second.capacity_before,
    };
    assert_eq!(
        second.score,
        scorer.score(&donation, &fresh_view, second.remaining_before)
    );
    assert_ne!(second.score, at_full_quantity(2));
}
