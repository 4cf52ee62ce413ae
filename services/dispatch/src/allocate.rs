use crate::infra::{
    apply_overrides, heuristic_scorer, load_candidates, load_donation, parse_decay_km,
    parse_scorer, resolve_scorer, ResolvedScorer,
};
use clap::Args;
use food_rescue::allocation::{
    allocate, AllocationOutcome, Candidate, CandidateView, Donation, HeuristicScorer,
    ScoreBreakdown,
};
use food_rescue::config::{AllocationConfig, ScorerKind};
use food_rescue::error::AppError;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// JSON file holding the donation (quantity, category, expiry_hours, latitude, longitude)
    #[arg(long)]
    pub(crate) donation: PathBuf,
    /// Recipient roster as CSV, or as a JSON array of candidate records
    #[arg(long)]
    pub(crate) candidates: PathBuf,
    /// Scoring strategy (heuristic or learned); overrides ALLOCATION_SCORER
    #[arg(long, value_parser = parse_scorer)]
    pub(crate) scorer: Option<ScorerKind>,
    /// Learned model artifact; overrides ALLOCATION_MODEL_PATH
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Distance decay in kilometres; overrides ALLOCATION_DISTANCE_DECAY_KM
    #[arg(long, value_parser = parse_decay_km)]
    pub(crate) decay_km: Option<f64>,
    /// Emit the outcome as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
    /// Show the heuristic score breakdown behind each round
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Serialize)]
struct AllocationReport<'a> {
    scorer: &'static str,
    requested_scorer: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_reason: Option<&'a str>,
    donation: &'a Donation,
    outcome: &'a AllocationOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    explanations: Vec<RoundExplanation>,
}

#[derive(Serialize)]
struct RoundExplanation {
    round: usize,
    candidate_id: String,
    breakdown: ScoreBreakdown,
}

pub(crate) fn run_allocate(args: AllocateArgs, config: AllocationConfig) -> Result<(), AppError> {
    let AllocateArgs {
        donation,
        candidates,
        scorer,
        model,
        decay_km,
        json,
        explain,
    } = args;

    let config = apply_overrides(config, scorer, model, decay_km);
    let donation = load_donation(&donation)?;
    let candidates = load_candidates(&candidates)?;
    let resolved = resolve_scorer(&config)?;

    let outcome = allocate(&donation, &candidates, resolved.scorer.as_ref());
    let explanations = if explain {
        explain_rounds(&heuristic_scorer(&config)?, &donation, &candidates, &outcome)
    } else {
        Vec::new()
    };

    if json {
        let report = AllocationReport {
            scorer: resolved.label(),
            requested_scorer: resolved.requested.label(),
            fallback_reason: resolved.fallback.as_deref(),
            donation: &donation,
            outcome: &outcome,
            explanations,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_outcome(&resolved, &donation, &candidates, &outcome);
        render_explanations(&explanations);
    }

    Ok(())
}

/// Re-scores each round with the heuristic so operators can see which criteria drove it.
fn explain_rounds(
    heuristic: &HeuristicScorer,
    donation: &Donation,
    candidates: &[Candidate],
    outcome: &AllocationOutcome,
) -> Vec<RoundExplanation> {
    outcome
        .rounds
        .iter()
        .filter_map(|round| {
            let candidate = candidates
                .iter()
                .find(|candidate| candidate.id == round.candidate_id)?;
            let view = CandidateView {
                candidate,
                capacity: round.capacity_before,
            };
            Some(RoundExplanation {
                round: round.round,
                candidate_id: round.candidate_id.to_string(),
                breakdown: heuristic.breakdown(donation, &view, round.remaining_before),
            })
        })
        .collect()
}

pub(crate) fn render_outcome(
    resolved: &ResolvedScorer,
    donation: &Donation,
    candidates: &[Candidate],
    outcome: &AllocationOutcome,
) {
    println!("=== Donation Allocation ===");
    println!(
        "Donation: {} x {} (expires in {:.1}h) from ({:.4}, {:.4})",
        donation.quantity,
        donation.category,
        donation.expiry_hours,
        donation.origin.latitude,
        donation.origin.longitude
    );
    println!("Roster size: {}", candidates.len());
    match &resolved.fallback {
        Some(reason) => println!(
            "Scorer: {} (requested {}; {})",
            resolved.label(),
            resolved.requested.label(),
            reason
        ),
        None => println!("Scorer: {}", resolved.label()),
    }

    if outcome.allocations.is_empty() {
        println!("No recipient could accept this donation.");
    } else {
        println!("Allocations:");
        for allocation in &outcome.allocations {
            println!(
                "  - {} ({}): {} units, score {:.3}",
                allocation.candidate_name,
                allocation.candidate_id,
                allocation.allocated_quantity,
                allocation.score
            );
        }
    }

    println!(
        "Allocated {} of {} units; leftover {}",
        outcome.allocated_quantity(),
        donation.quantity,
        outcome.leftover_quantity
    );
    if !outcome.is_fully_allocated() {
        println!("Leftover requires fallback handling (compost, secondary partners, or hold).");
    }
}

fn render_explanations(explanations: &[RoundExplanation]) {
    if explanations.is_empty() {
        return;
    }

    println!("Heuristic breakdown:");
    for explanation in explanations {
        println!(
            "  Round {} -> {} (total {:.3})",
            explanation.round, explanation.candidate_id, explanation.breakdown.total
        );
        for component in &explanation.breakdown.components {
            println!(
                "    {:<12} fit {:.3} weighted {:.3}",
                format!("{:?}", component.factor),
                component.fit,
                component.weighted
            );
        }
    }
}
