use crate::allocate::render_outcome;
use crate::infra::{apply_overrides, parse_decay_km, parse_scorer, resolve_scorer};
use clap::Args;
use food_rescue::allocation::{
    allocate, Candidate, CandidateGuard, CandidateSubmission, DonationGuard, DonationSubmission,
};
use food_rescue::config::{AllocationConfig, ScorerKind};
use food_rescue::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Scoring strategy for the walkthrough (heuristic or learned)
    #[arg(long, value_parser = parse_scorer)]
    pub(crate) scorer: Option<ScorerKind>,
    /// Learned model artifact to load when the learned scorer is selected
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Distance decay in kilometres
    #[arg(long, value_parser = parse_decay_km)]
    pub(crate) decay_km: Option<f64>,
}

pub(crate) fn run_demo(args: DemoArgs, config: AllocationConfig) -> Result<(), AppError> {
    let DemoArgs {
        scorer,
        model,
        decay_km,
    } = args;

    let config = apply_overrides(config, scorer, model, decay_km);
    let resolved = resolve_scorer(&config)?;
    let candidates = demo_roster()?;

    for (title, submission) in demo_donations() {
        let donation = DonationGuard::validate(submission)?;
        println!();
        println!("--- {title} ---");
        let outcome = allocate(&donation, &candidates, resolved.scorer.as_ref());
        render_outcome(&resolved, &donation, &candidates, &outcome);
        for round in &outcome.rounds {
            println!(
                "  round {}: {} had capacity {} for {} remaining, took {}",
                round.round,
                round.candidate_id,
                round.capacity_before,
                round.remaining_before,
                round.allocated
            );
        }
    }

    Ok(())
}

fn recipient(
    id: &str,
    name: &str,
    categories: &[&str],
    capacity: i64,
    location: (f64, f64),
    reliability: f64,
    recent_donations: i64,
) -> CandidateSubmission {
    CandidateSubmission {
        id: id.to_string(),
        name: name.to_string(),
        accepted_categories: categories.iter().map(|c| c.to_string()).collect(),
        capacity,
        latitude: location.0,
        longitude: location.1,
        reliability,
        recent_donations,
        schedule: Vec::new(),
    }
}

fn demo_roster() -> Result<Vec<Candidate>, AppError> {
    let submissions = vec![
        recipient(
            "downtown-pantry",
            "Downtown Community Pantry",
            &["produce", "bakery", "pantry"],
            120,
            (41.5868, -93.625),
            0.95,
            4,
        ),
        recipient(
            "eastside-shelter",
            "Eastside Family Shelter",
            &["prepared meals", "produce", "dairy"],
            60,
            (41.6005, -93.5630),
            0.85,
            0,
        ),
        recipient(
            "ankeny-food-bank",
            "Ankeny Regional Food Bank",
            &["produce", "dairy", "frozen", "meat"],
            150,
            (41.7318, -93.6001),
            0.75,
            1,
        ),
        recipient(
            "ames-student-pantry",
            "Ames Student Pantry",
            &["bakery", "pantry"],
            80,
            (42.0347, -93.6199),
            0.6,
            0,
        ),
    ];

    Ok(CandidateGuard::validate_roster(submissions)?)
}

fn demo_donations() -> Vec<(&'static str, DonationSubmission)> {
    vec![
        (
            "Urgent produce from a downtown grocer",
            DonationSubmission {
                quantity: 250,
                category: Some("produce".to_string()),
                expiry_hours: 4.0,
                latitude: 41.5900,
                longitude: -93.6200,
            },
        ),
        (
            "Bakery surplus that exceeds local capacity",
            DonationSubmission {
                quantity: 300,
                category: Some("bakery".to_string()),
                expiry_hours: 18.0,
                latitude: 41.9000,
                longitude: -93.6100,
            },
        ),
        (
            "Beverages nobody on the roster accepts",
            DonationSubmission {
                quantity: 40,
                category: Some("beverages".to_string()),
                expiry_hours: 72.0,
                latitude: 41.6000,
                longitude: -93.6000,
            },
        ),
    ]
}
