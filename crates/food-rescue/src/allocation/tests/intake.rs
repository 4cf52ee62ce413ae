use crate::allocation::domain::{FoodCategory, UnknownCategory};
use crate::allocation::intake::{
    CandidateGuard, CandidateSubmission, DonationGuard, DonationSubmission, InvalidCandidate,
    InvalidDonation,
};

fn donation_submission() -> DonationSubmission {
    DonationSubmission {
        quantity: 120,
        category: Some(" Prepared Meals ".to_string()),
        expiry_hours: 4.5,
        latitude: 41.5868,
        longitude: -93.625,
    }
}

fn candidate_submission(id: &str) -> CandidateSubmission {
    CandidateSubmission {
        id: id.to_string(),
        name: "Eastside Shelter".to_string(),
        accepted_categories: vec!["prepared_meals".to_string(), "Bakery".to_string()],
        capacity: 80,
        latitude: 41.6,
        longitude: -93.58,
        reliability: 0.92,
        recent_donations: 2,
        schedule: Vec::new(),
    }
}

#[test]
fn guard_builds_donation_from_valid_submission() {
    let donation = DonationGuard::validate(donation_submission()).expect("valid donation");

    assert_eq!(donation.quantity, 120);
    assert_eq!(donation.category, FoodCategory::PreparedMeals);
    assert_eq!(donation.expiry_hours, 4.5);
}

#[test]
fn guard_rejects_non_positive_quantity() {
    for quantity in [0, -5] {
        let submission = DonationSubmission {
            quantity,
            ..donation_submission()
        };
        assert_eq!(
            DonationGuard::validate(submission),
            Err(InvalidDonation::NonPositiveQuantity(quantity))
        );
    }
}

#[test]
fn guard_rejects_missing_or_unknown_category() {
    let missing = DonationSubmission {
        category: None,
        ..donation_submission()
    };
    assert_eq!(
        DonationGuard::validate(missing),
        Err(InvalidDonation::MissingCategory)
    );

    let blank = DonationSubmission {
        category: Some("   ".to_string()),
        ..donation_submission()
    };
    assert_eq!(
        DonationGuard::validate(blank),
        Err(InvalidDonation::MissingCategory)
    );

    let unknown = DonationSubmission {
        category: Some("furniture".to_string()),
        ..donation_submission()
    };
    assert_eq!(
        DonationGuard::validate(unknown),
        Err(InvalidDonation::UnknownCategory(UnknownCategory(
            "furniture".to_string()
        )))
    );
}

#[test]
fn guard_rejects_bad_expiry_and_origin() {
    let expired = DonationSubmission {
        expiry_hours: -1.0,
        ..donation_submission()
    };
    assert!(matches!(
        DonationGuard::validate(expired),
        Err(InvalidDonation::InvalidExpiry(_))
    ));

    let off_planet = DonationSubmission {
        latitude: 95.0,
        ..donation_submission()
    };
    assert!(matches!(
        DonationGuard::validate(off_planet),
        Err(InvalidDonation::InvalidOrigin { .. })
    ));
}

#[test]
fn candidate_guard_normalizes_categories_and_name() {
    let mut submission = candidate_submission("shelter-1");
    submission.name = "  ".to_string();

    let candidate = CandidateGuard::validate(submission).expect("valid candidate");

    assert_eq!(candidate.name, "shelter-1");
    assert!(candidate.accepts(FoodCategory::PreparedMeals));
    assert!(candidate.accepts(FoodCategory::Bakery));
    assert!(!candidate.accepts(FoodCategory::Dairy));
}

#[test]
fn candidate_guard_rejects_out_of_range_fields() {
    let mut reliability = candidate_submission("r");
    reliability.reliability = 1.2;
    assert!(matches!(
        CandidateGuard::validate(reliability),
        Err(InvalidCandidate::ReliabilityOutOfRange { .. })
    ));

    let mut capacity = candidate_submission("c");
    capacity.capacity = -1;
    assert!(matches!(
        CandidateGuard::validate(capacity),
        Err(InvalidCandidate::CapacityOutOfRange { .. })
    ));

    let mut category = candidate_submission("k");
    category.accepted_categories.push("lumber".to_string());
    assert!(matches!(
        CandidateGuard::validate(category),
        Err(InvalidCandidate::UnknownCategory { .. })
    ));

    let mut id = candidate_submission("");
    id.id = " ".to_string();
    assert_eq!(
        CandidateGuard::validate(id),
        Err(InvalidCandidate::MissingId)
    );
}

#[test]
fn roster_rejects_duplicate_ids() {
    let roster = vec![candidate_submission("dup"), candidate_submission(" dup ")];

    assert_eq!(
        CandidateGuard::validate_roster(roster),
        Err(InvalidCandidate::DuplicateId {
            id: "dup".to_string()
        })
    );
}

#[test]
fn zero_capacity_candidates_are_valid_records() {
    let mut submission = candidate_submission("full");
    submission.capacity = 0;

    let candidate = CandidateGuard::validate(submission).expect("valid");
    assert_eq!(candidate.capacity, 0);
}
