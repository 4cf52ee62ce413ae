use super::domain::{Candidate, Donation};
use super::pool::CandidatePool;

/// A candidate is eligible when it takes the donation's category and still has room.
pub fn is_eligible(donation: &Donation, candidate: &Candidate, capacity: u32) -> bool {
    capacity > 0 && candidate.accepts(donation.category)
}

/// Pool indices of every eligible candidate, in input order.
pub(crate) fn eligible_indices(donation: &Donation, pool: &CandidatePool<'_>) -> Vec<usize> {
    (0..pool.len())
        .filter(|&index| is_eligible(donation, pool.candidate(index), pool.capacity(index)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::domain::{CandidateId, FoodCategory, GeoPoint};
    use std::collections::BTreeSet;

    fn donation() -> Donation {
        Donation {
            quantity: 100,
            category: FoodCategory::Dairy,
            expiry_hours: 12.0,
            origin: GeoPoint::new(41.6, -93.6),
        }
    }

    fn candidate(id: &str, categories: &[FoodCategory], capacity: u32) -> Candidate {
        Candidate {
            id: CandidateId(id.to_string()),
            name: format!("{id} pantry"),
            accepted_categories: categories.iter().copied().collect::<BTreeSet<_>>(),
            capacity,
            location: GeoPoint::new(41.6, -93.6),
            reliability: 0.9,
            recent_donations: 0,
            schedule: Vec::new(),
        }
    }

    #[test]
    fn filters_on_category_and_capacity() {
        let candidates = vec![
            candidate("dairy-open", &[FoodCategory::Dairy], 20),
            candidate("dairy-full", &[FoodCategory::Dairy], 0),
            candidate("produce-only", &[FoodCategory::Produce], 50),
            candidate("mixed", &[FoodCategory::Produce, FoodCategory::Dairy], 5),
        ];
        let pool = CandidatePool::new(&candidates);

        assert_eq!(eligible_indices(&donation(), &pool), vec![0, 3]);
    }

    #[test]
    fn drained_candidates_drop_out() {
        let candidates = vec![candidate("only", &[FoodCategory::Dairy], 10)];
        let mut pool = CandidatePool::new(&candidates);
        pool.draw(0, 10);

        assert!(eligible_indices(&donation(), &pool).is_empty());
    }
}
