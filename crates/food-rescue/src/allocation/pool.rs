use std::collections::BTreeMap;

use super::domain::{Candidate, CandidateId, CandidateView};

/// Per-call working copy of candidate capacities.
///
/// The caller's records are borrowed read-only; only the slot capacities change while a
/// donation is being split, so nothing leaks into the next call.
#[derive(Debug)]
pub(crate) struct CandidatePool<'a> {
    candidates: &'a [Candidate],
    capacities: Vec<u32>,
}

impl<'a> CandidatePool<'a> {
    pub(crate) fn new(candidates: &'a [Candidate]) -> Self {
        let capacities = candidates
            .iter()
            .map(|candidate| candidate.capacity)
            .collect();
        Self {
            candidates,
            capacities,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.candidates.len()
    }

    pub(crate) fn candidate(&self, index: usize) -> &'a Candidate {
        &self.candidates[index]
    }

    pub(crate) fn capacity(&self, index: usize) -> u32 {
        self.capacities[index]
    }

    pub(crate) fn view(&self, index: usize) -> CandidateView<'a> {
        CandidateView {
            candidate: &self.candidates[index],
            capacity: self.capacities[index],
        }
    }

    /// Removes `quantity` from the slot, saturating at zero.
    pub(crate) fn draw(&mut self, index: usize, quantity: u32) {
        let slot = &mut self.capacities[index];
        *slot = slot.saturating_sub(quantity);
    }

    /// Remaining capacity per candidate id after the call. Duplicate ids keep the last slot.
    pub(crate) fn remaining_by_id(&self) -> BTreeMap<CandidateId, u32> {
        self.candidates
            .iter()
            .zip(&self.capacities)
            .map(|(candidate, capacity)| (candidate.id.clone(), *capacity))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::domain::{FoodCategory, GeoPoint};
    use std::collections::BTreeSet;

    fn candidate(id: &str, capacity: u32) -> Candidate {
        Candidate {
            id: CandidateId(id.to_string()),
            name: id.to_string(),
            accepted_categories: BTreeSet::from([FoodCategory::Produce]),
            capacity,
            location: GeoPoint::new(0.0, 0.0),
            reliability: 0.5,
            recent_donations: 0,
            schedule: Vec::new(),
        }
    }

    #[test]
    fn draw_leaves_caller_records_untouched() {
        let candidates = vec![candidate("a", 10), candidate("b", 5)];
        let mut pool = CandidatePool::new(&candidates);

        pool.draw(0, 4);
        pool.draw(1, 9);

        assert_eq!(pool.capacity(0), 6);
        assert_eq!(pool.capacity(1), 0);
        assert_eq!(candidates[0].capacity, 10);
        assert_eq!(candidates[1].capacity, 5);
        assert_eq!(pool.view(0).capacity, 6);
        assert_eq!(
            pool.remaining_by_id().get(&CandidateId("a".to_string())),
            Some(&6)
        );
    }
}
