use super::super::domain::{CandidateView, Donation};
use super::super::geo::haversine_km;
use super::{
    DistanceDecay, ScoreBreakdown, ScoreComponent, ScoreFactor, Scorer, ScoringError,
    ScoringWeights, URGENCY_HORIZON_HOURS,
};

/// Hand-tuned weighted sum over urgency, distance, capacity, reliability, and fairness.
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    weights: ScoringWeights,
    decay: DistanceDecay,
}

struct Fits {
    urgency: f64,
    distance: f64,
    capacity: f64,
    reliability: f64,
    fairness: f64,
}

impl HeuristicScorer {
    pub fn new(weights: ScoringWeights, decay: DistanceDecay) -> Result<Self, ScoringError> {
        weights.validate()?;
        Ok(Self { weights, decay })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn decay(&self) -> &DistanceDecay {
        &self.decay
    }

    /// Per-criterion contributions behind [`Scorer::score`].
    pub fn breakdown(
        &self,
        donation: &Donation,
        candidate: &CandidateView<'_>,
        remaining_quantity: u32,
    ) -> ScoreBreakdown {
        if remaining_quantity == 0 {
            return ScoreBreakdown {
                components: Vec::new(),
                total: 0.0,
            };
        }

        let fits = self.fits(donation, candidate, remaining_quantity);
        let components = vec![
            self.component(ScoreFactor::Urgency, fits.urgency, self.weights.urgency),
            self.component(ScoreFactor::Distance, fits.distance, self.weights.distance),
            self.component(ScoreFactor::Capacity, fits.capacity, self.weights.capacity),
            self.component(
                ScoreFactor::Reliability,
                fits.reliability,
                self.weights.reliability,
            ),
            self.component(ScoreFactor::Fairness, fits.fairness, self.weights.fairness),
        ];
        let total = components.iter().map(|component| component.weighted).sum();

        ScoreBreakdown { components, total }
    }

    fn component(&self, factor: ScoreFactor, fit: f64, weight: f64) -> ScoreComponent {
        ScoreComponent {
            factor,
            fit,
            weighted: fit * weight,
        }
    }

    fn fits(&self, donation: &Donation, candidate: &CandidateView<'_>, remaining: u32) -> Fits {
        let urgency = (1.0 - donation.expiry_hours / URGENCY_HORIZON_HOURS).max(0.0);
        let distance_km = haversine_km(donation.origin, candidate.candidate.location);
        let capacity = f64::from(candidate.capacity.min(remaining)) / f64::from(remaining);
        let fairness = 1.0 / (1.0 + f64::from(candidate.candidate.recent_donations));

        Fits {
            urgency,
            distance: self.decay.fit(distance_km),
            capacity,
            reliability: candidate.candidate.reliability,
            fairness,
        }
    }
}

impl Scorer for HeuristicScorer {
    fn score(
        &self,
        donation: &Donation,
        candidate: &CandidateView<'_>,
        remaining_quantity: u32,
    ) -> f64 {
        if remaining_quantity == 0 {
            return 0.0;
        }

        let fits = self.fits(donation, candidate, remaining_quantity);
        let weights = &self.weights;
        weights.urgency * fits.urgency
            + weights.distance * fits.distance
            + weights.capacity * fits.capacity
            + weights.reliability * fits.reliability
            + weights.fairness * fits.fairness
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}
