use crate::core::{
    explain::explain_score,
    scoring::{calculate_listing_score, resolve_max_budget},
};
use crate::models::{Listing, RankingPreferences, ScoredListing, ScoringWeights};

/// Number of recommendations returned per request
pub const TOP_N: usize = 5;

/// Result of the ranking process
#[derive(Debug, Clone, PartialEq)]
pub struct RankResult {
    pub listings: Vec<ScoredListing>,
    pub total_candidates: usize,
    pub max_budget: u32,
}

/// Recommendation ranker
///
/// # Pipeline
/// 1. Resolve the budget ceiling (explicit, derived from rents, or default)
/// 2. Score and explain every listing
/// 3. Stable sort by score, highest first
/// 4. Keep the top [`TOP_N`]
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: ScoringWeights,
}

impl Ranker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank `listings` against `preferences`
    ///
    /// Listings with equal scores keep their input order.
    pub fn rank(&self, listings: Vec<Listing>, preferences: &RankingPreferences) -> RankResult {
        let total_candidates = listings.len();
        let max_budget = resolve_max_budget(&listings, preferences);

        let mut scored: Vec<ScoredListing> = listings
            .into_iter()
            .map(|listing| {
                let (score, breakdown) =
                    calculate_listing_score(&listing, preferences, max_budget, &self.weights);
                let reason = explain_score(&breakdown, &listing, preferences);

                ScoredListing { listing, score, reason }
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(TOP_N);

        tracing::debug!(
            "Ranked {} candidates against budget {}, kept {}",
            total_candidates,
            max_budget,
            scored.len()
        );

        RankResult {
            listings: scored,
            total_candidates,
            max_budget,
        }
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Rank with the standard weights and return the top listings
pub fn rank(listings: &[Listing], preferences: &RankingPreferences) -> Vec<ScoredListing> {
    Ranker::default().rank(listings.to_vec(), preferences).listings
}
