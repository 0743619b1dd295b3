use crate::models::{Listing, RankingPreferences, ScoringWeights, TriState};

/// Budget ceiling used when neither the user nor the listings supply one
pub const DEFAULT_MAX_BUDGET: u32 = 15_000;

/// Derived budget = this factor x the highest rent in the candidate set
pub const DERIVED_BUDGET_FACTOR: f64 = 1.5;

/// Distance at which the distance score reaches zero
pub const DISTANCE_CAP_KM: f64 = 10.0;

pub const MAX_SAFETY_RATING: f64 = 5.0;

// Furnished mismatch multipliers
pub const FURNISHED_WHEN_UNFURNISHED_WANTED: f64 = 0.5;
pub const UNFURNISHED_WHEN_FURNISHED_WANTED: f64 = 0.7;

// Lifestyle mismatch values / multipliers
pub const ALCOHOL_WHEN_NON_ALCOHOLIC_WANTED: f64 = 0.0;
pub const DRY_WHEN_ALCOHOL_WANTED: f64 = 0.5;
pub const NO_SMOKING_WHEN_SMOKING_WANTED: f64 = 0.5;
pub const SMOKING_WHEN_NO_SMOKING_WANTED: f64 = 0.7;

/// Per-component scores, each in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub rent: f64,
    pub distance: f64,
    pub safety: f64,
    pub furnished: f64,
    pub lifestyle: f64,
}

impl ScoreBreakdown {
    /// Weighted sum of the components (unrounded)
    pub fn weighted(&self, weights: &ScoringWeights) -> f64 {
        self.rent * weights.rent
            + self.distance * weights.distance
            + self.safety * weights.safety
            + self.furnished * weights.furnished
            + self.lifestyle * weights.lifestyle
    }
}

/// Pick the budget ceiling to score rents against
///
/// Explicit budget wins; otherwise 1.5x the highest rent among `listings`;
/// otherwise [`DEFAULT_MAX_BUDGET`]. A zero ceiling is never returned.
pub fn resolve_max_budget(listings: &[Listing], preferences: &RankingPreferences) -> u32 {
    let budget = match preferences.max_budget {
        Some(budget) => budget,
        None => listings
            .iter()
            .map(|l| l.rent)
            .max()
            .map(|highest| (highest as f64 * DERIVED_BUDGET_FACTOR) as u32)
            .unwrap_or(DEFAULT_MAX_BUDGET),
    };

    if budget == 0 {
        DEFAULT_MAX_BUDGET
    } else {
        budget
    }
}

/// Score every component of `listing` against `preferences`
pub fn score_components(
    listing: &Listing,
    preferences: &RankingPreferences,
    max_budget: u32,
) -> ScoreBreakdown {
    let rent = clamp_unit(1.0 - listing.rent as f64 / max_budget.max(1) as f64);
    let distance = clamp_unit(1.0 - listing.distance_from_college_km / DISTANCE_CAP_KM);
    let safety = clamp_unit(listing.safety_rating as f64 / MAX_SAFETY_RATING);

    ScoreBreakdown {
        rent,
        distance,
        safety,
        furnished: furnished_bonus(listing, preferences),
        lifestyle: lifestyle_bonus(listing, preferences),
    }
}

/// Final score for a listing, rounded to 2 decimals, plus its breakdown
pub fn calculate_listing_score(
    listing: &Listing,
    preferences: &RankingPreferences,
    max_budget: u32,
    weights: &ScoringWeights,
) -> (f64, ScoreBreakdown) {
    let breakdown = score_components(listing, preferences, max_budget);
    (round_score(breakdown.weighted(weights)), breakdown)
}

#[inline]
fn furnished_bonus(listing: &Listing, preferences: &RankingPreferences) -> f64 {
    let mut bonus = if listing.furnished { 1.0 } else { 0.0 };

    match preferences.furnished {
        TriState::No if listing.furnished => bonus *= FURNISHED_WHEN_UNFURNISHED_WANTED,
        TriState::Yes if !listing.furnished => bonus *= UNFURNISHED_WHEN_FURNISHED_WANTED,
        _ => {}
    }

    clamp_unit(bonus)
}

/// Alcohol sets the base, smoking multiplies on top of it
#[inline]
fn lifestyle_bonus(listing: &Listing, preferences: &RankingPreferences) -> f64 {
    let mut bonus = match preferences.non_alcoholic {
        TriState::Yes if !listing.non_alcoholic => ALCOHOL_WHEN_NON_ALCOHOLIC_WANTED,
        TriState::No if listing.non_alcoholic => DRY_WHEN_ALCOHOL_WANTED,
        _ => 1.0,
    };

    match preferences.smoking_allowed {
        TriState::Yes if !listing.smoking_allowed => bonus *= NO_SMOKING_WHEN_SMOKING_WANTED,
        TriState::No if listing.smoking_allowed => bonus *= SMOKING_WHEN_NO_SMOKING_WANTED,
        _ => {}
    }

    clamp_unit(bonus)
}

#[inline]
fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[inline]
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
