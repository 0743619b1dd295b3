use crate::core::scoring::ScoreBreakdown;
use crate::models::{Listing, RankingPreferences, TriState};

pub const BASIC_ACCOMMODATION: &str = "Basic accommodation";

/// Build the comma-separated justification for a scored listing
///
/// Fragments come from fixed score bands, followed by lifestyle matches the
/// user asked for. Falls back to [`BASIC_ACCOMMODATION`].
pub fn explain_score(
    breakdown: &ScoreBreakdown,
    listing: &Listing,
    preferences: &RankingPreferences,
) -> String {
    let mut reasons: Vec<&str> = Vec::new();

    if breakdown.rent > 0.7 {
        reasons.push("Affordable rent");
    } else if breakdown.rent > 0.5 {
        reasons.push("Reasonable rent");
    }

    if breakdown.distance > 0.7 {
        reasons.push("Close to college");
    } else if breakdown.distance > 0.5 {
        reasons.push("Moderate distance");
    }

    if breakdown.safety > 0.6 {
        reasons.push("Good safety rating");
    } else if breakdown.safety > 0.4 {
        reasons.push("Average safety");
    }

    if breakdown.furnished > 0.5 {
        reasons.push("Furnished");
    }

    if breakdown.lifestyle > 0.7 {
        reasons.push("Perfect lifestyle match");
    } else if breakdown.lifestyle > 0.5 {
        reasons.push("Good lifestyle match");
    }

    if preferences.non_alcoholic == TriState::Yes && listing.non_alcoholic {
        reasons.push("Alcohol-free environment");
    }
    if preferences.smoking_allowed == TriState::No && !listing.smoking_allowed {
        reasons.push("Smoke-free environment");
    }

    if reasons.is_empty() {
        BASIC_ACCOMMODATION.to_string()
    } else {
        reasons.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(non_alcoholic: bool, smoking_allowed: bool) -> Listing {
        Listing {
            id: 3,
            kind: "1rk".to_string(),
            rent: 9000,
            location: "Wakad".to_string(),
            distance_from_college_km: 2.0,
            furnished: false,
            non_alcoholic,
            smoking_allowed,
            safety_rating: 3,
            roommates_allowed: false,
            available: true,
        }
    }

    fn breakdown(rent: f64, distance: f64, safety: f64, furnished: f64, lifestyle: f64) -> ScoreBreakdown {
        ScoreBreakdown { rent, distance, safety, furnished, lifestyle }
    }

    #[test]
    fn test_top_bands() {
        let reason = explain_score(
            &breakdown(0.8, 0.9, 0.8, 1.0, 1.0),
            &listing(false, true),
            &RankingPreferences::default(),
        );
        assert_eq!(
            reason,
            "Affordable rent, Close to college, Good safety rating, Furnished, Perfect lifestyle match"
        );
    }

    #[test]
    fn test_middle_bands() {
        let reason = explain_score(
            &breakdown(0.6, 0.6, 0.6, 0.5, 0.6),
            &listing(false, true),
            &RankingPreferences::default(),
        );
        // Safety of exactly 0.6 and furnished of exactly 0.5 fall to the lower band
        assert_eq!(reason, "Reasonable rent, Moderate distance, Average safety, Good lifestyle match");
    }

    #[test]
    fn test_fallback() {
        let reason = explain_score(
            &breakdown(0.1, 0.1, 0.2, 0.0, 0.0),
            &listing(false, true),
            &RankingPreferences::default(),
        );
        assert_eq!(reason, BASIC_ACCOMMODATION);
    }

    #[test]
    fn test_requested_lifestyle_fragments() {
        let prefs = RankingPreferences {
            non_alcoholic: TriState::Yes,
            smoking_allowed: TriState::No,
            ..Default::default()
        };
        let reason = explain_score(&breakdown(0.0, 0.0, 0.2, 0.0, 0.3), &listing(true, false), &prefs);
        assert_eq!(reason, "Alcohol-free environment, Smoke-free environment");
    }
}
