use serde::{Deserialize, Serialize};

/// Three-valued preference flag
///
/// `Unknown` means the user has not said anything about the field yet and is
/// never the same thing as `No`. Serialized as `null` / `true` / `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriState {
    #[default]
    Unknown,
    Yes,
    No,
}

impl TriState {
    pub fn is_known(self) -> bool {
        self != TriState::Unknown
    }

    pub fn as_option(self) -> Option<bool> {
        match self {
            TriState::Unknown => None,
            TriState::Yes => Some(true),
            TriState::No => Some(false),
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => TriState::Unknown,
            Some(true) => TriState::Yes,
            Some(false) => TriState::No,
        }
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        value.as_option()
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::Yes
        } else {
            TriState::No
        }
    }
}

/// Accommodation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    #[serde(rename = "pg")]
    Pg,
    #[serde(rename = "1rk")]
    OneRk,
    #[serde(rename = "1bhk")]
    OneBhk,
    #[serde(rename = "3bhk")]
    ThreeBhk,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Pg => "pg",
            RoomType::OneRk => "1rk",
            RoomType::OneBhk => "1bhk",
            RoomType::ThreeBhk => "3bhk",
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferences accumulated over one chat session
///
/// Fields are only ever overwritten when a query carries new evidence for
/// them; nothing clears a field once it is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(default)]
    pub budget: Option<u32>,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub room_type: Option<RoomType>,
    #[serde(default)]
    pub non_alcoholic: TriState,
    #[serde(default)]
    pub furnished: TriState,
    #[serde(default)]
    pub smoking_allowed: TriState,
}

impl PreferenceProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field has been set yet
    pub fn is_empty(&self) -> bool {
        self.budget.is_none()
            && self.preferred_location.is_none()
            && self.room_type.is_none()
            && !self.non_alcoholic.is_known()
            && !self.furnished.is_known()
            && !self.smoking_allowed.is_known()
    }
}

/// Accommodation record as returned by the listing store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub rent: u32,
    pub location: String,
    pub distance_from_college_km: f64,
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    pub non_alcoholic: bool,
    #[serde(default)]
    pub smoking_allowed: bool,
    pub safety_rating: u8,
    #[serde(default)]
    pub roommates_allowed: bool,
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool { true }

/// Listing with its suitability score and justification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub score: f64,
    pub reason: String,
}

/// Preferences the ranker scores against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingPreferences {
    #[serde(default)]
    pub max_budget: Option<u32>,
    #[serde(default)]
    pub non_alcoholic: TriState,
    #[serde(default)]
    pub furnished: TriState,
    #[serde(default)]
    pub smoking_allowed: TriState,
}

impl From<&PreferenceProfile> for RankingPreferences {
    fn from(profile: &PreferenceProfile) -> Self {
        Self {
            max_budget: profile.budget,
            non_alcoholic: profile.non_alcoholic,
            furnished: profile.furnished,
            smoking_allowed: profile.smoking_allowed,
        }
    }
}

pub const RENT_WEIGHT: f64 = 0.35;
pub const DISTANCE_WEIGHT: f64 = 0.25;
pub const SAFETY_WEIGHT: f64 = 0.20;
pub const FURNISHED_WEIGHT: f64 = 0.10;
pub const LIFESTYLE_WEIGHT: f64 = 0.10;

/// Scoring weights (sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub rent: f64,
    pub distance: f64,
    pub safety: f64,
    pub furnished: f64,
    pub lifestyle: f64,
}

impl ScoringWeights {
    pub const STANDARD: ScoringWeights = ScoringWeights {
        rent: RENT_WEIGHT,
        distance: DISTANCE_WEIGHT,
        safety: SAFETY_WEIGHT,
        furnished: FURNISHED_WEIGHT,
        lifestyle: LIFESTYLE_WEIGHT,
    };

    pub fn total(&self) -> f64 {
        self.rent + self.distance + self.safety + self.furnished + self.lifestyle
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tristate_serializes_as_nullable_bool() {
        assert_eq!(serde_json::to_string(&TriState::Unknown).unwrap(), "null");
        assert_eq!(serde_json::to_string(&TriState::Yes).unwrap(), "true");
        assert_eq!(serde_json::to_string(&TriState::No).unwrap(), "false");

        let parsed: TriState = serde_json::from_str("false").unwrap();
        assert_eq!(parsed, TriState::No);
    }

    #[test]
    fn test_profile_missing_fields_are_unknown() {
        let profile: PreferenceProfile = serde_json::from_str(r#"{"budget": 9000}"#).unwrap();
        assert_eq!(profile.budget, Some(9000));
        assert_eq!(profile.furnished, TriState::Unknown);
        assert!(!profile.is_empty());
        assert!(PreferenceProfile::new().is_empty());
    }

    #[test]
    fn test_room_type_wire_names() {
        assert_eq!(serde_json::to_string(&RoomType::OneBhk).unwrap(), "\"1bhk\"");
        let parsed: RoomType = serde_json::from_str("\"pg\"").unwrap();
        assert_eq!(parsed, RoomType::Pg);
    }

    #[test]
    fn test_scored_listing_flattens_listing() {
        let scored = ScoredListing {
            listing: Listing {
                id: 7,
                kind: "pg".to_string(),
                rent: 8000,
                location: "Powai".to_string(),
                distance_from_college_km: 1.5,
                furnished: true,
                non_alcoholic: true,
                smoking_allowed: false,
                safety_rating: 4,
                roommates_allowed: true,
                available: true,
            },
            score: 0.81,
            reason: "Affordable rent".to_string(),
        };

        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["type"], "pg");
        assert_eq!(json["rent"], 8000);
        assert_eq!(json["score"], 0.81);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = ScoringWeights::default();
        assert!((weights.total() - 1.0).abs() < 1e-9);
    }
}
