// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    TriState, RoomType, PreferenceProfile, Listing, ScoredListing, RankingPreferences, ScoringWeights,
    RENT_WEIGHT, DISTANCE_WEIGHT, SAFETY_WEIGHT, FURNISHED_WEIGHT, LIFESTYLE_WEIGHT,
};
pub use requests::ChatRequest;
pub use responses::{ChatResponse, ChatReply, PreferencesResponse, HealthResponse, ErrorResponse};
