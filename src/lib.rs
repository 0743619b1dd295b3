//! Nest Algo - preference memory and recommendation ranking for student accommodation search
//!
//! A chat turn either asks about accommodation policies or searches for a
//! place to live. Searches accumulate per-session preferences, fold them
//! into the outgoing query and rank whatever listings come back.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{extract_preferences, merge_memory_with_query, rank, summarize, Ranker, KeywordExtractor, PreferenceExtractor};
pub use models::{PreferenceProfile, Listing, ScoredListing, RankingPreferences, TriState, RoomType, ChatRequest, ChatResponse};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let profile = extract_preferences("pg under 9000", PreferenceProfile::new());
        assert_eq!(merge_memory_with_query("find a place", &profile), "find a place pg accommodation under 9000");
        assert!(rank(&[], &RankingPreferences::default()).is_empty());
    }
}
