// Core algorithm exports
pub mod classifier;
pub mod explain;
pub mod keywords;
pub mod memory;
pub mod ranker;
pub mod scoring;

pub use classifier::PolicyClassifier;
pub use explain::explain_score;
pub use keywords::{KeywordRule, KeywordTables, MentionKeywords};
pub use memory::{
    extract_preferences, merge_memory_with_query, merge_with_query, summarize, KeywordExtractor,
    PreferenceExtractor, NO_PREFERENCES_SUMMARY,
};
pub use ranker::{rank, RankResult, Ranker, TOP_N};
pub use scoring::{calculate_listing_score, resolve_max_budget, ScoreBreakdown, DEFAULT_MAX_BUDGET};
