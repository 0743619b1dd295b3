//! Session preference memory.
//!
//! Pulls structured preferences out of free-text queries, folds them back
//! into terse follow-up queries and renders a one-line summary.

use regex::Regex;
use std::sync::LazyLock;
use crate::core::keywords::{first_match, title_case, KeywordTables, MentionKeywords};
use crate::models::{PreferenceProfile, TriState};

// ASCII digits only; `\d` would also match scripts `u32::from_str` rejects
static BUDGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"under\s+([0-9]{4,5})|below\s+([0-9]{4,5})|([0-9]{4,5})").unwrap()
});

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{4,5}").unwrap());

static DEFAULT_EXTRACTOR: LazyLock<KeywordExtractor> = LazyLock::new(KeywordExtractor::default);

pub const NO_PREFERENCES_SUMMARY: &str =
    "🧠 No specific preferences set yet. Tell me what you're looking for!";

const SUMMARY_PREFIX: &str = "🧠 Your preferences: ";

/// Turns free text into preference evidence
///
/// Implementations only overwrite fields the text gives evidence for and
/// must leave every other field exactly as it was.
pub trait PreferenceExtractor: Send + Sync {
    fn extract(&self, query: &str, profile: &mut PreferenceProfile);
}

/// Substring/regex extractor driven by [`KeywordTables`]
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    tables: KeywordTables,
}

impl KeywordExtractor {
    pub fn new(tables: KeywordTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &KeywordTables {
        &self.tables
    }

    fn find_location(&self, text: &str) -> Option<String> {
        self.tables
            .locations
            .iter()
            .find(|loc| text.contains(loc.as_str()))
            .map(|loc| title_case(loc))
    }
}

impl PreferenceExtractor for KeywordExtractor {
    fn extract(&self, query: &str, profile: &mut PreferenceProfile) {
        let q = query.to_lowercase();

        if let Some(budget) = extract_budget(&q) {
            profile.budget = Some(budget);
        }

        if let Some(location) = self.find_location(&q) {
            profile.preferred_location = Some(location);
        }

        if let Some(room_type) = first_match(&self.tables.room_types, &q) {
            profile.room_type = Some(room_type);
        }

        if let Some(non_alcoholic) = first_match(&self.tables.alcohol, &q) {
            profile.non_alcoholic = non_alcoholic.into();
        }

        if let Some(furnished) = first_match(&self.tables.furnished, &q) {
            profile.furnished = furnished.into();
        }

        if let Some(smoking_allowed) = first_match(&self.tables.smoking, &q) {
            profile.smoking_allowed = smoking_allowed.into();
        }
    }
}

/// First 4-5 digit amount in `text`, preferring "under N" / "below N" phrasing
/// when it is the earliest match. Zero is not a budget.
pub fn extract_budget(text: &str) -> Option<u32> {
    let caps = BUDGET_RE.captures(text)?;
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|budget| *budget > 0)
}

/// Update `profile` from `query` using the built-in keyword tables
pub fn extract_preferences(query: &str, mut profile: PreferenceProfile) -> PreferenceProfile {
    DEFAULT_EXTRACTOR.extract(query, &mut profile);
    profile
}

/// Append canonical clauses for remembered preferences the query doesn't mention
///
/// Clause order: room type, location, budget, alcohol, smoking, furnished.
pub fn merge_with_query(query: &str, profile: &PreferenceProfile, mentions: &MentionKeywords) -> String {
    let query_lower = query.to_lowercase();
    let mut parts = vec![query.to_string()];

    if let Some(room_type) = profile.room_type {
        if !query_lower.contains(room_type.as_str()) {
            parts.push(format!("{} accommodation", room_type));
        }
    }

    if let Some(location) = &profile.preferred_location {
        let lower = location.to_lowercase();
        let compact = lower.replace(' ', "");
        if !query_lower.contains(&lower) && !query_lower.contains(&compact) {
            parts.push(format!("in {}", location));
        }
    }

    if let Some(budget) = profile.budget {
        if !AMOUNT_RE.is_match(&query_lower) {
            parts.push(format!("under {}", budget));
        }
    }

    if !query_lower.contains(mentions.alcohol.as_str()) {
        match profile.non_alcoholic {
            TriState::Yes => parts.push("alcohol-free accommodation".to_string()),
            TriState::No => parts.push("alcohol allowed accommodation".to_string()),
            TriState::Unknown => {}
        }
    }

    if !query_lower.contains(mentions.smoking.as_str()) {
        match profile.smoking_allowed {
            TriState::No => parts.push("smoke-free accommodation".to_string()),
            TriState::Yes => parts.push("smoking friendly accommodation".to_string()),
            TriState::Unknown => {}
        }
    }

    if !query_lower.contains(mentions.furnished.as_str()) {
        match profile.furnished {
            TriState::Yes => parts.push("furnished accommodation".to_string()),
            TriState::No => parts.push("unfurnished accommodation".to_string()),
            TriState::Unknown => {}
        }
    }

    parts.join(" ")
}

/// [`merge_with_query`] with the default mention keywords
pub fn merge_memory_with_query(query: &str, profile: &PreferenceProfile) -> String {
    merge_with_query(query, profile, &DEFAULT_EXTRACTOR.tables().mentions)
}

/// Human-readable summary of the set fields
///
/// Order: budget, location, room type, alcohol, furnished, smoking.
pub fn summarize(profile: &PreferenceProfile) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(budget) = profile.budget {
        parts.push(format!("Budget: ₹{}", group_thousands(budget)));
    }

    if let Some(location) = &profile.preferred_location {
        parts.push(format!("Location: {}", location));
    }

    if let Some(room_type) = profile.room_type {
        parts.push(format!("Type: {}", room_type.as_str().to_uppercase()));
    }

    if let Some(non_alcoholic) = profile.non_alcoholic.as_option() {
        parts.push(if non_alcoholic { "No alcohol" } else { "Alcohol allowed" }.to_string());
    }

    if let Some(furnished) = profile.furnished.as_option() {
        parts.push(if furnished { "Furnished" } else { "Unfurnished" }.to_string());
    }

    if let Some(smoking_allowed) = profile.smoking_allowed.as_option() {
        parts.push(if smoking_allowed { "Smoking allowed" } else { "No smoking" }.to_string());
    }

    if parts.is_empty() {
        NO_PREFERENCES_SUMMARY.to_string()
    } else {
        format!("{}{}", SUMMARY_PREFIX, parts.join(" | "))
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
