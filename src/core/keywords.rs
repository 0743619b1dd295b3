//! Keyword tables used by the preference extractor and query merger.
//!
//! Every table is plain data with built-in defaults, so deployments can
//! override them from configuration (`[keywords]`) and tests can build
//! their own.

use serde::{Deserialize, Serialize};
use crate::models::RoomType;

/// One branch of an ordered keyword chain
///
/// Chains are evaluated top to bottom and the first rule with any phrase
/// contained in the text wins; later rules are never consulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule<T> {
    pub value: T,
    pub phrases: Vec<String>,
}

impl<T: Copy> KeywordRule<T> {
    pub fn new(value: T, phrases: &[&str]) -> Self {
        Self {
            value,
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[inline]
    pub fn matches(&self, text: &str) -> bool {
        self.phrases.iter().any(|p| text.contains(p.as_str()))
    }
}

/// Return the value of the first matching rule in `chain`
pub fn first_match<T: Copy>(chain: &[KeywordRule<T>], text: &str) -> Option<T> {
    chain.iter().find(|rule| rule.matches(text)).map(|rule| rule.value)
}

/// Words whose presence in a query means the user already spoke to a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionKeywords {
    pub alcohol: String,
    pub smoking: String,
    pub furnished: String,
}

impl Default for MentionKeywords {
    fn default() -> Self {
        Self {
            alcohol: "alcohol".to_string(),
            smoking: "smoking".to_string(),
            furnished: "furnished".to_string(),
        }
    }
}

/// All keyword data the extractor and merger need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTables {
    /// Known place names, lowercase, in priority order
    pub locations: Vec<String>,
    pub room_types: Vec<KeywordRule<RoomType>>,
    pub alcohol: Vec<KeywordRule<bool>>,
    pub furnished: Vec<KeywordRule<bool>>,
    pub smoking: Vec<KeywordRule<bool>>,
    pub mentions: MentionKeywords,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            locations: [
                "andheri", "bandra", "powai", "malad", "borivali", "thane", "mumbai",
                "viman nagar", "hinjewadi", "koregaon park", "wakad", "baner", "pune",
                "koramangala", "indiranagar", "electronic city", "whitefield", "bangalore",
            ]
            .iter()
            .map(|l| l.to_string())
            .collect(),
            room_types: vec![
                KeywordRule::new(RoomType::Pg, &["pg", "paying guest"]),
                KeywordRule::new(RoomType::OneRk, &["1rk", "1 rk"]),
                KeywordRule::new(RoomType::OneBhk, &["1bhk", "1 bhk"]),
                KeywordRule::new(RoomType::ThreeBhk, &["3bhk", "3 bhk"]),
            ],
            // value = non_alcoholic
            alcohol: vec![
                KeywordRule::new(true, &["non-alcoholic", "no alcohol", "alcohol free"]),
                KeywordRule::new(false, &["alcohol allowed", "drinking allowed"]),
            ],
            furnished: vec![
                KeywordRule::new(false, &["unfurnished", "not furnished", "non-furnished"]),
                KeywordRule::new(true, &["furnished"]),
            ],
            // value = smoking_allowed
            smoking: vec![
                KeywordRule::new(
                    false,
                    &["no smoking", "smoking not allowed", "non-smoking", "smoke-free", "smoke free"],
                ),
                KeywordRule::new(
                    true,
                    &["smoking allowed", "smoking ok", "smoking is allowed", "smoking friendly"],
                ),
            ],
            mentions: MentionKeywords::default(),
        }
    }
}

/// Title-case each whitespace-separated word ("viman nagar" -> "Viman Nagar")
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_respects_chain_order() {
        let tables = KeywordTables::default();

        // "no smoking allowed" hits both sides; the negating rule comes first
        assert_eq!(first_match(&tables.smoking, "no smoking allowed here"), Some(false));
        assert_eq!(first_match(&tables.smoking, "smoking is allowed?"), Some(true));
        assert_eq!(first_match(&tables.smoking, "near the station"), None);
    }

    #[test]
    fn test_unfurnished_is_not_furnished() {
        let tables = KeywordTables::default();
        assert_eq!(first_match(&tables.furnished, "an unfurnished flat"), Some(false));
        assert_eq!(first_match(&tables.furnished, "fully furnished"), Some(true));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("viman nagar"), "Viman Nagar");
        assert_eq!(title_case("powai"), "Powai");
    }

    #[test]
    fn test_tables_deserialize_with_partial_override() {
        let tables: KeywordTables = toml::from_str(r#"locations = ["goa", "panaji"]"#).unwrap();
        assert_eq!(tables.locations, vec!["goa", "panaji"]);
        assert_eq!(tables.room_types.len(), 4);
    }
}
