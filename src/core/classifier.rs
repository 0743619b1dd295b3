use serde::{Deserialize, Serialize};

const DEFAULT_POLICY_KEYWORDS: &[&str] = &[
    "rule", "policy", "allowed", "document", "verification",
    "alcohol", "smoking", "guest", "required", "permit",
    "regulation", "guideline", "procedure", "process",
    "what documents", "police verification", "is alcohol",
    "can i smoke", "are guests", "how to", "what is",
];

/// Routes a query to policy answering or accommodation search
///
/// Plain case-insensitive containment over a keyword list; any hit makes
/// the query a policy question.
///
/// The default list contains "alcohol", "smoking", "allowed" and "guest", so
/// with it every alcohol phrase, most smoking phrases and "paying guest" take
/// the policy path and never reach preference memory. Only "smoke-free" /
/// "smoke free" still set the smoking preference through chat. Deployments
/// that want lifestyle phrases remembered replace the list via
/// `[classifier] policy_keywords`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyClassifier {
    keywords: Vec<String>,
}

impl PolicyClassifier {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn is_policy_question(&self, query: &str) -> bool {
        let query_lower = query.to_lowercase();
        self.keywords.iter().any(|k| query_lower.contains(k.as_str()))
    }
}

impl Default for PolicyClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_POLICY_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_questions() {
        let classifier = PolicyClassifier::default();

        assert!(classifier.is_policy_question("What documents do I need?"));
        assert!(classifier.is_policy_question("Is police verification mandatory"));
        assert!(classifier.is_policy_question("Can I smoke in my room?"));
    }

    #[test]
    fn test_search_queries() {
        let classifier = PolicyClassifier::default();

        assert!(!classifier.is_policy_question("1bhk in powai under 15000"));
        assert!(!classifier.is_policy_question("furnished pg near college"));
    }

    #[test]
    fn test_default_list_claims_lifestyle_phrases() {
        let classifier = PolicyClassifier::default();

        for query in [
            "non-alcoholic pg in thane",
            "1rk with drinking allowed",
            "no smoking please",
            "paying guest in wakad",
        ] {
            assert!(classifier.is_policy_question(query), "{} should route to policy", query);
        }

        assert!(!classifier.is_policy_question("smoke-free 1bhk in baner"));
    }

    #[test]
    fn test_custom_keywords_are_lowercased() {
        let classifier = PolicyClassifier::new(vec!["Deposit".to_string()]);
        assert!(classifier.is_policy_question("how much DEPOSIT"));
        assert!(!classifier.is_policy_question("what is the rent"));
    }
}
