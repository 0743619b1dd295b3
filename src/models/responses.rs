use serde::{Deserialize, Serialize};
use crate::models::domain::{PreferenceProfile, ScoredListing};

/// Response for the chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(flatten)]
    pub reply: ChatReply,
}

/// Outcome of one chat turn, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatReply {
    PolicyAnswer {
        question: String,
        answer: String,
        source: String,
    },
    AccommodationSearch {
        query: String,
        enhanced_query: String,
        sql_generated: String,
        results_count: usize,
        accommodations: Vec<ScoredListing>,
        response: String,
        memory: PreferenceProfile,
        memory_summary: String,
    },
    NoResults {
        query: String,
        enhanced_query: String,
        sql_generated: String,
        response: String,
        memory: PreferenceProfile,
        memory_summary: String,
    },
    Error {
        question: String,
        answer: String,
    },
}

/// Stored preferences for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub memory: PreferenceProfile,
    pub memory_summary: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub active_sessions: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_is_tagged_by_type() {
        let response = ChatResponse {
            session_id: "s1".to_string(),
            reply: ChatReply::PolicyAnswer {
                question: "is alcohol allowed?".to_string(),
                answer: "No.".to_string(),
                source: "accommodation_policies".to_string(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "policy_answer");
        assert_eq!(json["sessionId"], "s1");
        assert_eq!(json["answer"], "No.");
    }
}
