use serde::{Deserialize, Serialize};
use validator::Validate;

/// Chat turn sent by the client
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 1000))]
    pub query: String,
    #[validate(length(min = 1, max = 128))]
    #[serde(default, alias = "session_id", rename = "sessionId")]
    pub session_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_both_session_id_spellings() {
        let camel: ChatRequest =
            serde_json::from_str(r#"{"query": "pg in powai", "sessionId": "abc"}"#).unwrap();
        let snake: ChatRequest =
            serde_json::from_str(r#"{"query": "pg in powai", "session_id": "abc"}"#).unwrap();

        assert_eq!(camel.session_id.as_deref(), Some("abc"));
        assert_eq!(snake.session_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_empty_query_rejected() {
        let req = ChatRequest { query: String::new(), session_id: None };
        assert!(req.validate().is_err());
    }
}
