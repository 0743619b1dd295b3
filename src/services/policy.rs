use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when asking the policy service
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

/// Answers questions about accommodation rules and policies
#[async_trait]
pub trait PolicyAnswerer: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String, PolicyError>;
}

#[derive(Debug, Serialize)]
struct PolicyQuestion<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct PolicyAnswer {
    answer: String,
}

/// HTTP client for an external policy-answering service
///
/// `POST {endpoint}` with `{"question": ...}`, expects `{"answer": ...}`.
pub struct HttpPolicyClient {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpPolicyClient {
    pub fn new(endpoint: String, api_key: Option<String>, timeout_secs: u64) -> Result<Self, PolicyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl PolicyAnswerer for HttpPolicyClient {
    async fn answer(&self, question: &str) -> Result<String, PolicyError> {
        let mut request = self.client.post(&self.endpoint).json(&PolicyQuestion { question });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(PolicyError::ApiError(format!(
                "Failed to answer policy question: {}",
                response.status()
            )));
        }

        let body: PolicyAnswer = response.json().await?;
        tracing::debug!("Policy answer received ({} chars)", body.answer.len());

        Ok(body.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answer_parses_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/answer")
            .match_body(mockito::Matcher::Json(serde_json::json!({"question": "are guests allowed?"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer": "Guests are allowed until 9pm."}"#)
            .create_async()
            .await;

        let client = HttpPolicyClient::new(format!("{}/answer", server.url()), None, 5).unwrap();
        let answer = client.answer("are guests allowed?").await.unwrap();

        assert_eq!(answer, "Guests are allowed until 9pm.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_answer_error_status() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", "/answer").with_status(503).create_async().await;

        let client = HttpPolicyClient::new(format!("{}/answer", server.url()), None, 5).unwrap();
        assert!(matches!(client.answer("rules?").await, Err(PolicyError::ApiError(_))));
    }
}
