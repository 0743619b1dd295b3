use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use crate::models::PreferenceProfile;

const SQL_PROMPT: &str = r#"You are an expert PostgreSQL assistant for student accommodation search.

Database schema:
Table: accommodations
- id: integer
- type: pg | 1rk | 1bhk | 3bhk
- rent: monthly rent in INR
- location: area name (like "Andheri", "Viman Nagar", "Koregaon Park", etc.)
- distance_from_college_km: float
- furnished: boolean
- non_alcoholic: boolean (true = no alcohol allowed, false = alcohol allowed)
- smoking_allowed: boolean
- safety_rating: integer (1 to 5)
- roommates_allowed: boolean
- available: boolean

Location matching rules:
- Use ILIKE for case-insensitive matching
- For city queries like "Pune", use: location ILIKE '%pune%'
- For specific areas use: location ILIKE '%area_name%'

Lifestyle preference mapping rules:
- "alcohol-free" or "non-alcoholic" -> non_alcoholic = true
- "alcohol allowed" -> non_alcoholic = false
- "smoking friendly" or "smoking allowed" -> smoking_allowed = true
- "smoke-free" or "no smoking" -> smoking_allowed = false
- "furnished accommodation" -> furnished = true
- "unfurnished accommodation" -> furnished = false

Query rules:
- Generate ONLY a SELECT query returning every column (SELECT *)
- Do NOT use markdown
- Always include WHERE available = true
- Order by rent ASC
- Limit results to max 10 rows"#;

/// Errors that can occur when generating SQL
#[derive(Debug, Error)]
pub enum QueryGeneratorError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Natural-language to SQL client
///
/// Talks to any OpenAI-compatible `/chat/completions` endpoint.
pub struct QueryGenerator {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl QueryGenerator {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self, QueryGeneratorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            client,
        })
    }

    /// Generate a SELECT for `query`, with the stored preferences as context
    pub async fn generate_sql(
        &self,
        query: &str,
        preferences: &PreferenceProfile,
    ) -> Result<String, QueryGeneratorError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let preferences_json = serde_json::to_string_pretty(preferences)
            .map_err(|e| QueryGeneratorError::InvalidResponse(e.to_string()))?;

        let request = CompletionRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage { role: "system", content: SQL_PROMPT.to_string() },
                ChatMessage {
                    role: "user",
                    content: format!(
                        "User question: {}\nUser preferences: {}\n\nGenerate the SQL query:",
                        query, preferences_json
                    ),
                },
            ],
        };

        tracing::debug!("Requesting SQL from {} ({})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);
            tracing::error!("SQL generation failed: {} - {}", status, body);
            return Err(QueryGeneratorError::ApiError(format!(
                "Failed to generate SQL: {}",
                status
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| QueryGeneratorError::InvalidResponse(format!("Failed to parse completion: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| QueryGeneratorError::InvalidResponse("Missing completion content".into()))?;

        let sql = clean_sql(&content);
        tracing::debug!("Generated SQL: {}", sql);

        Ok(sql)
    }
}

/// Strip markdown code fences around generated SQL
pub fn clean_sql(raw: &str) -> String {
    let sql = if let Some((_, rest)) = raw.split_once("```sql") {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some((_, rest)) = raw.split_once("```") {
        rest.split("```").next().unwrap_or(rest)
    } else {
        raw
    };

    sql.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_sql() {
        assert_eq!(clean_sql("```sql\nSELECT 1;\n```"), "SELECT 1;");
        assert_eq!(clean_sql("Here:\n```\nSELECT 2\n```\nthanks"), "SELECT 2");
        assert_eq!(clean_sql("  SELECT 3  "), "SELECT 3");
    }

    #[tokio::test]
    async fn test_generate_sql_reads_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"```sql\nSELECT * FROM accommodations WHERE available = true\n```"}}]}"#,
            )
            .create_async()
            .await;

        let generator = QueryGenerator::new(server.url(), "test_key".to_string(), "gpt-4o-mini".to_string(), 5)
            .unwrap();
        let sql = generator
            .generate_sql("pg in powai", &PreferenceProfile::new())
            .await
            .unwrap();

        assert_eq!(sql, "SELECT * FROM accommodations WHERE available = true");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_sql_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .create_async()
            .await;

        let generator = QueryGenerator::new(server.url(), "k".to_string(), "m".to_string(), 5).unwrap();
        let result = generator.generate_sql("pg", &PreferenceProfile::new()).await;

        assert!(matches!(result, Err(QueryGeneratorError::ApiError(_))));
    }
}
