// Route exports
pub mod chat;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use crate::models::ErrorResponse;

pub use chat::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_payload_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/api/v1")
                .configure(chat::configure),
        );
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl error::ResponseError for ErrorResponse {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Malformed or mistyped JSON bodies become a 400 with a JSON body
fn json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ErrorResponse {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ChatService, ExecutorError, QueryExecution, QueryExecutor, SessionStore};
    use crate::models::PreferenceProfile;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EmptyExecutor;

    #[async_trait]
    impl QueryExecutor for EmptyExecutor {
        async fn execute(&self, _: &str, _: &PreferenceProfile) -> Result<QueryExecution, ExecutorError> {
            Ok(QueryExecution { sql: String::new(), listings: vec![] })
        }
    }

    #[actix_web::test]
    async fn test_malformed_json_gets_json_error() {
        let state = AppState {
            chat: Arc::new(ChatService::new(Arc::new(SessionStore::in_memory(10, 60)), Arc::new(EmptyExecutor))),
            listings: None,
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/chat")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"query\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_json");
        assert_eq!(body["status_code"], 400);
    }
}
