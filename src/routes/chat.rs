use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;
use crate::models::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, PreferencesResponse};
use crate::services::{ChatService, ListingStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub listings: Option<Arc<ListingStore>>,
}

/// Configure all chat-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/chat", web::post().to(chat))
        .route("/sessions/{session_id}/preferences", web::get().to(get_preferences));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = match &state.listings {
        Some(store) => store.health_check().await.unwrap_or(false),
        None => false,
    };

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        active_sessions: state.chat.sessions().active_sessions(),
    })
}

/// Chat endpoint
///
/// POST /api/v1/chat
///
/// Request body:
/// ```json
/// {
///   "query": "furnished pg in andheri under 9000",
///   "sessionId": "optional, issued on first turn"
/// }
/// ```
async fn chat(
    state: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for chat request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let session_id = req
        .session_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::info!("Chat turn for session {}", session_id);

    let reply = state.chat.handle(&session_id, &req.query).await;

    HttpResponse::Ok().json(ChatResponse { session_id, reply })
}

/// Stored preferences for a session
///
/// GET /api/v1/sessions/{sessionId}/preferences
async fn get_preferences(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let session_id = path.into_inner();

    match state.chat.preferences(&session_id).await {
        Some((memory, memory_summary)) => HttpResponse::Ok().json(PreferencesResponse {
            session_id,
            memory,
            memory_summary,
        }),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: "Session not found".to_string(),
            message: format!("No preferences stored for session {}", session_id),
            status_code: 404,
        }),
    }
}
