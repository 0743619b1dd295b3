use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use nest_algo::config::Settings;
use nest_algo::core::{KeywordExtractor, PolicyClassifier};
use nest_algo::routes::{self, AppState};
use nest_algo::services::{
    ChatService, HttpPolicyClient, ListingStore, QueryGenerator, SessionStore, SqlQueryExecutor,
};
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        io_error(format!("Configuration error: {}", e))
    })?;

    // Initialize logging (RUST_LOG > LOG_LEVEL > [logging] section)
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Nest Algo chat service...");
    info!("Configuration loaded successfully");

    // Session store (Redis snapshots are optional)
    let sessions = match &settings.sessions.redis_url {
        Some(url) => match SessionStore::with_redis(url, settings.sessions.max_sessions, settings.sessions.ttl_secs).await {
            Ok(store) => {
                info!("Session store initialized with Redis snapshots (TTL: {}s)", settings.sessions.ttl_secs);
                store
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), keeping sessions in-process only", e);
                SessionStore::in_memory(settings.sessions.max_sessions, settings.sessions.ttl_secs)
            }
        },
        None => {
            info!("Session store initialized in-process (TTL: {}s)", settings.sessions.ttl_secs);
            SessionStore::in_memory(settings.sessions.max_sessions, settings.sessions.ttl_secs)
        }
    };

    // Listing store
    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let listings = Arc::new(
        ListingStore::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            io_error(format!("PostgreSQL connection error: {}", e))
        })?,
    );

    info!("PostgreSQL listing store initialized (max: {} connections)", db_max_conn);

    // Query generation + execution
    let generator = QueryGenerator::new(
        settings.query_generator.base_url.clone(),
        settings.query_generator.api_key.clone(),
        settings.query_generator.model.clone(),
        settings.query_generator.timeout_secs,
    )
    .map_err(|e| io_error(format!("Query generator error: {}", e)))?;

    if settings.query_generator.api_key.is_empty() {
        warn!("No query generator API key configured; searches will fail");
    }

    let executor = Arc::new(SqlQueryExecutor::new(generator, listings.clone()));

    let mut chat = ChatService::new(Arc::new(sessions), executor)
        .with_keyword_extractor(KeywordExtractor::new(settings.keywords.clone()));

    if let Some(keywords) = settings.classifier.policy_keywords.clone() {
        chat = chat.with_classifier(PolicyClassifier::new(keywords));
    }

    match &settings.policy.endpoint {
        Some(endpoint) => {
            let policy = HttpPolicyClient::new(
                endpoint.clone(),
                settings.policy.api_key.clone(),
                settings.policy.timeout_secs.unwrap_or(30),
            )
            .map_err(|e| io_error(format!("Policy client error: {}", e)))?;
            chat = chat.with_policy(Arc::new(policy));
            info!("Policy service configured at {}", endpoint);
        }
        None => warn!("No policy service configured; policy questions will get a fallback answer"),
    }

    let app_state = AppState {
        chat: Arc::new(chat),
        listings: Some(listings),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
