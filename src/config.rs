use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use crate::core::KeywordTables;

/// Service configuration, see `config/default.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub sessions: SessionSettings,
    pub query_generator: QueryGeneratorSettings,
    #[serde(default)]
    pub policy: PolicySettings,
    #[serde(default)]
    pub classifier: ClassifierSettings,
    #[serde(default)]
    pub keywords: KeywordTables,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// Snapshot backend; sessions stay in-process only when unset
    pub redis_url: Option<String>,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            redis_url: None,
            max_sessions: default_max_sessions(),
            ttl_secs: default_session_ttl(),
        }
    }
}

fn default_max_sessions() -> u64 { 10_000 }
fn default_session_ttl() -> u64 { 3600 }

#[derive(Debug, Clone, Deserialize)]
pub struct QueryGeneratorSettings {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_llm_model() -> String { "gpt-4o-mini".to_string() }
fn default_http_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicySettings {
    /// Policy answering endpoint; policy questions degrade gracefully when unset
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifierSettings {
    /// Replaces the built-in policy keywords when set
    pub policy_keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load `config/default`, then `config/local`, then `NEST__*` variables
    /// (e.g. `NEST__SERVER__PORT` -> `server.port`), then the unprefixed
    /// `DATABASE_URL`, `OPENAI_API_KEY` and `REDIS_URL`.
    pub fn load() -> Result<Self, ConfigError> {
        let layered = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(nest_env())
            .build()?;

        substitute_env_vars(layered)?.try_deserialize()
    }

    /// A single config file plus `NEST__*` variables
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(nest_env())
            .build()?
            .try_deserialize()
    }

    /// Parse configuration from a TOML string (no environment layering)
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

fn nest_env() -> Environment {
    Environment::with_prefix("NEST")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the conventional unprefixed variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }

    if let Ok(api_key) = env::var("OPENAI_API_KEY") {
        builder = builder.set_override("query_generator.api_key", api_key)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("sessions.redis_url", redis_url)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [database]
        url = "postgres://localhost/accommodation"

        [query_generator]
        api_key = "sk-test"
    "#;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let settings = Settings::from_toml_str(MINIMAL).unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.query_generator.model, "gpt-4o-mini");
        assert_eq!(settings.sessions.ttl_secs, 3600);
        assert!(settings.sessions.redis_url.is_none());
        assert!(settings.policy.endpoint.is_none());
        assert_eq!(settings.keywords, KeywordTables::default());
    }

    #[test]
    fn test_keyword_override() {
        let toml = format!("{}\n[keywords]\nlocations = [\"goa\"]\n", MINIMAL);
        let settings = Settings::from_toml_str(&toml).unwrap();

        assert_eq!(settings.keywords.locations, vec!["goa"]);
        assert_eq!(settings.keywords.alcohol, KeywordTables::default().alcohol);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
