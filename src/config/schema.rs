//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which authenticator guards `/api/v1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// No authentication
    #[default]
    None,
    /// HTTP Basic against the user store
    BasicAuth,
    /// Session cookie, in-memory, no expiry
    SessionAuth,
    /// Session cookie, in-memory, expiring
    SessionExpAuth,
    /// Session cookie, durable store, expiring
    SessionDbAuth,
}

impl AuthType {
    /// Parse the names accepted by `AUTH_TYPE`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "none" => Some(AuthType::None),
            "basic_auth" => Some(AuthType::BasicAuth),
            "session_auth" => Some(AuthType::SessionAuth),
            "session_exp_auth" => Some(AuthType::SessionExpAuth),
            "session_db_auth" => Some(AuthType::SessionDbAuth),
            _ => None,
        }
    }

    pub fn uses_sessions(&self) -> bool {
        matches!(
            self,
            AuthType::SessionAuth | AuthType::SessionExpAuth | AuthType::SessionDbAuth
        )
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub auth_type: AuthType,

    /// Name of the session cookie
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Session lifetime in seconds; `0` or less never expires
    #[serde(default)]
    pub session_duration: i64,

    /// Paths under `/api/v1` that skip authentication; a trailing `*` matches a prefix
    #[serde(default = "default_excluded_paths")]
    pub excluded_paths: Vec<String>,
}

fn default_session_name() -> String {
    "session_id".to_string()
}

fn default_excluded_paths() -> Vec<String> {
    vec![
        "/api/v1/status/".to_string(),
        "/api/v1/unauthorized/".to_string(),
        "/api/v1/forbidden/".to_string(),
        "/api/v1/auth_session/login/".to_string(),
    ]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_type: AuthType::default(),
            session_name: default_session_name(),
            session_duration: 0,
            excluded_paths: default_excluded_paths(),
        }
    }
}

/// Where session records are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStorage {
    #[default]
    Memory,
    File,
    Postgres,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file mirroring the user table; in-memory only when unset
    #[serde(default)]
    pub users_file: Option<PathBuf>,

    /// Backend for durable sessions (`session_db_auth`)
    #[serde(default)]
    pub sessions: SessionStorage,

    #[serde(default = "default_sessions_file")]
    pub sessions_file: PathBuf,

    /// e.g. `host=localhost user=postgres password=postgres dbname=gatehouse`
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_sessions_file() -> PathBuf {
    PathBuf::from("./data/sessions.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            users_file: None,
            sessions: SessionStorage::default(),
            sessions_file: default_sessions_file(),
            database_url: None,
        }
    }
}

/// Password hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashingConfig {
    /// bcrypt cost factor
    #[serde(default = "default_cost")]
    pub cost: u32,
}

fn default_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            cost: default_cost(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Scrub PII fields from every log line
    #[serde(default = "default_redact_pii")]
    pub redact_pii: bool,

    #[serde(default = "default_pii_fields")]
    pub pii_fields: Vec<String>,
}

fn default_filter() -> String {
    "gatehouse=info,tower_http=info".to_string()
}

fn default_redact_pii() -> bool {
    true
}

fn default_pii_fields() -> Vec<String> {
    crate::logging::PII_FIELDS
        .iter()
        .map(|f| f.to_string())
        .collect()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            redact_pii: default_redact_pii(),
            pii_fields: default_pii_fields(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.auth_type, AuthType::None);
        assert_eq!(config.auth.session_name, "session_id");
        assert_eq!(config.auth.session_duration, 0);
        assert_eq!(config.storage.sessions, SessionStorage::Memory);
        assert!(config.logging.redact_pii);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str(
            r#"
            [auth]
            auth_type = "session_db_auth"
            session_duration = 60

            [storage]
            sessions = "file"
            "#,
        )
        .unwrap();

        assert_eq!(config.auth.auth_type, AuthType::SessionDbAuth);
        assert_eq!(config.auth.session_duration, 60);
        assert_eq!(config.auth.excluded_paths.len(), 4);
        assert_eq!(config.storage.sessions, SessionStorage::File);
        assert_eq!(config.hashing.cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_auth_type_parse() {
        assert_eq!(AuthType::parse("basic_auth"), Some(AuthType::BasicAuth));
        assert_eq!(AuthType::parse("session_exp_auth"), Some(AuthType::SessionExpAuth));
        assert_eq!(AuthType::parse(""), Some(AuthType::None));
        assert_eq!(AuthType::parse("jwt"), None);
        assert!(AuthType::SessionDbAuth.uses_sessions());
        assert!(!AuthType::BasicAuth.uses_sessions());
    }
}
