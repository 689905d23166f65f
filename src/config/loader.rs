//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::{AuthType, Config};

pub const CONFIG_FILENAME: &str = "gatehouse.toml";

/// Load configuration from gatehouse.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Load from `path` when given, otherwise search for gatehouse.toml,
/// falling back to defaults when none exists. Environment overrides are
/// applied last.
pub fn resolve_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => load_config_from_path(path)?,
        None => match load_config() {
            Ok(config) => config,
            Err(Error::ConfigNotFound) => {
                tracing::warn!("No {} found, using defaults", CONFIG_FILENAME);
                Config::default()
            }
            Err(e) => return Err(e),
        },
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Write the configuration as TOML
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, content)?;
    Ok(())
}

/// Apply `AUTH_TYPE`, `SESSION_NAME` and `SESSION_DURATION` from the environment
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(value) = env::var("AUTH_TYPE") {
        config.auth.auth_type = AuthType::parse(&value)
            .ok_or_else(|| Error::Config(format!("Unknown AUTH_TYPE: {}", value)))?;
    }
    if let Ok(value) = env::var("SESSION_NAME") {
        if !value.is_empty() {
            config.auth.session_name = value;
        }
    }
    if let Ok(value) = env::var("SESSION_DURATION") {
        config.auth.session_duration = parse_duration(&value);
    }
    Ok(())
}

/// Session duration from text; anything that is not an integer means `0`
pub fn parse_duration(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Gatehouse Configuration

[server]
host = "0.0.0.0"
port = 5000

[auth]
# none | basic_auth | session_auth | session_exp_auth | session_db_auth
auth_type = "${AUTH_TYPE:-session_exp_auth}"
session_name = "session_id"
# Seconds; 0 keeps sessions until logout
session_duration = 3600
excluded_paths = [
    "/api/v1/status/",
    "/api/v1/unauthorized/",
    "/api/v1/forbidden/",
    "/api/v1/auth_session/login/",
]

[storage]
users_file = "./data/users.json"
# memory | file | postgres (used by session_db_auth)
sessions = "file"
sessions_file = "./data/sessions.json"
# database_url = "host=localhost user=postgres password=${POSTGRES_PASSWORD:-postgres} dbname=gatehouse"

[hashing]
cost = 12

[logging]
filter = "gatehouse=info,tower_http=info"
redact_pii = true
pii_fields = ["name", "email", "phone", "ssn", "password"]
"#
}
