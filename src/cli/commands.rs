//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::io::{self, BufRead, Write};

use crate::auth::{PasswordHasher, UserInfo};
use crate::cli::{info, print_user_table, success, warn, OutputFormat, UsersAction};
use crate::config::{self, Config};
use crate::logging;
use crate::store::UserStore;

/// Initialize a new gatehouse.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new(config::loader::CONFIG_FILENAME);

    if config_path.exists() {
        warn("gatehouse.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created gatehouse.toml");
    info("Edit the configuration file and run 'gatehouse serve' to start the API");

    Ok(())
}

/// Start the API server
pub async fn serve(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    crate::api::run_server(config, &host, port).await?;
    Ok(())
}

/// Print a bcrypt hash of `password`
pub fn hash_password(config: &Config, password: &str, cost: Option<u32>) -> Result<()> {
    let hasher = PasswordHasher::new(cost.unwrap_or(config.hashing.cost));
    println!("{}", hasher.hash(password)?);
    Ok(())
}

/// Copy stdin to stdout with PII fields redacted
pub fn redact(config: &Config, fields: Vec<String>, separator: &str) -> Result<()> {
    let fields = if fields.is_empty() {
        config.logging.pii_fields.clone()
    } else {
        fields
    };
    let redactor = logging::Redactor::new(fields.as_slice(), logging::REDACTION, separator)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        writeln!(stdout, "{}", redactor.redact(&line?))?;
    }
    Ok(())
}

/// User inspection commands
pub async fn users(config: &Config, action: UsersAction) -> Result<()> {
    let Some(path) = &config.storage.users_file else {
        warn("storage.users_file is not set; users only live inside a running server");
        return Ok(());
    };
    let store = UserStore::open(path).await?;
    let users = store.find_all(&[]).await?;

    match action {
        UsersAction::List { format } => match format {
            OutputFormat::Table => print_user_table(&users),
            OutputFormat::Json => {
                let infos: Vec<UserInfo> = users.into_iter().map(UserInfo::from).collect();
                println!("{}", serde_json::to_string_pretty(&infos)?);
            }
        },
        UsersAction::Log => {
            for user in &users {
                let created_at = user.created_at.to_rfc3339();
                let line = logging::record_line(&[
                    ("id", user.id.as_str()),
                    ("email", user.email.as_str()),
                    ("hashed_password", user.hashed_password.as_str()),
                    ("session_id", user.session_id.as_deref().unwrap_or("")),
                    ("reset_token", user.reset_token.as_deref().unwrap_or("")),
                    ("created_at", created_at.as_str()),
                ]);
                tracing::info!("{}", line);
            }
            info(&format!("Logged {} users", users.len()));
        }
    }

    Ok(())
}
