//! CLI interface for Gatehouse

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gatehouse")]
#[command(version)]
#[command(about = "User authentication service", long_about = None)]
pub struct Cli {
    /// Path to gatehouse.toml (searched upward from the working directory by default)
    #[arg(short, long, global = true, env = "GATEHOUSE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new gatehouse.toml configuration file
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long, env = "API_HOST")]
        host: Option<String>,

        /// Port to listen on (defaults to server.port)
        #[arg(short, long, env = "API_PORT")]
        port: Option<u16>,
    },

    /// Print a salted bcrypt hash of a password
    HashPassword {
        password: String,

        /// bcrypt cost factor (defaults to hashing.cost)
        #[arg(long)]
        cost: Option<u32>,
    },

    /// Redact PII fields from `field=value;` lines read on stdin
    Redact {
        /// Fields to redact (defaults to logging.pii_fields)
        #[arg(short, long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Separator terminating each field
        #[arg(short, long, default_value = ";")]
        separator: String,
    },

    /// Inspect stored users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Write every user record to the log, PII redacted
    Log,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
