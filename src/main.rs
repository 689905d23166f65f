use anyhow::Result;
use clap::Parser;

use gatehouse::cli::{self, Cli, Commands};
use gatehouse::{config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::resolve_config(cli.config.as_deref())?;

    // Initialize tracing
    logging::init_tracing(&config.logging);

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Serve { host, port } => cli::commands::serve(config, host, port).await,
        Commands::HashPassword { password, cost } => {
            cli::commands::hash_password(&config, &password, cost)
        }
        Commands::Redact { fields, separator } => {
            cli::commands::redact(&config, fields, &separator)
        }
        Commands::Users { action } => cli::commands::users(&config, action).await,
    }
}
