mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "careerlens-cli")]
#[command(about = "careerlens command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a LinkedIn profile and print its analysis report as JSON
    Analyze {
        /// Public profile URL
        url: String,
        /// Career objective tag (see `objectives`)
        #[arg(long)]
        objective: Option<String>,
    },
    /// List the known career objectives
    Objectives,
    /// List stored scraping credentials without revealing cookie values
    Credentials,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let level = std::env::var("CAREERLENS_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Analyze { url, objective }) => {
            let config = careerlens_core::load_app_config()?;
            commands::run_analyze(&config, &url, objective.as_deref()).await?;
        }
        Some(Commands::Objectives) => commands::run_objectives()?,
        Some(Commands::Credentials) => {
            let config = careerlens_core::load_app_config()?;
            commands::run_credentials(&config).await?;
        }
        None => println!("careerlens-cli ready; run with --help for commands"),
    }

    Ok(())
}
