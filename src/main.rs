use clap::{Parser, Subcommand};
use eyre::Result;

use gyre::bot;
use gyre::config::Config;
use gyre::utils::logger::setup_logger;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single scan over the snapshot files
    Scan,
    /// Scan repeatedly until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logger()?;
    let config = Config::from_env()?;

    match Cli::parse().command {
        Some(Commands::Watch) => bot::start(config).await?,
        Some(Commands::Scan) | None => {
            let outcome = bot::scan(&config).await?;
            if outcome.plan.is_none() {
                log::info!("no profitable route in this snapshot");
            }
        }
    }

    Ok(())
}
