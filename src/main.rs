use anyhow::Result;
use boi_rates::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display current exchange rates against the shekel
    Rates {
        /// Currency codes to fetch, defaults to the configured currencies
        codes: Vec<String>,
    },
    /// List all currencies published by the Bank of Israel
    Currencies,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => boi_rates::cli::setup::setup(),
        Some(Commands::Rates { codes }) => {
            boi_rates::run_command(boi_rates::AppCommand::Rates(codes), cli.config_path.as_deref())
                .await
        }
        Some(Commands::Currencies) => {
            boi_rates::run_command(boi_rates::AppCommand::Currencies, cli.config_path.as_deref())
                .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
