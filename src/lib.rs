pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::rates::normalize_codes;
use anyhow::{Context, Result};
use providers::BankOfIsraelProvider;
use tracing::{debug, info};

pub enum AppCommand {
    /// Fetch rates for the given codes, or the configured ones when empty.
    Rates(Vec<String>),
    Currencies,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load_or_default(),
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("boi-rates starting...");

    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    let boi = config.boi_provider();
    let provider = BankOfIsraelProvider::new(&boi.base_url, boi.timeout())
        .context("Failed to create Bank of Israel client")?;

    match command {
        AppCommand::Rates(codes) => {
            let codes = if codes.is_empty() {
                config.currency_set()
            } else {
                normalize_codes(&codes)
            };
            cli::rates::run(&provider, &codes).await
        }
        AppCommand::Currencies => cli::currencies::run(&provider, &config.currency_set()).await,
    }
}
