pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::save::{SaveTarget, TradeInput};
use crate::core::config::AppConfig;
use crate::providers::BackendClient;
use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{debug, info};

pub enum AppCommand {
    List { page: u32, limit: Option<u32> },
    Create(TradeInput),
    Update { id: u64, input: TradeInput },
    Delete { id: u64, yes: bool },
    Rates,
    Convert { total: Decimal, offline: bool },
    Quote { amount: Decimal, rate: Decimal, offline: bool },
    Referral,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Trade desk starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let backend = BackendClient::new(&config.api)?;
    let fallback = config.fallback_conversion();
    let currencies = &config.display_currencies;

    match command {
        AppCommand::List { page, limit } => {
            let limit = limit.unwrap_or(config.page_size);
            cli::trades::run(&backend, page, limit, currencies, &fallback).await
        }
        AppCommand::Create(input) => cli::save::run(&backend, SaveTarget::Create, &input).await,
        AppCommand::Update { id, input } => {
            cli::save::run(&backend, SaveTarget::Update(id), &input).await
        }
        AppCommand::Delete { id, yes } => {
            cli::delete::run(&backend, id, |prompt| {
                if yes {
                    Ok(true)
                } else {
                    cli::delete::confirm_on_terminal(prompt)
                }
            })
            .await
        }
        AppCommand::Rates => cli::rates::run(&backend, currencies, &fallback).await,
        AppCommand::Convert { total, offline } => {
            cli::convert::run_convert(&backend, total, currencies, &fallback, offline).await
        }
        AppCommand::Quote {
            amount,
            rate,
            offline,
        } => {
            cli::convert::run_quote(&backend, amount, rate, currencies, &fallback, offline).await
        }
        AppCommand::Referral => cli::referral::run(&backend).await,
    }
}
