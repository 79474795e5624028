use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use rust_decimal::Decimal;
use tradedesk::cli::save::TradeInput;
use tradedesk::core::config::PAGE_SIZES;
use tradedesk::core::log::init_logging;
use tradedesk::core::trade::TradeStatus;

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

/// Trade fields. On update, omitted fields keep their stored values.
#[derive(Args)]
struct TradeArgs {
    /// Product name, e.g. "Steam US"
    #[arg(long)]
    product: Option<String>,
    /// Source currency code, e.g. USD
    #[arg(long)]
    currency: Option<String>,
    /// Amount in the source currency
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<String>,
    /// Source currency to CNY exchange rate
    #[arg(long, allow_hyphen_values = true)]
    rate: Option<String>,
    /// Total in CNY; derived from amount × rate when omitted
    #[arg(long, allow_hyphen_values = true)]
    total: Option<String>,
    /// completed or processing [default on create: completed]
    #[arg(long)]
    status: Option<TradeStatus>,
}

impl From<TradeArgs> for TradeInput {
    fn from(args: TradeArgs) -> TradeInput {
        TradeInput {
            product_name: args.product,
            currency: args.currency,
            amount: args.amount,
            exchange_rate: args.rate,
            total_amount: args.total,
            status: args.status,
        }
    }
}

fn parse_page_size(value: &str) -> Result<u32, String> {
    let size: u32 = value.parse().map_err(|e| format!("{e}"))?;
    if PAGE_SIZES.contains(&size) {
        Ok(size)
    } else {
        Err(format!("expected one of {PAGE_SIZES:?}"))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List trades with converted totals
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Trades per page (10, 20, 50 or 100)
        #[arg(short, long, value_parser = parse_page_size)]
        limit: Option<u32>,
    },
    /// Create a trade
    Create(TradeArgs),
    /// Edit an existing trade
    Update {
        id: u64,
        #[command(flatten)]
        trade: TradeArgs,
    },
    /// Delete a trade permanently
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show display currency rates
    Rates,
    /// Convert a CNY total into the display currencies
    Convert {
        total: Decimal,
        /// Use configured fallback rates without contacting the backend
        #[arg(long)]
        offline: bool,
    },
    /// Derive the CNY total for amount × rate and convert it
    Quote {
        amount: Decimal,
        rate: Decimal,
        /// Use configured fallback rates without contacting the backend
        #[arg(long)]
        offline: bool,
    },
    /// Show the referral WhatsApp link
    Referral,
}

impl From<Commands> for tradedesk::AppCommand {
    fn from(cmd: Commands) -> tradedesk::AppCommand {
        match cmd {
            Commands::List { page, limit } => tradedesk::AppCommand::List { page, limit },
            Commands::Create(trade) => tradedesk::AppCommand::Create(trade.into()),
            Commands::Update { id, trade } => tradedesk::AppCommand::Update {
                id,
                input: trade.into(),
            },
            Commands::Delete { id, yes } => tradedesk::AppCommand::Delete { id, yes },
            Commands::Rates => tradedesk::AppCommand::Rates,
            Commands::Convert { total, offline } => {
                tradedesk::AppCommand::Convert { total, offline }
            }
            Commands::Quote {
                amount,
                rate,
                offline,
            } => tradedesk::AppCommand::Quote {
                amount,
                rate,
                offline,
            },
            Commands::Referral => tradedesk::AppCommand::Referral,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => tradedesk::cli::setup::setup(),
        Some(cmd) => tradedesk::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
