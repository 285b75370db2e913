//! # bx-runner
//!
//! Command-line front end for the BingX REST client.
//!
//! Loads an optional JSON config file, applies environment overrides, runs
//! one command, and prints the response payload as pretty JSON on stdout.
//! Logs go to stderr (and to `--log-file` when given).
//!
//! # Usage
//!
//! ```bash
//! bx-runner --demo balance
//! bx-runner --config bingx.json klines --symbol BTCUSDT --interval 15m --limit 50
//! BINGX_API_KEY=... BINGX_SECRET_KEY=... bx-runner positions --symbol ETH-USDT
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use bx_core::config::{ClientConfig, load_config};
use bx_core::enums::ClientMode;
use bx_core::error::BxError;
use bx_core::trading::IncomeQuery;
use bx_rest::{ApiResponse, SignedApiClient};
use clap::{Parser, Subcommand};
use tracing::{error, info};

/// BingX perpetual-swap REST client.
#[derive(Parser)]
#[command(name = "bx-runner", about = "BingX perpetual-swap REST client")]
struct Cli {
    /// Configuration file path (JSON). Defaults plus environment when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve built-in fixtures instead of calling the exchange.
    #[arg(long)]
    demo: bool,

    /// Log level (trace, debug, info, warn, error). Overrides the config.
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log file path. Overrides the config.
    #[arg(long)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check connectivity, server time, and credentials.
    Status,
    /// Account balance.
    Balance,
    /// Open positions.
    Positions {
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Latest price.
    Ticker {
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Candles.
    Klines {
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "1h")]
        interval: String,
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    /// Order book snapshot.
    Depth {
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Mark price and funding rate.
    Funding {
        #[arg(long)]
        symbol: String,
    },
    /// Open interest.
    OpenInterest {
        #[arg(long)]
        symbol: String,
    },
    /// One-way or hedge position mode.
    PositionMode,
    /// Open orders.
    OpenOrders {
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Income history (PnL, funding, fees).
    Income {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // 1. Initialize logging
    bx_core::logging::init_logging(&config.log_level, config.log_file.as_deref(), "bx-runner");
    info!("bx-runner starting: mode={}, base_url={}", config.mode, config.base_url);

    // 2. Build the client and run the command
    match run(config, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("command failed: {e}");
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// File (or defaults), then environment, then command-line flags.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    config.apply_env(|name| std::env::var(name).ok())?;
    if cli.demo {
        config.mode = ClientMode::Demo;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(file) = &cli.log_file {
        config.log_file = Some(file.clone());
    }
    Ok(config)
}

async fn run(config: ClientConfig, command: Command) -> Result<(), BxError> {
    let client = SignedApiClient::new(config)?;

    let resp = match command {
        Command::Status => return status(&client).await,
        Command::Balance => client.get_balance().await?,
        Command::Positions { symbol } => client.get_positions(symbol.as_deref()).await?,
        Command::Ticker { symbol } => client.get_ticker_price(symbol.as_deref()).await?,
        Command::Klines { symbol, interval, limit } => client.get_klines(&symbol, &interval, limit).await?,
        Command::Depth { symbol, limit } => client.get_depth(&symbol, limit).await?,
        Command::Funding { symbol } => client.get_funding_rate(&symbol).await?,
        Command::OpenInterest { symbol } => client.get_open_interest(&symbol).await?,
        Command::PositionMode => client.get_position_mode().await?,
        Command::OpenOrders { symbol } => client.get_open_orders(symbol.as_deref()).await?,
        Command::Income { symbol, limit } => {
            let query = IncomeQuery { symbol, limit, ..IncomeQuery::default() };
            client.get_income_history(&query).await?
        }
    };
    print_data(&resp);
    Ok(())
}

async fn status(client: &SignedApiClient) -> Result<(), BxError> {
    let time = client.get_server_time().await?;
    let credentials_ok = client.validate_credentials().await?;
    let report = serde_json::json!({
        "mode": client.mode().to_string(),
        "base_url": client.base_url(),
        "server_time": time.data.get("serverTime").cloned().unwrap_or_default(),
        "credentials_valid": credentials_ok,
    });
    println!("{}", pretty(&report));
    Ok(())
}

fn print_data(resp: &ApiResponse) {
    println!("{}", pretty(&resp.data));
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
