//! Aetherion wallet broker CLI.
//!
//! Drives the broker end to end from the command line:
//!
//! ```text
//! CLI command
//!     → config (TOML file or defaults)
//!     → environment (JSON-RPC bridge, or simulated with --simulated)
//!     → Broker (connect / switch / purchase / transfer / ico)
//!     → pretty JSON on stdout
//! ```
//!
//! With the default configuration and no bridge running, connect attempts
//! fall back to deterministic simulated identities, so every command works
//! out of the box.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aetherion_broker::config::schema::EnvironmentMode;
use aetherion_broker::config::{load_config, BrokerConfig};
use aetherion_broker::environment::{RpcEnvironment, SimulatedEnvironment, WalletEnvironment};
use aetherion_broker::observability::metrics;
use aetherion_broker::{Broker, WalletKind};

#[derive(Parser)]
#[command(name = "aetherion-broker")]
#[command(about = "Wallet connection and transaction broker for the Aetherion ecosystem", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force the deterministic simulated environment.
    #[arg(long)]
    simulated: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List wallet kinds available in this environment
    Wallets,
    /// Connect a wallet and print the session
    Connect {
        #[arg(short, long, default_value = "metamask")]
        wallet: String,
    },
    /// Connect, then switch the session to another chain
    Switch {
        #[arg(short, long, default_value = "metamask")]
        wallet: String,
        #[arg(long)]
        chain: u64,
    },
    /// Purchase sale tokens for a USD amount
    Purchase {
        #[arg(short, long, default_value = "metamask")]
        wallet: String,
        #[arg(long)]
        usd: String,
        /// Forward the purchased amount to this address afterwards
        #[arg(long)]
        forward_to: Option<String>,
    },
    /// Send a transfer intent to an Aetherion address
    Transfer {
        #[arg(short, long, default_value = "metamask")]
        wallet: String,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Print current sale progress
    Ico,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aetherion_broker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BrokerConfig::default(),
    };

    tracing::info!(
        bridge = %config.environment.bridge_url,
        demo_fallback = config.demo.fallback,
        sale = %config.sale.symbol,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    if cli.simulated || config.environment.mode == EnvironmentMode::Simulated {
        let env = SimulatedEnvironment::new(config.demo.seed);
        run(Broker::new(config, env), cli.command).await
    } else {
        let env = RpcEnvironment::new(&config.environment, &config.timeouts)?;
        run(Broker::new(config, env), cli.command).await
    }
}

async fn run<E: WalletEnvironment>(
    broker: Broker<E>,
    command: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Wallets => {
            print_json(&broker.available_wallets())?;
        }
        Commands::Connect { wallet } => {
            let session = broker.connect_wallet(parse_kind(&wallet)?).await;
            print_json(&session)?;
        }
        Commands::Switch { wallet, chain } => {
            let mut session = broker.connect_wallet(parse_kind(&wallet)?).await;
            let switched = broker.switch_network(&mut session, chain).await;
            print_json(&json!({ "switched": switched, "session": session }))?;
        }
        Commands::Purchase {
            wallet,
            usd,
            forward_to,
        } => {
            let session = broker.connect_wallet(parse_kind(&wallet)?).await;
            let forward = forward_to.map(|raw| raw.parse()).transpose()?;
            match broker.purchase_tokens(&session, &usd, None, forward).await {
                Ok(outcome) => print_json(&outcome)?,
                Err(e) => {
                    eprintln!("purchase failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Transfer {
            wallet,
            destination,
            amount,
            symbol,
        } => {
            let session = broker.connect_wallet(parse_kind(&wallet)?).await;
            let destination = destination.parse()?;
            match broker
                .transfer_to_aetherion(&session, destination, &amount, symbol.as_deref())
                .await
            {
                Ok(outcome) => print_json(&outcome)?,
                Err(e) => {
                    eprintln!("transfer failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Ico => {
            print_json(&broker.ico_details())?;
        }
    }

    Ok(())
}

fn parse_kind(raw: &str) -> Result<WalletKind, Box<dyn std::error::Error>> {
    raw.parse::<WalletKind>().map_err(Into::into)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
