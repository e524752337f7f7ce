//! Command line for replaying vault scenarios.

use std::path::{Path, PathBuf};

use alloy::primitives::utils::format_ether;
use clap::{ArgAction, Parser, Subcommand};
use eyre::Result;
use log::{info, warn};

use icicle::config::Config;
use icicle::scenario::{Deployment, Scenario};
use icicle::utils::logger::{setup_logger, verbosity};

/// Icicle vault simulator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// What to do
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands
#[derive(Subcommand)]
enum Commands {
    /// Deploy a scenario and execute its orders
    Simulate {
        /// Scenario JSON file
        scenario: PathBuf,
    },
    /// Deploy a scenario and quote its orders without executing them
    Quote {
        /// Scenario JSON file
        scenario: PathBuf,
    },
}

/// Runs every order of the scenario and reports each receipt or failure.
async fn simulate(config: &Config, path: &Path) -> Result<()> {
    let scenario = Scenario::load(path).await?;
    let Deployment { mut chain, vault } = scenario.deploy(config)?;
    let start = vault.balance(&chain);

    for (index, entry) in scenario.orders.iter().enumerate() {
        match entry.quote(&chain) {
            Ok(quote) => info!(
                "simulate: order {index} quoted {} -> {} ({} bps)",
                format_ether(quote.amount_in()),
                format_ether(quote.amount_out()),
                quote.profit_margin()
            ),
            Err(e) => warn!("simulate: order {index} has no quote: {e}"),
        }

        let order = match entry.to_order(&chain, config.slippage_bps) {
            Ok(order) => order,
            Err(e) => {
                warn!("simulate: order {index} skipped: {e}");
                continue;
            }
        };

        match vault.arb(&mut chain, entry.caller, &order) {
            Ok(receipt) => info!(
                "simulate: order {index} executed, {} -> {}",
                format_ether(receipt.amount_in),
                format_ether(receipt.amount_out)
            ),
            Err(e) => warn!("simulate: order {index} reverted: {e}"),
        }
    }

    let end = vault.balance(&chain);
    info!(
        "simulate: vault balance {} -> {}",
        format_ether(start),
        format_ether(end)
    );
    Ok(())
}

/// Prints a quote for every order of the scenario.
async fn quote(config: &Config, path: &Path) -> Result<()> {
    let scenario = Scenario::load(path).await?;
    let Deployment { chain, .. } = scenario.deploy(config)?;

    for (index, entry) in scenario.orders.iter().enumerate() {
        match entry.quote(&chain) {
            Ok(quote) => println!(
                "order {index}: in {} out {} margin {} bps profitable {} min_out {}",
                format_ether(quote.amount_in()),
                format_ether(quote.amount_out()),
                quote.profit_margin(),
                quote.is_profitable(),
                format_ether(quote.min_amount_out(config.slippage_bps))
            ),
            Err(e) => println!("order {index}: {e}"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logger(verbosity(cli.verbose))?;

    let config = Config::from_env()?;
    info!(
        "icicle: {} settling in {}",
        config.network, config.settlement_asset
    );

    match cli.command {
        Commands::Simulate { scenario } => simulate(&config, &scenario).await?,
        Commands::Quote { scenario } => quote(&config, &scenario).await?,
    }

    Ok(())
}
