//! Wallet Sentry - multi-chain address analyzer CLI
//!
//! Usage:
//!   wallet_sentry <ADDRESS> [--chain <CHAIN>] [--summary]
//!
//! Environment:
//!   ETHERSCAN_API_KEY, INFURA_API_KEY, BSCSCAN_API_KEY, WORLDSCAN_API_KEY,
//!   HELIUS_API_KEY, SOLANA_RPC_URL - optional upstream credentials
//!   RUST_LOG - Log level (default: info)

use clap::Parser;
use eyre::Result;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wallet_sentry::{AddressAnalyzer, ChainKind, SentryConfig};

#[derive(Parser, Debug)]
#[command(name = "wallet_sentry", version, about = "Analyze a public blockchain address")]
struct Cli {
    /// Address to analyze
    address: String,

    /// Chain override (ethereum, worldcoin, solana, bitcoin, bnb, okx)
    #[arg(short, long)]
    chain: Option<ChainKind>,

    /// Print a human readable summary instead of JSON
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pipeable JSON
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = SentryConfig::from_env();
    let analyzer = AddressAnalyzer::from_config(&config)?;

    let result = analyzer.analyze(&cli.address, cli.chain).await?;

    if cli.summary {
        println!("{}", result.summary());
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
