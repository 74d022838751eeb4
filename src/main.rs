use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use eyre::Result;
use tokio::time::interval;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod display;
mod engine;
mod params;
mod quotes;
mod scanner;

use config::{EXCHANGES, MONITOR_INTERVAL_SECS, QUOTE_CACHE_TTL_SECS};
use display::{init_arb_log, print_breakdown, render_report};
use params::TradeParams;
use quotes::{cache::QuoteCache, QuoteClient};

#[derive(Parser)]
#[command(name = "dolar-arb")]
#[command(about = "Dolar oficial vs MEP vs crypto arbitrage dashboard", long_about = None)]
struct Cli {
    /// Volume to trade, in USD
    #[arg(long, global = true)]
    volume: Option<f64>,

    /// Exchange commission, in percent (0-100)
    #[arg(long, global = true)]
    fee_pct: Option<f64>,

    /// Fixed USDT transfer fee
    #[arg(long, global = true)]
    fixed_fee: Option<f64>,

    /// Comma-separated exchanges to scan (default: all known venues)
    #[arg(long, global = true, value_delimiter = ',')]
    exchanges: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the refreshing dashboard (default)
    Monitor,

    /// One refresh cycle, render, exit
    Scan,

    /// Offline break-even check for a given price pair
    Breakeven {
        /// Official dollar buy price (ARS per USD)
        #[arg(long)]
        buy: f64,

        /// USDT sell price (ARS per USDT)
        #[arg(long)]
        sell: f64,
    },
}

fn selected_exchanges(cli: &Cli) -> Vec<String> {
    if cli.exchanges.is_empty() {
        EXCHANGES.iter().map(|s| s.to_string()).collect()
    } else {
        cli.exchanges.iter().map(|s| s.trim().to_lowercase()).collect()
    }
}

fn build_client() -> Result<QuoteClient> {
    let cache = Arc::new(QuoteCache::new(Duration::from_secs(QUOTE_CACHE_TTL_SECS)));
    QuoteClient::new(cache)
}

async fn run_monitor(params: TradeParams, exchanges: Vec<String>) -> Result<()> {
    let client = build_client()?;
    info!("Monitoring {} exchanges", exchanges.len());

    let arb_log_path = init_arb_log();
    eprintln!(
        "\x1b[1;33mARB opportunities are logged to: {}\x1b[0m",
        arb_log_path.canonicalize().unwrap_or(arb_log_path).display()
    );

    let mut poll_interval = interval(Duration::from_secs(MONITOR_INTERVAL_SECS));

    loop {
        poll_interval.tick().await;

        let report = scanner::scan(&client, &params, &exchanges).await;
        if report.official.is_none() && report.mep.is_none() {
            error!("no dollar quotes available");
            display::clear_screen();
            println!("\x1b[1;31mCould not fetch any dollar quote.\x1b[0m");
            println!("\nRetrying in {} s...", MONITOR_INTERVAL_SECS);
            continue;
        }
        render_report(&report, &params);
    }
}

async fn run_scan(params: TradeParams, exchanges: Vec<String>) -> Result<()> {
    let client = build_client()?;
    let report = scanner::scan(&client, &params, &exchanges).await;

    if report.official.is_none() && report.mep.is_none() {
        return Err(eyre::eyre!("could not fetch any dollar quote"));
    }
    render_report(&report, &params);
    Ok(())
}

fn run_breakeven(params: TradeParams, buy: f64, sell: f64) -> Result<()> {
    let quotes = [("quote".to_string(), sell)];
    let outcomes = scanner::build_outcomes(buy, &quotes, &params);
    let outcome = outcomes
        .first()
        .ok_or_else(|| eyre::eyre!("prices rejected: buy={buy} sell={sell}"))?;

    print_breakdown(outcome, &params, buy);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let params = TradeParams::resolve(cli.volume, cli.fee_pct, cli.fixed_fee)?;
    let exchanges = selected_exchanges(&cli);

    match cli.command {
        Some(Commands::Monitor) | None => run_monitor(params, exchanges).await,
        Some(Commands::Scan) => run_scan(params, exchanges).await,
        Some(Commands::Breakeven { buy, sell }) => run_breakeven(params, buy, sell),
    }
}
