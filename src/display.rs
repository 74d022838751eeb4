use chrono::Local;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::params::TradeParams;
use crate::scanner::{ExchangeOutcome, Recommendation, ScanReport};

/// Default log file name for detected opportunities
const ARB_LOG_FILE: &str = "arb_opportunities.log";

// Track active opportunities so each one is logged once, not every refresh
static ACTIVE_ARBS: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn get_arb_log_path() -> PathBuf {
    PathBuf::from(ARB_LOG_FILE)
}

fn write_arb_to_file(message: &str) {
    let log_path = get_arb_log_path();

    match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(mut file) => {
            if let Err(e) = writeln!(file, "{}", message) {
                eprintln!("Warning: Failed to write to arb log file: {}", e);
            }
        }
        Err(e) => {
            eprintln!("Warning: Failed to open arb log file {}: {}", log_path.display(), e);
        }
    }
}

/// Initialize the opportunity log file and return the path for display.
/// Call this at startup to inform the user where logs are written.
pub fn init_arb_log() -> PathBuf {
    let log_path = get_arb_log_path();
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    let message = format!("\n[{}] === DOLAR ARB SESSION STARTED ===", timestamp);
    write_arb_to_file(&message);

    log_path
}

/// Log viable exchanges to the opportunity file (only newly-viable ones)
fn log_arb_opportunities(outcomes: &[ExchangeOutcome], timestamp: &str) {
    let mut active_arbs = ACTIVE_ARBS.lock().unwrap();
    let prev_arbs = active_arbs.get_or_insert_with(HashSet::new);

    let mut current_arbs = HashSet::new();

    for outcome in outcomes.iter() {
        if outcome.result.viable {
            current_arbs.insert(outcome.exchange.clone());

            if !prev_arbs.contains(&outcome.exchange) {
                let message = format!(
                    "[{}] ARB DETECTED | {} | USDT: {:.2} ARS | Spread: {:+.2}% | Profit: {:.2} ARS ({:.2} USD) | ROI: {:.2}%",
                    timestamp,
                    outcome.exchange,
                    outcome.usdt_price,
                    outcome.spread_pct,
                    outcome.result.profit_ars,
                    outcome.result.profit_usd,
                    outcome.result.roi_pct,
                );
                write_arb_to_file(&message);
            }
        }
    }

    *prev_arbs = current_arbs;
}

/// Clears the terminal screen
pub fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

fn format_min_volume(min_volume: f64) -> String {
    if min_volume.is_infinite() {
        "∞".to_string()
    } else {
        format!("{:.2}", min_volume)
    }
}

/// Render one full dashboard frame from a scan report
pub fn render_report(report: &ScanReport, params: &TradeParams) {
    clear_screen();

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    // Header
    println!("\x1b[1;36m{}\x1b[0m", "═".repeat(78));
    println!(
        "\x1b[1;36m  Dolar Oficial vs Crypto Arbitrage | Volume: ${:.2} USD | {}\x1b[0m",
        params.volume_usd, timestamp
    );
    println!("\x1b[1;36m{}\x1b[0m", "═".repeat(78));
    println!();

    render_fx_section(report);
    render_mep_section(report);
    render_recommendation(report);
    render_exchange_table(report, params);

    // Log newly-viable opportunities so they persist beyond the refresh
    log_arb_opportunities(&report.exchanges, &timestamp.to_string());

    // Footer
    println!("\x1b[1;36m{}\x1b[0m", "═".repeat(78));
    println!(
        "  Exchanges: {} quoted / {} requested | Viable: {} | Fetch: {}ms",
        report.exchanges.len(),
        report.requested,
        report.viable_count(),
        report.elapsed_ms
    );
    println!("\x1b[1;36m{}\x1b[0m", "═".repeat(78));
}

fn render_fx_section(report: &ScanReport) {
    println!("  \x1b[1mDOLLAR QUOTES\x1b[0m");
    println!("  {}", "─".repeat(74));

    match &report.official {
        Some(rate) => println!(
            "  Oficial │ buy at {:>10.2} │ sell at {:>10.2} │ updated {}",
            rate.venta,
            rate.compra,
            rate.updated_at.with_timezone(&Local).format("%H:%M:%S")
        ),
        None => println!("  Oficial │ \x1b[1;31mnot available\x1b[0m"),
    }
    match &report.mep {
        Some(rate) => println!(
            "  MEP     │ buy at {:>10.2} │ sell at {:>10.2} │ updated {}",
            rate.venta,
            rate.compra,
            rate.updated_at.with_timezone(&Local).format("%H:%M:%S")
        ),
        None => println!("  MEP     │ \x1b[1;31mnot available\x1b[0m"),
    }
    println!();
}

fn render_mep_section(report: &ScanReport) {
    let Some(result) = &report.mep_result else {
        return;
    };

    println!("  \x1b[1mSTRATEGY: OFICIAL → MEP (no crypto fees)\x1b[0m");
    println!("  {}", "─".repeat(74));

    let verdict = if result.viable {
        "\x1b[1;32mVIABLE ✓\x1b[0m"
    } else {
        "\x1b[1;31mNOT VIABLE ✗\x1b[0m"
    };
    println!(
        "  Profit: \x1b[1m{:>12.2} ARS\x1b[0m ({:+.2} USD) │ ROI: {:+.2}% │ {}",
        result.profit_ars, result.profit_usd, result.roi_pct, verdict
    );
    println!();
}

fn render_recommendation(report: &ScanReport) {
    match report.recommendation() {
        Recommendation::Mep { over_crypto_usd } => match over_crypto_usd {
            Some(edge) => println!(
                "  \x1b[1;32m▶ RECOMMENDATION: MEP — {:.2} USD ahead of the best exchange\x1b[0m",
                edge
            ),
            None => println!(
                "  \x1b[1;32m▶ RECOMMENDATION: MEP — no exchange is viable at this volume\x1b[0m"
            ),
        },
        Recommendation::Crypto { exchange, over_mep_usd } => match over_mep_usd {
            Some(edge) => println!(
                "  \x1b[1;32m▶ RECOMMENDATION: {} — {:.2} USD ahead of MEP\x1b[0m",
                exchange.to_uppercase(),
                edge
            ),
            None => println!(
                "  \x1b[1;32m▶ RECOMMENDATION: {} — MEP is not viable\x1b[0m",
                exchange.to_uppercase()
            ),
        },
        Recommendation::Neither => println!(
            "  \x1b[1;31m▶ NO VIABLE STRATEGY — try a larger volume or wait for better prices\x1b[0m"
        ),
    }
    println!();
}

fn render_exchange_table(report: &ScanReport, params: &TradeParams) {
    println!(
        "  \x1b[1mSTRATEGY: OFICIAL → USDT (fee {:.2}% + {:.2} USDT)\x1b[0m",
        params.fees.fee_rate() * 100.0,
        params.fees.fixed_fee()
    );
    println!("  {}", "─".repeat(74));

    if report.exchanges.is_empty() {
        println!("  \x1b[1;31mNo exchange quotes available.\x1b[0m");
        println!();
        return;
    }

    println!(
        "  \x1b[1m{:<16} │ {:>9} │ {:>8} │ {:>12} │ {:>8} │ {:>10}\x1b[0m",
        "EXCHANGE", "USDT/ARS", "SPREAD", "PROFIT ARS", "ROI", "MIN VOL"
    );
    println!("  {}", "─".repeat(74));

    for (i, outcome) in report.exchanges.iter().enumerate() {
        let mark = if i == 0 && outcome.result.viable {
            " \x1b[1;32mBEST\x1b[0m"
        } else if outcome.result.viable {
            " \x1b[32m✓\x1b[0m"
        } else {
            " \x1b[31m✗\x1b[0m"
        };

        println!(
            "  {:<16} │ {:>9.2} │ {:>+7.2}% │ {:>12.2} │ {:>+7.2}% │ {:>10}{}",
            outcome.exchange.to_uppercase(),
            outcome.usdt_price,
            outcome.spread_pct,
            outcome.result.profit_ars,
            outcome.result.roi_pct,
            format_min_volume(outcome.min_volume_usd),
            mark
        );
    }

    println!();
}

/// Print the full cash-flow breakdown of one evaluation, for the offline
/// breakeven command
pub fn print_breakdown(outcome: &ExchangeOutcome, params: &TradeParams, official_buy: f64) {
    println!();
    println!("══════════════════════════════════════════════════════════════");
    println!("  BREAKDOWN @ {:.2} USD", params.volume_usd);
    println!("══════════════════════════════════════════════════════════════");
    println!("  Buy {:.2} USD oficial @ {:.2}  = {:>14.2} ARS", params.volume_usd, official_buy, outcome.result.initial_cost_ars);
    println!("  Transfer fee {:.2} USDT       → {:>14.2} USDT net", params.fees.fixed_fee(), outcome.result.net_usdt);
    println!("  Sell USDT @ {:.2}           = {:>14.2} ARS gross", outcome.usdt_price, outcome.result.gross_proceeds_ars);
    println!("  Commission {:.2}%             = {:>14.2} ARS", params.fees.fee_rate() * 100.0, outcome.result.commission_ars);
    println!("  Net proceeds                  = {:>14.2} ARS", outcome.result.net_proceeds_ars);
    println!("  ──────────────────────────────────────────────");
    let color = if outcome.result.viable { "32" } else { "31" };
    println!(
        "  \x1b[1;{}mProfit: {:.2} ARS ({:+.2} USD) │ ROI {:+.4}%\x1b[0m",
        color, outcome.result.profit_ars, outcome.result.profit_usd, outcome.result.roi_pct
    );
    println!("  Break-even volume: {} USD", format_min_volume(outcome.min_volume_usd));
    println!("══════════════════════════════════════════════════════════════");
}
