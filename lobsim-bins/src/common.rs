//! Common utilities for all binaries
//!
//! Shared initialization, CLI parsing, and reporting code.

use anyhow::Result;
use clap::{Args, ValueEnum};
use lobsim_core::replay::ReplayReport;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Common CLI arguments for all binaries
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Log level (overridden by RUST_LOG)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

/// Target price model for the market maker
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// No pricing formula; the run fails before the first event
    Unpriced,
    /// Quote at the best bid and ask
    JoinBest,
    /// Mid ± half spread, skewed against inventory
    InventorySkew,
}

/// Initialize tracing/logging
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_target(false)).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }

    Ok(())
}

/// Print final statistics
pub fn print_summary(report: &ReplayReport) {
    let stats = &report.stats;
    let summary = &report.summary;

    tracing::info!("=== Final Statistics ===");
    tracing::info!("Events processed: {}", stats.events_processed);
    tracing::info!("Book updates / trades: {} / {}", stats.book_updates, stats.trades);
    tracing::info!("Policy invocations: {}", stats.policy_invocations);
    tracing::info!(
        "Volatility refreshes: {} ({} misses)",
        stats.vol_refreshes,
        stats.vol_misses
    );
    tracing::info!("Fills: {}  Quote snapshots: {}", summary.fill_count, summary.quote_count);
    tracing::info!("Ending position: {}", summary.ending_position);
    tracing::info!("Ending cash: {}", summary.ending_cash);
    tracing::info!("Total volume: {}", summary.total_volume);
    tracing::info!("Maker rebate: {}", summary.maker_rebate);
    tracing::info!("Mark-to-market PnL: {}", summary.mark_to_market_pnl);
    tracing::info!("Trading PnL: {}", summary.trading_pnl);
    tracing::info!(
        "Time-weighted fill size: {:.3} (second moment {:.3})",
        summary.twa_fill_size,
        summary.twa_fill_size_sq
    );
    match summary.mean_vol_1m {
        Some(vol) => tracing::info!("Mean 1m volatility: {:.6}", vol),
        None => tracing::info!("Mean 1m volatility: n/a"),
    }
    match summary.net_mid_return {
        Some(ret) => tracing::info!("Net mid return: {:.4}%", ret * 100.0),
        None => tracing::info!("Net mid return: n/a"),
    }
}
