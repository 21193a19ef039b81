//! Replay a session against the market maker
//!
//! Events come from a JSON-lines file (`--events`) or, without one, from a
//! seeded synthetic session. The summary is logged; `--report` also writes
//! the full report (summary, stats, fill and quote logs) as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use lobsim_bins::common::{init_logging, print_summary, CommonArgs, ModelKind};
use lobsim_bins::synthetic::{self, SessionParams};
use lobsim_core::config::SimConfig;
use lobsim_core::data::{read_jsonl, MarketEvent};
use lobsim_core::execution::ProRataFill;
use lobsim_core::replay::{replay, ReplayReport};
use lobsim_strategies::{InventorySkew, JoinBest, MarketMaker, MarketMakerConfig, PricingModel, Unpriced};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay order book events against a simulated market maker")]
struct ReplayArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// JSON-lines event file; a synthetic session is generated when absent
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Synthetic session length
    #[arg(long, default_value = "20000")]
    synthetic_events: usize,

    /// Synthetic session seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Pricing model
    #[arg(short, long, value_enum, default_value = "join-best")]
    model: ModelKind,

    /// Engine config file (JSON or TOML)
    #[arg(long)]
    sim_config: Option<PathBuf>,

    /// Market maker config file (JSON or TOML)
    #[arg(long)]
    mm_config: Option<PathBuf>,

    /// Override the maker rebate per unit of volume
    #[arg(long)]
    rebate: Option<Decimal>,

    /// Override the volatility refresh cadence (events)
    #[arg(long)]
    vol_refresh_interval: Option<u64>,

    /// Override the per-order size cap
    #[arg(long)]
    max_order_size: Option<u64>,

    /// Write the full report as JSON
    #[arg(short, long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = ReplayArgs::parse();
    init_logging(&args.common.log_level, args.common.json_logs)?;

    tracing::info!("=== Lobsim: Market Maker Replay ===");

    let mut sim_config = match &args.sim_config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(rebate) = args.rebate {
        sim_config.maker_rebate_per_unit = rebate;
    }
    if let Some(interval) = args.vol_refresh_interval {
        sim_config.vol_refresh_interval = interval;
    }

    let mut mm_config = match &args.mm_config {
        Some(path) => MarketMakerConfig::load(path)?,
        None => MarketMakerConfig::default(),
    };
    if let Some(cap) = args.max_order_size {
        mm_config.max_order_size = cap;
    }

    let events = load_events(&args)?;
    tracing::info!("Replaying {} events with {:?} pricing", events.len(), args.model);

    let report = match args.model {
        ModelKind::Unpriced => run(&events, Unpriced, sim_config, mm_config)?,
        ModelKind::JoinBest => run(&events, JoinBest, sim_config, mm_config)?,
        ModelKind::InventorySkew => run(&events, InventorySkew::default(), sim_config, mm_config)?,
    };

    print_summary(&report);

    if let Some(path) = &args.report {
        report.write_json(path)?;
    }

    Ok(())
}

fn load_events(args: &ReplayArgs) -> Result<Vec<MarketEvent>> {
    match &args.events {
        Some(path) => read_jsonl(path),
        None => {
            tracing::info!(
                "No event file given, generating {} synthetic events (seed {})",
                args.synthetic_events,
                args.seed
            );
            Ok(synthetic::generate(&SessionParams {
                seed: args.seed,
                events: args.synthetic_events,
                ..SessionParams::default()
            }))
        }
    }
}

fn run<P: PricingModel>(
    events: &[MarketEvent],
    model: P,
    sim_config: SimConfig,
    mm_config: MarketMakerConfig,
) -> Result<ReplayReport> {
    let policy = MarketMaker::new(model, mm_config)?;
    replay(events, ProRataFill, policy, sim_config).context("Replay failed")
}
