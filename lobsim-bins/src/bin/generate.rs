//! Write a seeded synthetic session as JSON lines
//!
//! The output is the row format `lobsim-replay --events` reads.

use anyhow::{Context, Result};
use clap::Parser;
use lobsim_bins::common::{init_logging, CommonArgs};
use lobsim_bins::synthetic::{self, SessionParams};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a synthetic order book session")]
struct GenerateArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Number of events
    #[arg(short = 'n', long, default_value = "20000")]
    events: usize,

    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Probability an event is a trade
    #[arg(long, default_value = "0.2")]
    trade_prob: f64,
}

fn main() -> Result<()> {
    let args = GenerateArgs::parse();
    init_logging(&args.common.log_level, args.common.json_logs)?;

    if !(0.0..=1.0).contains(&args.trade_prob) {
        anyhow::bail!("trade_prob must be within [0, 1], got {}", args.trade_prob);
    }

    let events = synthetic::generate(&SessionParams {
        seed: args.seed,
        events: args.events,
        trade_prob: args.trade_prob,
        ..SessionParams::default()
    });

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    for event in &events {
        serde_json::to_writer(&mut writer, event).context("Failed to serialize event")?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} events to {}", events.len(), args.output.display());
    Ok(())
}
