//! One-call replay over an in-memory session
//!
//! Builds the volatility context from the events, runs the engine to the
//! end of the session and summarises the logs.

use crate::analytics::{RunSummary, VolatilityContext};
use crate::config::SimConfig;
use crate::core::ReplayResult;
use crate::data::MarketEvent;
use crate::engine::{Engine, EngineStats, QuotingPolicy};
use crate::execution::FillPolicy;
use crate::ledger::{FillRecord, QuoteSnapshot};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Everything a run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub summary: RunSummary,
    pub stats: EngineStats,
    pub fills: Vec<FillRecord>,
    pub quotes: Vec<QuoteSnapshot>,
}

impl ReplayReport {
    /// Write the report as pretty-printed JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create report {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!("Wrote report to {}", path.display());
        Ok(())
    }
}

/// Replay `events` through a fresh engine
///
/// Fails before touching any event if the policy's preflight fails, on the
/// first out-of-order event, and when the run produced no fills.
pub fn replay<F, Q>(
    events: &[MarketEvent],
    fill_policy: F,
    quoting: Q,
    config: SimConfig,
) -> ReplayResult<ReplayReport>
where
    F: FillPolicy,
    Q: QuotingPolicy,
{
    let volatility = VolatilityContext::build(events);
    let mut engine = Engine::with_config(fill_policy, quoting, config, volatility)?;
    engine.preflight()?;

    for event in events {
        engine.process_event(event)?;
    }

    let summary = engine.summarize()?;
    let stats = engine.stats();
    let (fills, quotes) = engine.into_ledger().into_logs();

    Ok(ReplayReport {
        summary,
        stats,
        fills,
        quotes,
    })
}
