//! End-of-run statistics over the fill and quote logs
//!
//! Accounting (cash, rebate, PnL) is summed in `Decimal` so two runs over
//! the same session agree to the last digit. Moments and volatility are
//! plain `f64`.

use super::volatility::VolatilityContext;
use crate::core::{floor_to_second, fixed_point, ReplayError, ReplayResult, Timestamp};
use crate::ledger::{FillRecord, QuoteSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// First and last event timestamps of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl RunWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Inclusive second range covered by the window
    #[inline]
    pub fn seconds(&self) -> (u64, u64) {
        (floor_to_second(self.start), floor_to_second(self.end))
    }
}

/// Scalar analytics for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub window: RunWindow,
    pub fill_count: usize,
    pub quote_count: usize,
    pub ending_position: i64,
    pub ending_cash: Decimal,
    pub total_volume: u64,
    pub maker_rebate: Decimal,
    pub last_fill_price: u64,
    /// cash + position × last fill price + rebate
    pub mark_to_market_pnl: Decimal,
    /// Σ (mid − price) × size + rebate
    pub trading_pnl: Decimal,
    /// Time-weighted mean of |fill size|
    pub twa_fill_size: f64,
    /// Time-weighted mean of |fill size|²
    pub twa_fill_size_sq: f64,
    pub mean_vol_1m: Option<f64>,
    pub net_mid_return: Option<f64>,
}

/// Compute the run summary
///
/// An empty fill log is a usage error: there is no last fill price to mark
/// against and no weights to average over.
pub fn summarize(
    fills: &[FillRecord],
    quotes: &[QuoteSnapshot],
    volatility: &VolatilityContext,
    window: RunWindow,
    rebate_rate: Decimal,
) -> ReplayResult<RunSummary> {
    let last_fill = fills.last().ok_or(ReplayError::EmptyFillLog)?;

    let mut cash = Decimal::ZERO;
    let mut position = 0i64;
    let mut volume = 0u64;
    let mut edge = Decimal::ZERO;
    let mut unreferenced = 0usize;

    for fill in fills {
        cash -= fill.notional();
        position += fill.size;
        volume += fill.abs_size();
        match fill.edge() {
            Some(e) => edge += e,
            None => unreferenced += 1,
        }
    }

    if unreferenced > 0 {
        warn!(
            "{} fills had no reference mid and are excluded from trading PnL",
            unreferenced
        );
    }

    let rebate = rebate_rate * Decimal::from(volume);
    let last_price = fixed_point::to_decimal(last_fill.price);
    let mtm = cash + Decimal::from(position) * last_price + rebate;
    let (twa, twa_sq) = time_weighted_size_moments(fills, window.end);

    let (from, to) = window.seconds();
    let summary = RunSummary {
        window,
        fill_count: fills.len(),
        quote_count: quotes.len(),
        ending_position: position,
        ending_cash: cash,
        total_volume: volume,
        maker_rebate: rebate,
        last_fill_price: last_fill.price,
        mark_to_market_pnl: mtm,
        trading_pnl: edge + rebate,
        twa_fill_size: twa,
        twa_fill_size_sq: twa_sq,
        mean_vol_1m: volatility.mean_vol_1m(from, to),
        net_mid_return: volatility.net_return(from, to),
    };

    info!(
        "Run summary: {} fills, position {}, MTM {}, trading PnL {}",
        summary.fill_count, summary.ending_position, summary.mark_to_market_pnl, summary.trading_pnl
    );

    Ok(summary)
}

/// Time-weighted first and second moment of |fill size|
///
/// Each fill is weighted by the interval until the next fill; the last one
/// by the interval to `run_end`. If every interval is zero the fills are
/// weighted equally.
pub fn time_weighted_size_moments(fills: &[FillRecord], run_end: Timestamp) -> (f64, f64) {
    if fills.is_empty() {
        return (0.0, 0.0);
    }

    let weights: Vec<f64> = fills
        .iter()
        .enumerate()
        .map(|(i, fill)| {
            let until = fills.get(i + 1).map_or(run_end, |next| next.ts_event);
            until.saturating_sub(fill.ts_event) as f64
        })
        .collect();

    let total: f64 = weights.iter().sum();
    let (weights, total) = if total > 0.0 {
        (weights, total)
    } else {
        (vec![1.0; fills.len()], fills.len() as f64)
    };

    let (m1, m2) = fills
        .iter()
        .zip(&weights)
        .fold((0.0, 0.0), |(m1, m2), (fill, w)| {
            let size = fill.abs_size() as f64;
            (m1 + w * size, m2 + w * size * size)
        });

    (m1 / total, m2 / total)
}
