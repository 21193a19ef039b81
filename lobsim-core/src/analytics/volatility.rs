//! Per-second rolling volatility table
//!
//! Built once from the whole session before replay starts. The pipeline:
//!
//! 1. keep the first book row for each distinct timestamp
//! 2. resample onto a 1-second grid, last row in each second wins, empty
//!    seconds carry the previous book forward
//! 3. mid = (bid + ask) / 2
//! 4. trailing sample standard deviation (ddof = 1) of the mid over 60, 300
//!    and 900 seconds, window including the current second
//!
//! A window holding fewer than two seconds has no defined deviation.

use crate::core::{fixed_point, floor_to_second, Timestamp};
use crate::data::MarketEvent;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Trailing window lengths in seconds: 1, 5 and 15 minutes
pub const VOL_WINDOWS_SECS: [usize; 3] = [60, 300, 900];

/// Longest span the table covers; older rows are dropped
pub const MAX_TABLE_SECS: u64 = 86_400;

/// One row of the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilitySample {
    /// Unix second this row describes
    pub second: u64,
    pub mid: f64,
    pub vol_1m: Option<f64>,
    pub vol_5m: Option<f64>,
    pub vol_15m: Option<f64>,
}

/// Dense per-second table indexed from the first observed second
#[derive(Debug, Clone, Default)]
pub struct VolatilityContext {
    start_second: u64,
    samples: Vec<VolatilitySample>,
}

impl VolatilityContext {
    /// Build from book-update rows; trades are ignored
    pub fn build<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a MarketEvent>,
    {
        let tops = events.into_iter().filter_map(|event| match event {
            MarketEvent::BookUpdate {
                ts_event, levels, ..
            } => Some((*ts_event, levels.best_bid_price(), levels.best_ask_price())),
            MarketEvent::Trade { .. } => None,
        });
        Self::from_top_of_book(tops)
    }

    /// Build from an ordered `(timestamp, best bid, best ask)` series
    ///
    /// Rows with an empty side carry no midprice and are skipped.
    pub fn from_top_of_book<I>(tops: I) -> Self
    where
        I: IntoIterator<Item = (Timestamp, u64, u64)>,
    {
        let mut last_ts: Option<Timestamp> = None;
        let mut one_sided = 0usize;
        // (second, mid) with the last row of each second winning
        let mut per_second: Vec<(u64, f64)> = Vec::new();

        for (ts, bid, ask) in tops {
            if last_ts == Some(ts) {
                continue;
            }
            last_ts = Some(ts);

            if bid == 0 || ask == 0 {
                one_sided += 1;
                continue;
            }

            let second = floor_to_second(ts);
            let mid = (fixed_point::to_f64(bid) + fixed_point::to_f64(ask)) / 2.0;
            match per_second.last_mut() {
                Some(last) if last.0 == second => last.1 = mid,
                Some(last) if last.0 > second => {
                    warn!("book row at second {} precedes {}, ignored", second, last.0);
                }
                _ => per_second.push((second, mid)),
            }
        }

        if one_sided > 0 {
            debug!("skipped {} one-sided book rows", one_sided);
        }

        if let (Some(&(first, _)), Some(&(last, _))) = (per_second.first(), per_second.last()) {
            if last - first >= MAX_TABLE_SECS {
                let cutoff = last + 1 - MAX_TABLE_SECS;
                let stale = per_second.iter().take_while(|(s, _)| *s < cutoff).count();
                warn!(
                    "book rows span {}s, dropping {} seconds before {}",
                    last - first,
                    stale,
                    cutoff
                );
                per_second.drain(..stale);
            }
        }

        let Some(&(start_second, _)) = per_second.first() else {
            return Self::default();
        };

        let mids = forward_fill(start_second, &per_second);
        let [w1, w5, w15] = VOL_WINDOWS_SECS.map(|w| rolling_std(&mids, w));

        let samples = mids
            .iter()
            .enumerate()
            .map(|(i, &mid)| VolatilitySample {
                second: start_second + i as u64,
                mid,
                vol_1m: w1[i],
                vol_5m: w5[i],
                vol_15m: w15[i],
            })
            .collect::<Vec<_>>();

        debug!(
            "volatility table covers {} seconds from {}",
            samples.len(),
            start_second
        );

        Self {
            start_second,
            samples,
        }
    }

    /// Row for an exact second, `None` outside the table
    #[inline]
    pub fn lookup(&self, second: u64) -> Option<&VolatilitySample> {
        let offset = second.checked_sub(self.start_second)?;
        self.samples.get(usize::try_from(offset).ok()?)
    }

    /// Row for the second containing `ts`
    #[inline]
    pub fn lookup_ts(&self, ts: Timestamp) -> Option<&VolatilitySample> {
        self.lookup(floor_to_second(ts))
    }

    /// Rows whose second lies within `[from, to]`
    pub fn window(&self, from: u64, to: u64) -> &[VolatilitySample] {
        if self.samples.is_empty() || to < from {
            return &[];
        }
        let end_second = self.start_second + self.samples.len() as u64 - 1;
        let lo = from.max(self.start_second);
        let hi = to.min(end_second);
        if lo > hi {
            return &[];
        }
        let lo = (lo - self.start_second) as usize;
        let hi = (hi - self.start_second) as usize;
        &self.samples[lo..=hi]
    }

    pub fn samples(&self) -> &[VolatilitySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean of the defined 1-minute deviations in `[from, to]`
    pub fn mean_vol_1m(&self, from: u64, to: u64) -> Option<f64> {
        let (sum, n) = self
            .window(from, to)
            .iter()
            .filter_map(|s| s.vol_1m)
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        (n > 0).then(|| sum / n as f64)
    }

    /// Net mid return `last / first - 1` over `[from, to]`
    pub fn net_return(&self, from: u64, to: u64) -> Option<f64> {
        let window = self.window(from, to);
        let first = window.first()?.mid;
        let last = window.last()?.mid;
        (first != 0.0).then(|| last / first - 1.0)
    }
}

/// Dense per-second mids from sparse observations, gaps carry forward
fn forward_fill(start_second: u64, per_second: &[(u64, f64)]) -> Vec<f64> {
    let Some(&(end_second, _)) = per_second.last() else {
        return Vec::new();
    };
    let mut mids = Vec::with_capacity((end_second - start_second + 1) as usize);
    let mut current = per_second[0].1;
    let mut obs = per_second.iter().peekable();
    for second in start_second..=end_second {
        while let Some(&&(s, mid)) = obs.peek() {
            if s > second {
                break;
            }
            current = mid;
            obs.next();
        }
        mids.push(current);
    }
    mids
}

/// Trailing sample standard deviation over `window` points ending at each
/// index, `None` with fewer than two points
///
/// Running sums are centred on the first value to keep the subtraction of
/// squares well conditioned around typical price levels.
fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let Some(&centre) = values.first() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut sum_sq = 0.0;

    for i in 0..values.len() {
        let x = values[i] - centre;
        sum += x;
        sum_sq += x * x;
        if i >= window {
            let old = values[i - window] - centre;
            sum -= old;
            sum_sq -= old * old;
        }

        let n = (i + 1).min(window) as f64;
        if n < 2.0 {
            out.push(None);
            continue;
        }
        let variance = ((sum_sq - sum * sum / n) / (n - 1.0)).max(0.0);
        out.push(Some(variance.sqrt()));
    }
    out
}
