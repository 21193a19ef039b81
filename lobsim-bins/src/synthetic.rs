//! Seeded synthetic sessions
//!
//! A random-walk mid with a one-tick spread, ten levels of random depth per
//! side, and occasional trades at the top few levels. Events come in small
//! batches; the last event of each batch carries the boundary flag. The
//! same seed always yields the same session.

use lobsim_core::core::{Timestamp, NANOS_PER_SEC};
use lobsim_core::data::{BookLevels, MarketEvent, F_LAST, ORDERBOOK_DEPTH};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 2024-01-02 14:30:00 UTC, a regular session open
pub const DEFAULT_SESSION_START: Timestamp = 1_704_205_800 * NANOS_PER_SEC;

/// Shape of a generated session
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub seed: u64,
    pub events: usize,
    pub start: Timestamp,
    /// Fixed-point starting best bid
    pub start_price: u64,
    /// Fixed-point tick
    pub tick: u64,
    /// Probability an event is a trade
    pub trade_prob: f64,
    /// Probability the mid moves one tick on a book update
    pub move_prob: f64,
    /// Largest batch length
    pub max_batch: usize,
    /// Largest gap between events
    pub max_gap_ns: u64,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            seed: 42,
            events: 20_000,
            start: DEFAULT_SESSION_START,
            start_price: 10_000_000_000,
            tick: 10_000_000,
            trade_prob: 0.2,
            move_prob: 0.15,
            max_batch: 4,
            max_gap_ns: 250_000_000,
        }
    }
}

/// Generate a session
pub fn generate(params: &SessionParams) -> Vec<MarketEvent> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut events = Vec::with_capacity(params.events);

    let mut ts = params.start;
    let mut best_bid = params.start_price;
    let mut levels = ladder(&mut rng, best_bid, params.tick);
    let mut batch_left = rng.gen_range(1..=params.max_batch.max(1));

    for _ in 0..params.events {
        ts += rng.gen_range(0..=params.max_gap_ns);

        batch_left -= 1;
        let flags = if batch_left == 0 {
            batch_left = rng.gen_range(1..=params.max_batch.max(1));
            F_LAST
        } else {
            0
        };

        if rng.gen_bool(params.trade_prob) {
            let depth = rng.gen_range(0..3usize);
            let (prices, sizes) = if rng.gen_bool(0.5) {
                (&levels.bid_prices, &levels.bid_sizes)
            } else {
                (&levels.ask_prices, &levels.ask_sizes)
            };
            let size = rng.gen_range(1..=sizes[depth].max(1));
            events.push(MarketEvent::trade(ts, prices[depth], size, depth as u8, flags));
            continue;
        }

        if rng.gen_bool(params.move_prob) {
            best_bid = if rng.gen_bool(0.5) {
                best_bid + params.tick
            } else {
                best_bid.saturating_sub(params.tick).max(params.tick * ORDERBOOK_DEPTH as u64)
            };
            levels = ladder(&mut rng, best_bid, params.tick);
        } else {
            // Size churn only
            let level = rng.gen_range(0..ORDERBOOK_DEPTH);
            levels.bid_sizes[level] = rng.gen_range(10..=500);
            levels.ask_sizes[level] = rng.gen_range(10..=500);
        }
        events.push(MarketEvent::book(ts, levels, flags));
    }

    events
}

fn ladder(rng: &mut StdRng, best_bid: u64, tick: u64) -> BookLevels {
    let mut levels = BookLevels::default();
    for i in 0..ORDERBOOK_DEPTH {
        let offset = tick * i as u64;
        levels.bid_prices[i] = best_bid - offset;
        levels.ask_prices[i] = best_bid + tick + offset;
        levels.bid_sizes[i] = rng.gen_range(10..=500);
        levels.ask_sizes[i] = rng.gen_range(10..=500);
    }
    levels
}
