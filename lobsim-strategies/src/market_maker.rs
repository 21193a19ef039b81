//! Top-of-book market maker
//!
//! At every batch boundary:
//!
//! 1. cancel orders that fell outside the top N levels of their side
//! 2. ask the pricing model for target bid and ask prices
//! 3. per side, round the target to the tick and pull it back to the
//!    same-side best if it would improve on it
//! 4. with no order, place one; with one order that is at least the
//!    reprice threshold away from target, cancel and replace; with more
//!    than one, cancel all and place fresh
//!
//! Orders are sized as `min(floor(size at sizing level × ratio), cap)` and
//! only placed when the target lies within the top N levels.

use crate::config::MarketMakerConfig;
use crate::pricing::PricingModel;
use lobsim_core::core::{fixed_point, ReplayResult, Side};
use lobsim_core::engine::{MarketView, QuotingPolicy};
use lobsim_core::orderbook::{CombinedOrderBook, OrderManager};
use tracing::{debug, info, trace};

/// Market maker over a pluggable pricing model
pub struct MarketMaker<P: PricingModel> {
    model: P,
    config: MarketMakerConfig,
    /// Fixed-point tick
    tick: u64,
    /// Fixed-point reprice threshold
    reprice: u64,
}

impl<P: PricingModel> MarketMaker<P> {
    pub fn new(model: P, config: MarketMakerConfig) -> ReplayResult<Self> {
        config.validate()?;
        let tick = fixed_point::from_decimal(config.tick_size);
        let reprice = fixed_point::from_decimal(config.reprice_threshold);
        info!(
            "Market maker on {}: top {} levels, ratio {}, cap {}",
            model.name(),
            config.top_levels,
            config.order_size_ratio,
            config.max_order_size
        );
        Ok(Self {
            model,
            config,
            tick,
            reprice,
        })
    }

    /// Market maker with default parameters
    pub fn with_defaults(model: P) -> ReplayResult<Self> {
        Self::new(model, MarketMakerConfig::default())
    }

    pub fn model(&self) -> &P {
        &self.model
    }

    pub fn config(&self) -> &MarketMakerConfig {
        &self.config
    }

    /// Whether `price` lies between the best and the N-th level of a side
    ///
    /// Bids: best ≥ price ≥ level[N−1]. Asks: best ≤ price ≤ level[N−1].
    /// A side shallower than N levels is bounded by its deepest populated
    /// level; an empty side contains nothing.
    pub fn is_within_top_levels(&self, book: &CombinedOrderBook, side: Side, price: u64) -> bool {
        let best = book.best(side);
        if best == 0 {
            return false;
        }
        let deepest = self.config.top_levels.min(book.depth(side)).max(1) - 1;
        let bottom = book.price_at(side, deepest);
        match side {
            Side::Bid => best >= price && price >= bottom,
            Side::Ask => best <= price && price <= bottom,
        }
    }

    /// `min(floor(size at sizing level × ratio), cap)`
    pub fn order_size(&self, book: &CombinedOrderBook, side: Side) -> u64 {
        let reference = book.size_at(side, self.config.sizing_level);
        let scaled = (reference as f64 * self.config.order_size_ratio).floor() as u64;
        scaled.min(self.config.max_order_size)
    }

    /// Round to the tick, then pull back to the same-side best
    pub fn normalize_target(&self, book: &CombinedOrderBook, side: Side, target: u64) -> u64 {
        let target = fixed_point::round_to_tick(target, self.tick);
        let best = book.best(side);
        if best > 0 && side.is_more_aggressive(target, best) {
            trace!("{} target {} clamped to best {}", side, target, best);
            return best;
        }
        target
    }

    fn cancel_outside_top_levels<M: OrderManager>(&self, book: &CombinedOrderBook, side: Side, orders: &mut M) {
        let stale: Vec<u64> = orders
            .orders(side)
            .keys()
            .copied()
            .filter(|&price| !self.is_within_top_levels(book, side, price))
            .collect();
        for price in stale {
            debug!("{} order @ {} left the top levels", side, price);
            orders.cancel(price, side);
        }
    }

    fn place_if_within<M: OrderManager>(&self, book: &CombinedOrderBook, side: Side, price: u64, orders: &mut M) {
        if !self.is_within_top_levels(book, side, price) {
            return;
        }
        let size = self.order_size(book, side);
        if size > 0 {
            orders.place(price, size, side);
        }
    }

    fn place_or_adjust<M: OrderManager>(&self, book: &CombinedOrderBook, side: Side, target: u64, orders: &mut M) {
        let target = self.normalize_target(book, side, target);
        let existing: Vec<u64> = orders.orders(side).keys().copied().collect();

        match existing.as_slice() {
            [] => self.place_if_within(book, side, target, orders),
            [current] => {
                if current.abs_diff(target) >= self.reprice {
                    orders.cancel(*current, side);
                    self.place_if_within(book, side, target, orders);
                }
            }
            many => {
                debug!("{} {} orders resting, collapsing to one", many.len(), side);
                for &price in many {
                    orders.cancel(price, side);
                }
                self.place_if_within(book, side, target, orders);
            }
        }
    }
}

impl<P: PricingModel> QuotingPolicy for MarketMaker<P> {
    fn preflight(&self) -> ReplayResult<()> {
        self.model.preflight()
    }

    fn decide<M: OrderManager>(&mut self, view: &MarketView<'_>, orders: &mut M) -> ReplayResult<()> {
        let book = view.book;
        self.cancel_outside_top_levels(book, Side::Bid, orders);
        self.cancel_outside_top_levels(book, Side::Ask, orders);

        let Some((bid, ask)) = self.model.target_prices(view)? else {
            return Ok(());
        };

        self.place_or_adjust(book, Side::Bid, bid, orders);
        self.place_or_adjust(book, Side::Ask, ask, orders);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MarketMaker"
    }
}
