//! Test helpers for building books, views and scripted pricing models

use crate::pricing::PricingModel;
use lobsim_core::core::ReplayResult;
use lobsim_core::data::LevelsBuilder;
use lobsim_core::engine::MarketView;
use lobsim_core::orderbook::{CombinedOrderBook, RestingOrders};
use std::cell::Cell;
use std::rc::Rc;

const CENT: u64 = 10_000_000;

/// One-cent ladder with the best bid at `best_bid`, `size` per level
pub fn ladder_book(best_bid: u64, size: u64) -> CombinedOrderBook {
    let mut book = CombinedOrderBook::new();
    book.reconstruct(
        &LevelsBuilder::ladder(best_bid, best_bid + CENT, CENT, size).build(),
        &RestingOrders::new(),
    );
    book
}

/// View over a book with no cached volatility
pub fn view(book: &CombinedOrderBook, position: i64) -> MarketView<'_> {
    MarketView {
        ts_event: 0,
        book,
        position,
        volatility: None,
    }
}

/// Pricing model returning targets set from outside
///
/// Clones share the same targets, so a test can move them after the model
/// was handed to a market maker.
#[derive(Debug, Clone)]
pub struct FixedTargets {
    targets: Rc<Cell<(u64, u64)>>,
}

impl FixedTargets {
    pub fn new(bid: u64, ask: u64) -> Self {
        Self {
            targets: Rc::new(Cell::new((bid, ask))),
        }
    }

    pub fn set(&self, bid: u64, ask: u64) {
        self.targets.set((bid, ask));
    }
}

impl PricingModel for FixedTargets {
    fn name(&self) -> &'static str {
        "FixedTargets"
    }

    fn target_prices(&self, _view: &MarketView<'_>) -> ReplayResult<Option<(u64, u64)>> {
        Ok(Some(self.targets.get()))
    }
}
