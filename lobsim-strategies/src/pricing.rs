//! Target price models
//!
//! A [`PricingModel`] turns the current view into a target bid and ask.
//! The market maker handles everything else: rounding, clamping, sizing
//! and order churn.
//!
//! - [`Unpriced`]: the base model with no formula; refuses to run
//! - [`JoinBest`]: quote at the same-side best price
//! - [`InventorySkew`]: mid ± half spread, shifted against inventory and
//!   widened by recent volatility

use lobsim_core::core::{fixed_point, ReplayError, ReplayResult, Side};
use lobsim_core::engine::MarketView;

/// Target prices from book, inventory and volatility
pub trait PricingModel {
    /// Model name for logging
    fn name(&self) -> &'static str;

    /// Checked once before the replay starts
    fn preflight(&self) -> ReplayResult<()> {
        Ok(())
    }

    /// Target `(bid, ask)` in fixed point
    ///
    /// `Ok(None)` means the book cannot be quoted right now (a side is
    /// empty) and existing orders are left alone.
    fn target_prices(&self, view: &MarketView<'_>) -> ReplayResult<Option<(u64, u64)>>;
}

/// Base model with no pricing formula
///
/// Running a market maker on it is a configuration error, reported before
/// the first event rather than trading on placeholder prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpriced;

impl Unpriced {
    fn unimplemented() -> ReplayError {
        ReplayError::UnimplementedPolicy { model: "Unpriced" }
    }
}

impl PricingModel for Unpriced {
    fn name(&self) -> &'static str {
        "Unpriced"
    }

    fn preflight(&self) -> ReplayResult<()> {
        Err(Self::unimplemented())
    }

    fn target_prices(&self, _view: &MarketView<'_>) -> ReplayResult<Option<(u64, u64)>> {
        Err(Self::unimplemented())
    }
}

/// Join the best bid and best ask
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinBest;

impl PricingModel for JoinBest {
    fn name(&self) -> &'static str {
        "JoinBest"
    }

    #[inline(always)]
    fn target_prices(&self, view: &MarketView<'_>) -> ReplayResult<Option<(u64, u64)>> {
        let bid = view.best(Side::Bid);
        let ask = view.best(Side::Ask);
        if bid == 0 || ask == 0 {
            return Ok(None);
        }
        Ok(Some((bid, ask)))
    }
}

/// Inventory-skewed symmetric quotes
///
/// ```text
/// half   = half_spread + vol_multiplier × vol_1m
/// skew   = skew_per_lot × position
/// bid    = mid − half − skew
/// ask    = mid + half − skew
/// ```
///
/// A long position lowers both quotes to lean towards selling; a short
/// position raises them.
#[derive(Debug, Clone, Copy)]
pub struct InventorySkew {
    /// Fixed-point half spread
    pub half_spread: u64,
    /// Fixed-point price shift per lot of inventory
    pub skew_per_lot: u64,
    /// Multiple of the cached 1-minute midprice deviation added to the half spread
    pub vol_multiplier: f64,
}

impl Default for InventorySkew {
    fn default() -> Self {
        Self {
            half_spread: 10_000_000, // 0.01
            skew_per_lot: 100_000,   // 0.0001 per lot
            vol_multiplier: 1.0,
        }
    }
}

impl PricingModel for InventorySkew {
    fn name(&self) -> &'static str {
        "InventorySkew"
    }

    fn target_prices(&self, view: &MarketView<'_>) -> ReplayResult<Option<(u64, u64)>> {
        let Some(mid) = view.mid_price() else {
            return Ok(None);
        };

        let vol_widening = view
            .vol_1m()
            .map_or(0, |vol| fixed_point::from_f64(vol * self.vol_multiplier));
        let half = self.half_spread.saturating_add(vol_widening) as i128;
        let skew = self.skew_per_lot as i128 * view.position as i128;
        let mid = mid as i128;

        let bid = (mid - half - skew).max(0);
        let ask = (mid + half - skew).max(0);
        Ok(Some((clamp_u64(bid), clamp_u64(ask))))
    }
}

#[inline]
fn clamp_u64(value: i128) -> u64 {
    value.clamp(0, u64::MAX as i128) as u64
}
