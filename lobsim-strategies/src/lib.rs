//! Lobsim Strategies - Quoting Policies for the Replay Engine
//!
//! ## Available Policies
//!
//! ### [`MarketMaker`] - Top-of-book market making
//!
//! Keeps at most one order per side inside the top levels of the book,
//! re-pricing when the target moves by at least the reprice threshold.
//! Target prices come from a [`PricingModel`]:
//!
//! - [`Unpriced`]: no formula, fails preflight with `UnimplementedPolicy`
//! - [`JoinBest`]: quote at the best bid and ask
//! - [`InventorySkew`]: mid ± half spread, leaning against inventory
//!
//! ```rust
//! use lobsim_strategies::{JoinBest, MarketMaker};
//!
//! let mm = MarketMaker::with_defaults(JoinBest).unwrap();
//! assert_eq!(mm.config().max_order_size, 100);
//! ```

pub mod config;
pub mod market_maker;
pub mod pricing;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::MarketMakerConfig;
pub use market_maker::MarketMaker;
pub use pricing::{InventorySkew, JoinBest, PricingModel, Unpriced};
