//! Order book state owned by one engine
//!
//! - `combined`: the 10-level market + bot book rebuilt on every update
//! - `resting`: the bot's own orders and the [`OrderManager`] interface

pub mod combined;
pub mod resting;

pub use combined::CombinedOrderBook;
pub use resting::{OrderManager, RestingOrders};
