//! Market data rows and the feeds that deliver them

pub mod constants;
pub mod feed;
pub mod snapshot_builder;
pub mod types;

pub use constants::{F_LAST, ORDERBOOK_DEPTH};
pub use feed::{read_jsonl, EventFeed, JsonlFeed, VecFeed};
pub use snapshot_builder::LevelsBuilder;
pub use types::{BookLevels, MarketEvent};
