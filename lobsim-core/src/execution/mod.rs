//! Trade matching against the bot's resting orders
//!
//! The engine is generic over [`FillPolicy`]. [`ProRataFill`] is the
//! replay model; [`NoFill`] disables execution entirely.

pub mod fill_matcher;

pub use fill_matcher::{executed_size, resolve_side, FillPolicy, NoFill, ProRataFill, TradePrint};
