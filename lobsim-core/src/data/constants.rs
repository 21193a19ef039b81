//! Feed layout constants
//!
//! All depth-related values MUST use these constants, never hardcoded literals.
//!
//! ```rust
//! use lobsim_core::data::constants::ORDERBOOK_DEPTH;
//!
//! let bid_prices: [u64; ORDERBOOK_DEPTH] = [0; ORDERBOOK_DEPTH];
//! assert_eq!(bid_prices.len(), 10);
//! ```

/// Number of price levels per side in every book-update row
pub const ORDERBOOK_DEPTH: usize = 10;

/// Flag bit marking the last record of an atomic batch
///
/// Any flags value at or above this marks a batch boundary.
pub const F_LAST: u8 = 128;

const _: () = {
    match ORDERBOOK_DEPTH {
        10 => {}
        _ => panic!("Unsupported ORDERBOOK_DEPTH. Book-update rows carry exactly 10 levels."),
    }
};
