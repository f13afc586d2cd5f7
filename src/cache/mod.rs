//! Cache module for memoizing upstream asset fetches
//!
//! This module provides an in-process cache that serves the last fetched asset
//! list for a configured freshness window. Time comes from an injectable clock,
//! so expiry can be driven explicitly in tests.

mod clock;
mod manager;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{AssetCache, CachedData};
