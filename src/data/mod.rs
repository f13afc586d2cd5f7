//! Core data models for Coindash
//!
//! This module contains the asset record returned by the market-data provider,
//! the upstream client, the filter/search/sort pipeline, and display formatting.

pub mod coincap;
pub mod format;
pub mod pipeline;

pub use coincap::{AssetSource, CoinCapClient, FetchError};
pub use pipeline::{build_view, matches_query, order_by_rank, select_tracked, SelectionMode, ViewOptions};

use serde::{Deserialize, Serialize};

/// Identifiers of the assets shown by default
pub const DEFAULT_TRACKED_IDS: [&str; 5] = ["bitcoin", "ethereum", "cardano", "dogecoin", "solana"];

/// A market snapshot for a single asset, as served by the provider
///
/// Numeric fields stay in their wire encoding (decimal strings). Use the typed
/// accessors to read them; malformed values come back as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Lowercase identifier, unique within a response
    pub id: String,
    /// Ticker, e.g. "BTC"
    pub symbol: String,
    /// Display name
    pub name: String,
    /// Price in USD
    pub price_usd: String,
    /// Percent change over the last 24 hours
    pub change_percent_24_hr: String,
    /// Market capitalisation in USD
    pub market_cap_usd: String,
    /// Position in the provider's ranking, 1 is largest
    pub rank: String,
}

impl AssetRecord {
    pub fn price(&self) -> Option<f64> {
        parse_decimal(&self.price_usd)
    }

    pub fn change_percent(&self) -> Option<f64> {
        parse_decimal(&self.change_percent_24_hr)
    }

    pub fn market_cap(&self) -> Option<f64> {
        parse_decimal(&self.market_cap_usd)
    }

    /// Parses the rank as a positive integer
    pub fn rank_number(&self) -> Option<u32> {
        self.rank.trim().parse::<u32>().ok().filter(|rank| *rank > 0)
    }

    /// Names of numeric fields that fail to parse
    pub fn malformed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.price().is_none() {
            fields.push("priceUsd");
        }
        if self.change_percent().is_none() {
            fields.push("changePercent24Hr");
        }
        if self.market_cap().is_none() {
            fields.push("marketCapUsd");
        }
        if self.rank_number().is_none() {
            fields.push("rank");
        }
        fields
    }
}

/// Parses a finite decimal number, rejecting NaN and infinities
fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
pub(crate) fn sample_record(id: &str, symbol: &str, name: &str, rank: &str) -> AssetRecord {
    AssetRecord {
        id: id.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        price_usd: "100.5".to_string(),
        change_percent_24_hr: "-1.25".to_string(),
        market_cap_usd: "1000000".to_string(),
        rank: rank.to_string(),
    }
}
