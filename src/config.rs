//! Runtime configuration for Coindash
//!
//! Holds the values both the dashboard and the HTTP endpoint are built from.
//! Defaults match the public CoinCap setup; every field can be overridden from
//! the command line or `COINDASH_*` environment variables (see `cli`).

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

use crate::cache::AssetCache;
use crate::data::coincap::COINCAP_ASSETS_URL;
use crate::data::{CoinCapClient, SelectionMode, ViewOptions, DEFAULT_TRACKED_IDS};

/// How long a fetched list is served before refetching
pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 60;

/// Number of assets requested from the provider
pub const DEFAULT_FETCH_LIMIT: u32 = 100;

/// Largest `limit` the provider accepts
pub const MAX_FETCH_LIMIT: u32 = 2000;

/// Assets shown without a query in top-ranked mode
pub const DEFAULT_TOP_CAP: usize = 5;

/// Errors found while validating configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Freshness window must be greater than zero")]
    ZeroFreshnessWindow,

    #[error("Fetch limit must be between 1 and 2000, got {0}")]
    FetchLimitOutOfRange(u32),

    #[error("At least one tracked asset id is required")]
    NoTrackedIds,

    #[error("Top-ranked cap must be greater than zero")]
    ZeroTopCap,
}

/// Complete configuration for a Coindash process
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub freshness_window_secs: u64,
    /// Lowercased asset ids shown in allow-list mode
    pub tracked_ids: Vec<String>,
    pub fetch_limit: u32,
    pub upstream_url: String,
    /// Address the HTTP endpoint binds to
    pub bind_addr: SocketAddr,
    pub selection: SelectionMode,
    /// Keep showing the last good data next to an error banner
    pub keep_data_on_error: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
            tracked_ids: DEFAULT_TRACKED_IDS.iter().map(|id| id.to_string()).collect(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            upstream_url: COINCAP_ASSETS_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            selection: SelectionMode::AllowList,
            keep_data_on_error: true,
        }
    }
}

impl DashboardConfig {
    /// Checks ranges and normalises tracked ids to lowercase
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.freshness_window_secs == 0 {
            return Err(ConfigError::ZeroFreshnessWindow);
        }
        if !(1..=MAX_FETCH_LIMIT).contains(&self.fetch_limit) {
            return Err(ConfigError::FetchLimitOutOfRange(self.fetch_limit));
        }
        if let SelectionMode::TopRanked { cap: 0 } = self.selection {
            return Err(ConfigError::ZeroTopCap);
        }

        let mut seen = HashSet::new();
        self.tracked_ids = self
            .tracked_ids
            .iter()
            .map(|id| id.trim().to_lowercase())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();
        if self.tracked_ids.is_empty() {
            return Err(ConfigError::NoTrackedIds);
        }

        Ok(self)
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions::new(&self.tracked_ids, self.selection)
    }

    /// Builds a wall-clock cache over the configured CoinCap endpoint
    pub fn build_cache(&self) -> AssetCache {
        let client = CoinCapClient::with_base_url(self.upstream_url.clone());
        AssetCache::new(
            Arc::new(client),
            self.freshness_window_secs,
            self.fetch_limit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_fixed_constants() {
        let config = DashboardConfig::default();
        assert_eq!(config.freshness_window_secs, 60);
        assert_eq!(config.fetch_limit, 100);
        assert_eq!(
            config.tracked_ids,
            vec!["bitcoin", "ethereum", "cardano", "dogecoin", "solana"]
        );
        assert_eq!(config.selection, SelectionMode::AllowList);
        assert!(config.keep_data_on_error);
    }

    #[test]
    fn test_default_is_valid() {
        let config = DashboardConfig::default();
        assert_eq!(config.clone().validate(), Ok(config));
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = DashboardConfig {
            freshness_window_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFreshnessWindow));
    }

    #[test]
    fn test_validate_rejects_fetch_limit_out_of_range() {
        for limit in [0, MAX_FETCH_LIMIT + 1] {
            let config = DashboardConfig {
                fetch_limit: limit,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::FetchLimitOutOfRange(limit)));
        }
    }

    #[test]
    fn test_validate_normalises_tracked_ids() {
        let config = DashboardConfig {
            tracked_ids: vec![
                " Bitcoin ".to_string(),
                "".to_string(),
                "SOLANA".to_string(),
                "bitcoin".to_string(),
            ],
            ..Default::default()
        };
        let config = config.validate().unwrap();
        assert_eq!(config.tracked_ids, vec!["bitcoin", "solana"]);
    }

    #[test]
    fn test_validate_rejects_empty_tracked_ids() {
        let config = DashboardConfig {
            tracked_ids: vec!["  ".to_string()],
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoTrackedIds));
    }

    #[test]
    fn test_validate_rejects_zero_top_cap() {
        let config = DashboardConfig {
            selection: SelectionMode::TopRanked { cap: 0 },
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTopCap));
    }

    #[test]
    fn test_view_options_follow_config() {
        let options = DashboardConfig::default().view_options();
        assert_eq!(options.tracked_ids.len(), 5);
        assert!(options.tracked_ids.contains("cardano"));
    }
}
