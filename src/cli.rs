//! Command-line interface parsing for Coindash
//!
//! This module handles parsing of CLI arguments using clap. Each setting falls back
//! to a `COINDASH_*` environment variable and then to the built-in default.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::{
    ConfigError, DashboardConfig, DEFAULT_FETCH_LIMIT, DEFAULT_FRESHNESS_WINDOW_SECS,
    DEFAULT_TOP_CAP,
};
use crate::data::coincap::COINCAP_ASSETS_URL;
use crate::data::{SelectionMode, DEFAULT_TRACKED_IDS};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// Arguments parsed but describe an invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Coindash - Live crypto prices with search and manual refresh
#[derive(Parser, Debug)]
#[command(name = "coindash")]
#[command(about = "Crypto price dashboard and JSON endpoint backed by a cached market-data feed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Seconds a fetched asset list is served before refetching
    #[arg(long, env = "COINDASH_FRESHNESS_WINDOW", default_value_t = DEFAULT_FRESHNESS_WINDOW_SECS, global = true)]
    pub freshness_window: u64,

    /// Number of assets requested from the provider
    #[arg(long, env = "COINDASH_FETCH_LIMIT", default_value_t = DEFAULT_FETCH_LIMIT, global = true)]
    pub fetch_limit: u32,

    /// Comma-separated asset ids shown in allow-list mode
    #[arg(
        long,
        env = "COINDASH_TRACKED_IDS",
        value_delimiter = ',',
        default_values_t = DEFAULT_TRACKED_IDS.map(String::from),
        global = true
    )]
    pub tracked_ids: Vec<String>,

    /// Market-data assets endpoint
    #[arg(long, env = "COINDASH_UPSTREAM_URL", default_value = COINCAP_ASSETS_URL, global = true)]
    pub upstream_url: String,

    /// Which assets to show
    #[arg(long, value_enum, env = "COINDASH_MODE", default_value_t = ModeArg::AllowList, global = true)]
    pub mode: ModeArg,

    /// In top-ranked mode, how many assets to show with no search query
    #[arg(long, env = "COINDASH_TOP_CAP", default_value_t = DEFAULT_TOP_CAP, global = true)]
    pub top_cap: usize,

    /// Hide previous data when a refresh fails
    #[arg(long, env = "COINDASH_CLEAR_ON_ERROR", global = true)]
    pub clear_on_error: bool,
}

/// Run modes
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive terminal dashboard (default)
    Tui,
    /// Serve the cached asset list as JSON over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "COINDASH_BIND", default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },
}

/// Selection mode as spelled on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Only the tracked ids
    AllowList,
    /// Any asset; top ranked when not searching
    TopRanked,
}

impl Cli {
    /// The requested command, defaulting to the terminal dashboard
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Tui)
    }

    /// Builds and validates the runtime configuration
    ///
    /// # Returns
    /// * `Ok(DashboardConfig)` with defaults filled in
    /// * `Err(CliError)` if the combination of values is invalid
    pub fn to_config(&self) -> Result<DashboardConfig, CliError> {
        let mut config = DashboardConfig {
            freshness_window_secs: self.freshness_window,
            tracked_ids: self.tracked_ids.clone(),
            fetch_limit: self.fetch_limit,
            upstream_url: self.upstream_url.clone(),
            selection: match self.mode {
                ModeArg::AllowList => SelectionMode::AllowList,
                ModeArg::TopRanked => SelectionMode::TopRanked { cap: self.top_cap },
            },
            keep_data_on_error: !self.clear_on_error,
            ..Default::default()
        };
        if let Command::Serve { bind } = self.command() {
            config.bind_addr = bind;
        }
        Ok(config.validate()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args_defaults_to_tui() {
        let cli = Cli::parse_from(["coindash"]);
        assert_eq!(cli.command(), Command::Tui);
    }

    #[test]
    fn test_cli_parse_serve_with_bind() {
        let cli = Cli::parse_from(["coindash", "serve", "--bind", "0.0.0.0:9000"]);
        let config = cli.to_config().unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000".parse().unwrap());
    }

    #[test]
    fn test_default_config_from_cli() {
        let cli = Cli::parse_from(["coindash"]);
        let config = cli.to_config().unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_tracked_ids_comma_separated() {
        let cli = Cli::parse_from(["coindash", "--tracked-ids", "Bitcoin,monero"]);
        let config = cli.to_config().unwrap();
        assert_eq!(config.tracked_ids, vec!["bitcoin", "monero"]);
    }

    #[test]
    fn test_top_ranked_mode() {
        let cli = Cli::parse_from(["coindash", "--mode", "top-ranked", "--top-cap", "10"]);
        let config = cli.to_config().unwrap();
        assert_eq!(config.selection, SelectionMode::TopRanked { cap: 10 });
    }

    #[test]
    fn test_clear_on_error_flag() {
        let cli = Cli::parse_from(["coindash", "--clear-on-error"]);
        assert!(!cli.to_config().unwrap().keep_data_on_error);
    }

    #[test]
    fn test_invalid_window_is_rejected() {
        let cli = Cli::parse_from(["coindash", "--freshness-window", "0"]);
        let err = cli.to_config().unwrap_err();
        assert!(err.to_string().contains("Freshness window"));
    }

    #[test]
    fn test_unknown_mode_fails_to_parse() {
        let result = Cli::try_parse_from(["coindash", "--mode", "everything"]);
        assert!(result.is_err());
    }
}
