//! Coindash Library
//!
//! Market data fetching, caching and the filter/search/sort pipeline, shared by the
//! terminal dashboard and the HTTP endpoint.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod refresh;
pub mod server;
pub mod ui;
