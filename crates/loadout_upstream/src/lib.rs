//! Client for the Fortnite-API.com REST API.
//!
//! The two listing calls the catalog depends on, [`UpstreamClient::fetch_cosmetics`]
//! and [`UpstreamClient::fetch_playlists`], persist every live payload that
//! parses and fall back to the last persisted one when the API is down or
//! answers with a malformed body, so a restart during an outage still has
//! data to serve. Everything else is a plain pass-through.
//!
//! # Example
//!
//! ```rust,no_run
//! use loadout_storage::FileSystemSnapshots;
//! use loadout_upstream::{UpstreamClient, UpstreamConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = UpstreamConfig::builder().api_key("secret").build()?;
//! let snapshots = Arc::new(FileSystemSnapshots::new("cache")?);
//! let client = UpstreamClient::new(config, snapshots)?;
//!
//! let fetched = client.fetch_cosmetics("en").await?;
//! println!("{} cosmetics from {}", fetched.payload().len(), fetched.source());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod params;
mod parse;

pub use client::{FetchSource, Fetched, UpstreamClient};
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS, UpstreamConfig, UpstreamConfigBuilder,
    UpstreamConfigBuilderError,
};
pub use params::{AccountType, AesKeyFormat};
pub use parse::{NewItemsFeed, parse_cosmetic, parse_cosmetics, parse_playlists};
