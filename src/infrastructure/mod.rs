//! # Infrastructure Layer
//!
//! Dictionary loading, configuration and the MarketFeed wire codec.
//!
//! - [`config`]: codec configuration from TOML, files and environment
//! - [`dictionary`]: appendix A and enum table parsing, load-once ownership
//! - [`mfeed`]: message builder, buffer and field cursor

pub mod config;
pub mod dictionary;
pub mod mfeed;
