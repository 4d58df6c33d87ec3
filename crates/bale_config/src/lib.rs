//! Configuration file discovery and loading for plugins.
//!
//! Plugins look up their own configuration (`.somercrc`, `tool.config.json`,
//! a `package.json` field) relative to the asset being processed. This
//! crate provides the upward directory search, JSON/TOML parsing, and the
//! [`ConfigLoader`] boundary the asset core's config adapter delegates to.

#![warn(missing_docs)]

pub mod error;
pub mod loader;

pub use error::ConfigError;
pub use loader::{load_config, ConfigLoader, ConfigOutput, FsConfigLoader};
