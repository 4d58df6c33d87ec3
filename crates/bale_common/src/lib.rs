//! Shared foundational types used across the Bale bundler.
//!
//! This crate provides core types including content hashing, cross-platform
//! path normalization for cache keys, and source locations for symbol
//! tracking.

#![warn(missing_docs)]

pub mod hash;
pub mod location;
pub mod path;

pub use hash::ContentHash;
pub use location::{Position, SourceLocation};
pub use path::{normalize_separators, relative_path};
