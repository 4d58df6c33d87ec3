//! Asset identity, symbol propagation, and generated-output caching.
//!
//! This crate is the per-asset core of the Bale bundler. It derives
//! stable, collision-resistant asset ids so identical inputs map to
//! identical cache entries across builds; tracks exported/imported
//! symbol bindings (with weak-symbol merge semantics for tree-shaking)
//! on assets and dependency edges; and memoizes the expensive
//! render-AST-to-bytes step so it runs at most once per asset per
//! process, persisting results through the blob store.
//!
//! The asset *graph* (how assets link into bundles) lives elsewhere;
//! this crate only defines the per-asset records and the operations
//! bound to them.

#![warn(missing_docs)]

pub mod asset;
pub mod config;
pub mod dependency;
pub mod environment;
pub mod error;
pub mod generate;
pub mod symbols;

pub use asset::{
    create_asset, generate_id_base, Asset, AssetOptions, AssetStats, AssetToken, IdBaseInputs,
    IncludedFile, SymbolsInit,
};
pub use config::{get_config, GetConfigOptions};
pub use dependency::Dependency;
pub use environment::{environment_hash, Environment};
pub use error::{AssetError, GenerateError};
pub use generate::{GenerateCache, GeneratedOutput};
pub use symbols::{
    AssetSymbol, AssetSymbols, DependencySymbol, MutableAssetSymbols, MutableDependencySymbols,
};
