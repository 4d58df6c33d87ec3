//! Upward configuration search and parsing.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ConfigError;

/// The result of a successful configuration lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigOutput {
    /// The parsed configuration value (or raw text when parsing was
    /// disabled).
    pub config: Value,

    /// Files read to produce this configuration, for invalidation
    /// tracking. Empty when the value came from an already-loaded
    /// manifest.
    pub files: Vec<PathBuf>,
}

/// Boundary trait for configuration lookup collaborators.
///
/// The asset core's config adapter talks to this trait; [`FsConfigLoader`]
/// is the production implementation and tests substitute their own.
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// Searches for the first of `candidates` in the directory of
    /// `search_from` and each ancestor directory, parsing it if found.
    async fn load(
        &self,
        search_from: &Path,
        candidates: &[String],
        parse: bool,
    ) -> Result<Option<ConfigOutput>, ConfigError>;

    /// Returns the nearest `package.json` contents above `search_from`,
    /// if one exists.
    async fn package(&self, search_from: &Path) -> Result<Option<Value>, ConfigError>;
}

/// Searches upward from `search_from` for the first existing candidate
/// file and loads it.
///
/// `search_from` is typically an asset's file path; the search starts in
/// its parent directory and walks toward the filesystem root. Candidates
/// are tried in order within each directory, so more specific filenames
/// should come first. Returns `Ok(None)` when no candidate exists
/// anywhere on the walk.
///
/// With `parse` set, `.json` files (and extensionless rc files) are
/// parsed as JSON and `.toml` files as TOML; otherwise the raw text is
/// returned as a string value.
pub fn load_config(
    search_from: &Path,
    candidates: &[String],
    parse: bool,
) -> Result<Option<ConfigOutput>, ConfigError> {
    let mut dir = search_from.parent();
    while let Some(current) = dir {
        for candidate in candidates {
            let path = current.join(candidate);
            if path.is_file() {
                let config = read_config_file(&path, parse)?;
                return Ok(Some(ConfigOutput {
                    config,
                    files: vec![path],
                }));
            }
        }
        dir = current.parent();
    }
    Ok(None)
}

fn read_config_file(path: &Path, parse: bool) -> Result<Value, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if !parse {
        return Ok(Value::String(text));
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => {
            let value: toml::Value = toml::from_str(&text).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            serde_json::to_value(value).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
        _ => serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Filesystem-backed [`ConfigLoader`].
#[derive(Default)]
pub struct FsConfigLoader;

impl FsConfigLoader {
    /// Creates a filesystem config loader.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConfigLoader for FsConfigLoader {
    async fn load(
        &self,
        search_from: &Path,
        candidates: &[String],
        parse: bool,
    ) -> Result<Option<ConfigOutput>, ConfigError> {
        load_config(search_from, candidates, parse)
    }

    async fn package(&self, search_from: &Path) -> Result<Option<Value>, ConfigError> {
        let found = load_config(search_from, &["package.json".to_string()], true)?;
        Ok(found.map(|out| out.config))
    }
}
