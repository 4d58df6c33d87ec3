//! Per-asset configuration lookup.
//!
//! Plugins ask for configuration relative to the asset they are
//! processing. The lookup first consults the project manifest when a
//! package key is given, then falls back to an upward file search from
//! the asset's path.

use bale_config::{ConfigError, ConfigLoader, ConfigOutput};

use crate::asset::Asset;

/// Options for [`get_config`].
#[derive(Default)]
pub struct GetConfigOptions {
    /// A key in the nearest `package.json` to check before searching for
    /// config files. Many tools accept configuration either way; the
    /// manifest entry wins when present.
    pub package_key: Option<String>,
    /// Whether to parse the found file. Defaults to parsing; pass
    /// `Some(false)` for formats the caller interprets itself.
    pub parse: Option<bool>,
}

/// Looks up configuration for an asset.
///
/// When `package_key` names an entry present in the nearest
/// `package.json`, that entry is returned directly with no file list:
/// the manifest is already tracked for invalidation by the pipeline, so
/// re-reporting it here would double-count. Otherwise `candidates` are
/// searched upward from the asset's directory, nearest directory first,
/// in the given order within each directory. `Ok(None)` means no
/// configuration exists in either place.
pub async fn get_config(
    loader: &dyn ConfigLoader,
    asset: &Asset,
    candidates: &[String],
    options: GetConfigOptions,
) -> Result<Option<ConfigOutput>, ConfigError> {
    if let Some(package_key) = &options.package_key {
        if let Some(package) = loader.package(&asset.file_path).await? {
            if let Some(entry) = package.get(package_key) {
                tracing::debug!(
                    asset = %asset.id,
                    key = %package_key,
                    "config resolved from package manifest"
                );
                return Ok(Some(ConfigOutput {
                    config: entry.clone(),
                    files: Vec::new(),
                }));
            }
        }
    }

    loader
        .load(&asset.file_path, candidates, options.parse.unwrap_or(true))
        .await
}
