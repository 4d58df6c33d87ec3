//! Plugin resolution from recorded asset provenance.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PluginError;
use crate::TransformerPlugin;

/// A plugin resolved from the registry, with the provenance it was
/// loaded for.
#[derive(Clone)]
pub struct LoadedPlugin {
    /// The plugin instance.
    pub plugin: Arc<dyn TransformerPlugin>,
    /// The config file the plugin was named in.
    pub config_path: PathBuf,
    /// The key path within that config file.
    pub config_key_path: String,
}

impl std::fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("plugin", &self.plugin.name())
            .field("config_path", &self.config_path)
            .field("config_key_path", &self.config_key_path)
            .finish()
    }
}

/// Resolves plugins by `{name, config_path, config_key_path}` provenance.
///
/// Assets record which plugin instance produced them; the generate
/// pipeline re-resolves the same instance through this boundary when
/// output bytes are needed. Implementations may load from disk, a
/// package manager, or (as [`StaticRegistry`] does) a fixed set.
#[async_trait]
pub trait PluginRegistry: Send + Sync {
    /// Loads the plugin registered under `name` for the given provenance.
    async fn load(
        &self,
        name: &str,
        config_path: &Path,
        config_key_path: &str,
    ) -> Result<LoadedPlugin, PluginError>;
}

/// A registry over a fixed, pre-instantiated set of plugins.
///
/// Suitable for embedding and tests; dynamic discovery/installation
/// lives outside this crate.
#[derive(Default)]
pub struct StaticRegistry {
    plugins: HashMap<String, Arc<dyn TransformerPlugin>>,
}

impl StaticRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin under its own name, replacing any previous
    /// registration.
    pub fn register(&mut self, plugin: Arc<dyn TransformerPlugin>) {
        self.plugins.insert(plugin.name().to_string(), plugin);
    }
}

#[async_trait]
impl PluginRegistry for StaticRegistry {
    async fn load(
        &self,
        name: &str,
        config_path: &Path,
        config_key_path: &str,
    ) -> Result<LoadedPlugin, PluginError> {
        let plugin = self
            .plugins
            .get(name)
            .cloned()
            .ok_or_else(|| PluginError::NotFound {
                plugin: name.to_string(),
            })?;
        Ok(LoadedPlugin {
            plugin,
            config_path: config_path.to_path_buf(),
            config_key_path: config_key_path.to_string(),
        })
    }
}
