//! Error types for plugin resolution and invocation.

/// Errors surfaced at the plugin boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PluginError {
    /// No plugin is registered under the requested name.
    #[error("plugin {plugin} is not registered")]
    NotFound {
        /// The requested plugin name.
        plugin: String,
    },

    /// The plugin exists but could not be loaded or configured.
    #[error("failed to load plugin {plugin}: {reason}")]
    Load {
        /// The plugin being loaded.
        plugin: String,
        /// Description of the load failure.
        reason: String,
    },

    /// The plugin's generate capability failed.
    #[error("plugin {plugin} failed: {reason}")]
    Generate {
        /// The plugin that failed.
        plugin: String,
        /// Description of the failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = PluginError::NotFound {
            plugin: "bale-plugin-vue".to_string(),
        };
        assert!(err.to_string().contains("bale-plugin-vue"));
    }

    #[test]
    fn generate_display() {
        let err = PluginError::Generate {
            plugin: "bale-plugin-js".to_string(),
            reason: "unexpected token".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bale-plugin-js"));
        assert!(msg.contains("unexpected token"));
    }
}
