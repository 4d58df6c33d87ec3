//! Error types for asset construction and output generation.

use std::path::PathBuf;

/// Errors raised while constructing an asset record.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Neither an explicit id nor the inputs to derive one were given.
    ///
    /// This is a configuration error in the calling pipeline and is
    /// reported immediately at construction, never deferred.
    #[error("asset for {file_path} needs an explicit id or an id base to derive one")]
    MissingIdentity {
        /// The asset's origin path, for diagnostics.
        file_path: PathBuf,
    },
}

/// Errors raised by the generate-and-cache pipeline.
///
/// All variants are fatal for the current request and propagate to every
/// caller awaiting the shared computation. None of them is memoized: a
/// later `generate_from_ast` call on the same asset re-attempts from
/// scratch, which is how transient failures (e.g. store writes) get
/// retried. The variants are `Clone` because concurrent callers share
/// one future and each receives the error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerateError {
    /// The asset has no AST to generate from.
    #[error("asset {asset_id} has no AST")]
    MissingAst {
        /// The asset's id.
        asset_id: String,
    },

    /// The asset's AST exists but could not be read back.
    #[error("failed to read AST for asset {asset_id}: {reason}")]
    AstRead {
        /// The asset's id.
        asset_id: String,
        /// Description of the read/decode failure.
        reason: String,
    },

    /// The asset does not record which plugin produced it.
    #[error("asset {asset_id} has no plugin provenance recorded")]
    MissingProvenance {
        /// The asset's id.
        asset_id: String,
    },

    /// The recorded plugin could not be loaded from the registry.
    #[error("failed to load plugin {plugin}: {reason}")]
    PluginLoad {
        /// The plugin named in the asset's provenance.
        plugin: String,
        /// Description of the load failure.
        reason: String,
    },

    /// The resolved plugin has no code-generation capability.
    #[error("plugin {plugin} does not expose a generate capability")]
    UnsupportedPlugin {
        /// The offending plugin's name.
        plugin: String,
    },

    /// The plugin's generate capability failed.
    #[error("plugin {plugin} failed to generate asset {asset_id}: {reason}")]
    Plugin {
        /// The plugin that failed.
        plugin: String,
        /// The asset being generated.
        asset_id: String,
        /// Description of the failure.
        reason: String,
    },

    /// The asset is missing the store key needed to persist output.
    ///
    /// Keys are assigned by [`Asset::commit`](crate::Asset::commit);
    /// generating an uncommitted asset hits this.
    #[error("asset {asset_id} has no {key_kind} key assigned")]
    MissingStoreKey {
        /// The asset's id.
        asset_id: String,
        /// Which key is missing (`"content"` or `"map"`).
        key_kind: &'static str,
    },

    /// Persisting generated output to the blob store failed.
    #[error("failed to persist {key} for asset {asset_id}: {reason}")]
    StoreWrite {
        /// The store key being written.
        key: String,
        /// The asset being generated.
        asset_id: String,
        /// Description of the write failure.
        reason: String,
    },

    /// Reading cached output back from the blob store failed.
    #[error("failed to read generated output under {key}: {reason}")]
    StoreRead {
        /// The store key being read.
        key: String,
        /// Description of the read failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_identity_display() {
        let err = AssetError::MissingIdentity {
            file_path: PathBuf::from("src/a.js"),
        };
        let msg = err.to_string();
        assert!(msg.contains("src/a.js"));
        assert!(msg.contains("id"));
    }

    #[test]
    fn missing_ast_display() {
        let err = GenerateError::MissingAst {
            asset_id: "abc123".to_string(),
        };
        assert_eq!(err.to_string(), "asset abc123 has no AST");
    }

    #[test]
    fn unsupported_plugin_names_plugin() {
        let err = GenerateError::UnsupportedPlugin {
            plugin: "bale-plugin-css".to_string(),
        };
        assert!(err.to_string().contains("bale-plugin-css"));
    }

    #[test]
    fn store_write_carries_context() {
        let err = GenerateError::StoreWrite {
            key: "abc.content".to_string(),
            asset_id: "abc".to_string(),
            reason: "disk full".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc.content"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn errors_are_cloneable() {
        let err = GenerateError::MissingAst {
            asset_id: "abc".to_string(),
        };
        let copy = err.clone();
        assert_eq!(err.to_string(), copy.to_string());
    }
}
