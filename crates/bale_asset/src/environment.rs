//! Build environments and their deterministic hashes.

use bale_common::ContentHash;
use serde::{Deserialize, Serialize};

/// The target environment an asset is built for.
///
/// Assets compiled for different environments must never share cache
/// entries, so the environment participates in asset identity through
/// [`environment_hash`]. The bundler core treats the contents as opaque;
/// only equality (via the hash) matters here.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Environment {
    /// Execution context, e.g. `"browser"` or `"node"`.
    pub context: String,
    /// Output module format, e.g. `"esmodule"` or `"commonjs"`.
    pub output_format: String,
    /// How source is interpreted, e.g. `"module"` or `"script"`.
    pub source_type: String,
}

impl Environment {
    /// Creates an environment for the given context with default
    /// module settings.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            ..Self::default()
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            context: "browser".to_string(),
            output_format: "esmodule".to_string(),
            source_type: "module".to_string(),
        }
    }
}

/// Computes the deterministic hash of an environment.
///
/// Equal environments always produce equal hashes, across processes and
/// builds; the serialized field order is fixed by the struct definition.
pub fn environment_hash(env: &Environment) -> String {
    let canonical = format!(
        "{}:{}:{}",
        env.context, env.output_format, env.source_type
    );
    ContentHash::from_str_content(&canonical).to_string()
}
