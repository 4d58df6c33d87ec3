//! The serialized AST exchanged between transform and generate phases.

use serde::{Deserialize, Serialize};

/// Identifies which plugin, at which version, produced an AST.
///
/// Recorded on the asset so the matching codegen implementation can be
/// picked later; an AST produced by one plugin version is not assumed
/// readable by another.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AstGenerator {
    /// The AST flavor (usually the plugin name or syntax family).
    pub kind: String,
    /// The producing plugin's version.
    pub version: String,
}

impl AstGenerator {
    /// Creates a generator tag.
    pub fn new(kind: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            version: version.into(),
        }
    }
}

/// A parsed intermediate representation of an asset's content.
///
/// The program payload is opaque to the core; only the producing plugin
/// interprets it. ASTs are persisted to the blob store under the asset's
/// AST key as serialized JSON.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Ast {
    /// Provenance of this AST.
    pub generator: AstGenerator,
    /// The plugin-defined program representation.
    pub program: serde_json::Value,
}

impl Ast {
    /// Creates an AST with the given provenance and program payload.
    pub fn new(generator: AstGenerator, program: serde_json::Value) -> Self {
        Self { generator, program }
    }
}
