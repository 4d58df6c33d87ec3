//! The plugin boundary of the Bale bundler.
//!
//! Transformer plugins parse assets into ASTs and render them back to
//! output bytes. This crate defines the [`TransformerPlugin`] trait with
//! its optional code-generation capability, the AST and generated-output
//! models exchanged across the boundary, the [`PluginRegistry`] used to
//! resolve a plugin from recorded asset provenance, and the
//! plugin-scoped [`PluginLogger`].

#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod logger;
pub mod output;
pub mod registry;

use std::path::{Path, PathBuf};

use futures::future::BoxFuture;

pub use ast::{Ast, AstGenerator};
pub use error::PluginError;
pub use logger::PluginLogger;
pub use output::{GeneratedCode, SourceMap};
pub use registry::{LoadedPlugin, PluginRegistry, StaticRegistry};

/// Host-level options plugins may consult during code generation.
#[derive(Clone, Debug)]
pub struct PluginOptions {
    /// The project root relative paths resolve against.
    pub project_root: PathBuf,
    /// Build mode, e.g. `"development"` or `"production"`.
    pub mode: String,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            project_root: PathBuf::new(),
            mode: "development".to_string(),
        }
    }
}

/// Everything a plugin's generate capability receives for one asset.
pub struct GenerateRequest<'a> {
    /// The asset's stable identity.
    pub asset_id: &'a str,
    /// The asset's origin file path.
    pub file_path: &'a Path,
    /// The asset's logical content type (e.g. `"js"`).
    pub kind: &'a str,
    /// The parsed intermediate representation to render.
    pub ast: &'a Ast,
    /// Host-level options for this build.
    pub options: &'a PluginOptions,
    /// A logger scoped to this plugin's name.
    pub logger: &'a PluginLogger,
}

/// A transformer plugin instance.
///
/// Code generation is an optional capability: plugins that only analyze
/// or rewrite ASTs leave [`TransformerPlugin::generate`] at its default,
/// which advertises the capability as absent by returning `None`.
pub trait TransformerPlugin: Send + Sync {
    /// The plugin's package name, used in provenance and diagnostics.
    fn name(&self) -> &str;

    /// Renders an AST back to output bytes and an optional source map.
    ///
    /// Returns `None` if this plugin has no generate capability; the
    /// caller reports that as a fatal error naming the plugin.
    fn generate<'a>(
        &'a self,
        request: GenerateRequest<'a>,
    ) -> Option<BoxFuture<'a, Result<GeneratedCode, PluginError>>> {
        let _ = request;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bale_store::Blob;
    use futures::FutureExt;

    struct AnalyzeOnly;

    impl TransformerPlugin for AnalyzeOnly {
        fn name(&self) -> &str {
            "bale-plugin-analyze"
        }
    }

    struct Codegen;

    impl TransformerPlugin for Codegen {
        fn name(&self) -> &str {
            "bale-plugin-js"
        }

        fn generate<'a>(
            &'a self,
            request: GenerateRequest<'a>,
        ) -> Option<BoxFuture<'a, Result<GeneratedCode, PluginError>>> {
            let rendered = format!("// {}\n", request.asset_id);
            Some(
                async move {
                    Ok(GeneratedCode {
                        content: Blob::from_bytes(rendered),
                        map: None,
                    })
                }
                .boxed(),
            )
        }
    }

    fn request<'a>(
        ast: &'a Ast,
        options: &'a PluginOptions,
        logger: &'a PluginLogger,
    ) -> GenerateRequest<'a> {
        GenerateRequest {
            asset_id: "abc123",
            file_path: Path::new("src/a.js"),
            kind: "js",
            ast,
            options,
            logger,
        }
    }

    #[test]
    fn default_generate_is_absent() {
        let ast = Ast::new(AstGenerator::new("js", "1.0.0"), serde_json::json!({}));
        let options = PluginOptions::default();
        let logger = PluginLogger::new("bale-plugin-analyze");
        assert!(AnalyzeOnly.generate(request(&ast, &options, &logger)).is_none());
    }

    #[tokio::test]
    async fn capable_plugin_generates() {
        let ast = Ast::new(AstGenerator::new("js", "1.0.0"), serde_json::json!({}));
        let options = PluginOptions::default();
        let logger = PluginLogger::new("bale-plugin-js");
        let fut = Codegen.generate(request(&ast, &options, &logger)).unwrap();
        let code = fut.await.unwrap();
        assert_eq!(code.content.into_bytes().await.unwrap(), "// abc123\n");
    }

    #[test]
    fn default_options_are_development() {
        let options = PluginOptions::default();
        assert_eq!(options.mode, "development");
        assert_eq!(options.project_root, PathBuf::new());
    }
}
