//! The asset record and its identity derivation.
//!
//! An asset is one compiled unit of source content flowing through the
//! pipeline. Its `id` is the contract the entire incremental-build cache
//! depends on: identical inputs must reproduce the same id byte-for-byte
//! across builds and operating systems, and changing any
//! identity-relevant input must change it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use bale_common::{relative_path, ContentHash};
use bale_plugin::AstGenerator;
use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;
use crate::environment::{environment_hash, Environment};
use crate::error::AssetError;
use crate::symbols::{AssetSymbol, AssetSymbols, MutableAssetSymbols};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(0);

/// A process-unique identity token for one asset record instance.
///
/// The generate cache is keyed by token rather than by id string, so two
/// distinct in-memory records that happen to share an `id` are not
/// conflated within a process. Cloning an asset copies its token: the
/// clone refers to the same cache identity as the original.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AssetToken(u64);

impl AssetToken {
    fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw token value.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// Size and timing metrics recorded per asset.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct AssetStats {
    /// Output size in bytes.
    pub size: u64,
    /// Transform time in milliseconds.
    pub time_ms: u64,
}

/// Metadata for a file whose content this asset depends on, used for
/// build invalidation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IncludedFile {
    /// Content hash of the file at the time it was read.
    pub hash: ContentHash,
}

/// Inputs to [`generate_id_base`].
pub struct IdBaseInputs<'a> {
    /// Whether the asset was constructed from in-memory code rather
    /// than an on-disk file.
    pub raw_code: bool,
    /// Caller-supplied disambiguator for virtual assets.
    pub unique_key: Option<&'a str>,
    /// The asset's origin path.
    pub file_path: &'a Path,
    /// Hash of the asset's content, rendered as hex.
    pub content_hash: &'a str,
    /// Whether the asset is project source (as opposed to generated or
    /// vendored content).
    pub is_source: bool,
    /// The project root all path-derived identities are relative to.
    pub project_root: &'a Path,
}

/// Derives the pre-hash identity base string for an asset.
///
/// The fallback order is part of the cache format and must stay stable:
/// - in-memory code is keyed purely by content hash, since no path
///   distinguishes it;
/// - a `unique_key` keys source assets by itself (stable across content
///   edits) and folds the content hash in for non-source assets so
///   regenerated content gets a fresh identity;
/// - otherwise the project-root-relative path, separators normalized,
///   keys the asset identically on every OS.
pub fn generate_id_base(inputs: &IdBaseInputs<'_>) -> String {
    if inputs.raw_code {
        return inputs.content_hash.to_string();
    }
    match inputs.unique_key {
        Some(unique_key) if inputs.is_source => format!("{unique_key}:"),
        Some(unique_key) => format!("{unique_key}:{}", inputs.content_hash),
        None => relative_path(inputs.project_root, inputs.file_path),
    }
}

/// Initial export-symbol state for [`create_asset`].
///
/// Most construction sites build assets after export analysis has run,
/// so the default is analyzed-with-no-exports; an asset whose exports
/// are genuinely unknown must say so explicitly with
/// [`SymbolsInit::Unanalyzed`]. The two states read differently
/// downstream: an unanalyzed asset is treated as opaque, an empty one
/// as exporting nothing.
#[derive(Clone, Debug)]
pub enum SymbolsInit {
    /// Export analysis produced the given mapping (possibly empty).
    Analyzed(BTreeMap<String, AssetSymbol>),
    /// Export analysis has not run; exports are unknown.
    Unanalyzed,
}

impl Default for SymbolsInit {
    fn default() -> Self {
        Self::Analyzed(BTreeMap::new())
    }
}

/// Construction inputs for [`create_asset`].
///
/// Exactly one of `id` and `id_base` must be supplied; everything else
/// defaults. Defaults follow the analysis pipeline's expectations:
/// `side_effects` is assumed `true` until analysis proves otherwise, and
/// `symbols` defaults to analyzed-and-empty (see [`SymbolsInit`]).
#[derive(Default)]
pub struct AssetOptions {
    /// Explicit asset id; skips derivation entirely.
    pub id: Option<String>,
    /// Pre-hash identity base, usually from [`generate_id_base`].
    pub id_base: Option<String>,
    /// Origin file path.
    pub file_path: PathBuf,
    /// Parsed query parameters from the origin specifier.
    pub query: BTreeMap<String, String>,
    /// Logical content type, e.g. `"js"` or `"css"`. Part of identity.
    pub kind: String,
    /// Hash of the asset's current content.
    pub content_hash: Option<ContentHash>,
    /// Blob-store key for generated content.
    pub content_key: Option<String>,
    /// Blob-store key for the source map.
    pub map_key: Option<String>,
    /// Blob-store key for the serialized AST.
    pub ast_key: Option<String>,
    /// Which plugin/version produced the AST.
    pub ast_generator: Option<AstGenerator>,
    /// Dependency edges keyed by dependency id.
    pub dependencies: BTreeMap<String, Dependency>,
    /// Files whose content this asset depends on.
    pub included_files: BTreeMap<PathBuf, IncludedFile>,
    /// Whether the asset must be placed in an isolated bundle.
    pub is_isolated: bool,
    /// Whether the asset is inlined into its parent.
    pub is_inline: bool,
    /// Whether the asset may be split across bundles; `None` is unknown.
    pub is_splittable: Option<bool>,
    /// Whether the asset is project source.
    pub is_source: bool,
    /// The environment the asset is built for. Part of identity.
    pub env: Environment,
    /// Free-form plugin annotations.
    pub meta: serde_json::Map<String, serde_json::Value>,
    /// Named processing pipeline. Part of identity.
    pub pipeline: Option<String>,
    /// Size/time metrics.
    pub stats: AssetStats,
    /// Initial exported-symbol state; defaults to analyzed-and-empty.
    pub symbols: SymbolsInit,
    /// Whether evaluating the asset may have side effects. Defaults to
    /// `true` when unset.
    pub side_effects: Option<bool>,
    /// Caller-supplied disambiguator for virtual assets. Part of
    /// identity; defaults to the empty string.
    pub unique_key: Option<String>,
    /// Hash of the generated output, recorded after packaging.
    pub output_hash: Option<String>,
    /// Name of the plugin that produced this asset.
    pub plugin: Option<String>,
    /// Config file the producing plugin was named in.
    pub config_path: Option<PathBuf>,
    /// Key path within that config file.
    pub config_key_path: Option<String>,
    /// Whether the asset's content has been committed to the store.
    pub committed: bool,
}

/// One compiled unit of source content.
///
/// Identity-relevant fields (`id`, `kind`, `env`, `unique_key`,
/// `pipeline`) are fixed at construction. The symbol and meta mappings
/// are mutated during the analysis phase, through the views returned by
/// [`Asset::symbols_view`] and [`Asset::symbols_view_mut`].
#[derive(Clone, Debug)]
pub struct Asset {
    /// Stable identity; see [`create_asset`] for derivation.
    pub id: String,
    token: AssetToken,
    /// Origin file path.
    pub file_path: PathBuf,
    /// Parsed query parameters from the origin specifier.
    pub query: BTreeMap<String, String>,
    /// Logical content type.
    pub kind: String,
    /// Hash of the asset's current content.
    pub content_hash: Option<ContentHash>,
    /// Blob-store key for generated content.
    pub content_key: Option<String>,
    /// Blob-store key for the source map.
    pub map_key: Option<String>,
    /// Blob-store key for the serialized AST.
    pub ast_key: Option<String>,
    /// Which plugin/version produced the AST.
    pub ast_generator: Option<AstGenerator>,
    /// Dependency edges keyed by dependency id.
    pub dependencies: BTreeMap<String, Dependency>,
    /// Files whose content this asset depends on.
    pub included_files: BTreeMap<PathBuf, IncludedFile>,
    /// Whether the asset must be placed in an isolated bundle.
    pub is_isolated: bool,
    /// Whether the asset is inlined into its parent.
    pub is_inline: bool,
    /// Whether the asset may be split across bundles; `None` is unknown.
    pub is_splittable: Option<bool>,
    /// Whether the asset is project source.
    pub is_source: bool,
    /// The environment the asset is built for.
    pub env: Environment,
    /// Free-form plugin annotations.
    pub meta: serde_json::Map<String, serde_json::Value>,
    /// Named processing pipeline.
    pub pipeline: Option<String>,
    /// Size/time metrics.
    pub stats: AssetStats,
    /// Exported symbols; `None` means analysis has not run.
    pub symbols: Option<BTreeMap<String, AssetSymbol>>,
    /// Whether evaluating the asset may have side effects.
    pub side_effects: bool,
    /// Disambiguator for virtual assets; empty when unused.
    pub unique_key: String,
    /// Hash of the generated output, recorded after packaging.
    pub output_hash: Option<String>,
    /// Name of the plugin that produced this asset.
    pub plugin: Option<String>,
    /// Config file the producing plugin was named in.
    pub config_path: Option<PathBuf>,
    /// Key path within that config file.
    pub config_key_path: Option<String>,
    /// Whether the asset's content has been committed to the store.
    pub committed: bool,
}

/// Builds an asset record, deriving its id when not supplied.
///
/// The derived id hashes, `:`-separated, the id base, content type,
/// environment hash, unique key, and pipeline. Each component exists to
/// prevent a class of cache collision: the type separates same-path
/// virtual variants, the environment separates per-target builds, and
/// the pipeline separates named transforms over one file.
///
/// Fails with [`AssetError::MissingIdentity`] when neither `id` nor
/// `id_base` is given.
pub fn create_asset(options: AssetOptions) -> Result<Asset, AssetError> {
    let unique_key = options.unique_key.unwrap_or_default();
    let id = match (options.id, options.id_base) {
        (Some(id), _) => id,
        (None, Some(id_base)) => {
            let env_hash = environment_hash(&options.env);
            let pipeline = options.pipeline.as_deref().unwrap_or("");
            ContentHash::from_str_content(&format!(
                "{id_base}:{kind}:{env_hash}:{unique_key}:{pipeline}",
                kind = options.kind,
            ))
            .to_string()
        }
        (None, None) => {
            return Err(AssetError::MissingIdentity {
                file_path: options.file_path,
            });
        }
    };

    Ok(Asset {
        id,
        token: AssetToken::next(),
        file_path: options.file_path,
        query: options.query,
        kind: options.kind,
        content_hash: options.content_hash,
        content_key: options.content_key,
        map_key: options.map_key,
        ast_key: options.ast_key,
        ast_generator: options.ast_generator,
        dependencies: options.dependencies,
        included_files: options.included_files,
        is_isolated: options.is_isolated,
        is_inline: options.is_inline,
        is_splittable: options.is_splittable,
        is_source: options.is_source,
        env: options.env,
        meta: options.meta,
        pipeline: options.pipeline,
        stats: options.stats,
        symbols: match options.symbols {
            SymbolsInit::Analyzed(map) => Some(map),
            SymbolsInit::Unanalyzed => None,
        },
        side_effects: options.side_effects.unwrap_or(true),
        unique_key,
        output_hash: options.output_hash,
        plugin: options.plugin,
        config_path: options.config_path,
        config_key_path: options.config_key_path,
        committed: options.committed,
    })
}

impl Asset {
    /// The process-unique identity token of this record.
    pub fn token(&self) -> AssetToken {
        self.token
    }

    /// Assigns the blob-store keys for this asset's generated output and
    /// marks the record committed.
    ///
    /// The AST key is only assigned when an AST generator is recorded,
    /// since without one there is no AST to persist.
    pub fn commit(&mut self) {
        self.content_key = Some(format!("{}.content", self.id));
        self.map_key = Some(format!("{}.map", self.id));
        if self.ast_generator.is_some() {
            self.ast_key = Some(format!("{}.ast", self.id));
        }
        self.committed = true;
    }

    /// Records a file this asset's output depends on, hashing its
    /// content for later invalidation checks.
    pub fn include_file(&mut self, path: impl Into<PathBuf>, content: &[u8]) {
        self.included_files.insert(
            path.into(),
            IncludedFile {
                hash: ContentHash::from_bytes(content),
            },
        );
    }

    /// Returns a read-only view over this asset's exported symbols.
    pub fn symbols_view(&self) -> AssetSymbols<'_> {
        AssetSymbols::new(self)
    }

    /// Returns a mutable view over this asset's exported symbols.
    pub fn symbols_view_mut(&mut self) -> MutableAssetSymbols<'_> {
        MutableAssetSymbols::new(self)
    }
}
