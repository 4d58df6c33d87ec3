//! Single-flight memoization of "render AST to output bytes".
//!
//! Code generation is the most expensive per-asset step, so it runs at
//! most once per asset record per process: concurrent callers for the
//! same record share one in-flight future, one plugin invocation, and
//! one pair of blob-store writes. Results stay cached for the process
//! lifetime; failures are evicted so the next request retries.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bale_store::{Blob, BlobStore, StoreError};
use bale_plugin::{
    Ast, GenerateRequest, GeneratedCode, PluginLogger, PluginOptions, PluginRegistry, SourceMap,
};
use bytes::Bytes;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;

use crate::asset::{Asset, AssetToken};
use crate::error::GenerateError;

/// Generated output handed to callers: content plus optional source map.
#[derive(Debug)]
pub struct GeneratedOutput {
    /// The rendered output. When the plugin produced a stream, this is
    /// a fresh read handle from the blob store, so every caller can
    /// consume it independently.
    pub content: Blob,
    /// The source map, as the plugin returned it.
    pub map: Option<SourceMap>,
}

/// The resolved value cached per asset token.
///
/// Streamed plugin output is not replayable, so the cache records where
/// it was persisted instead and each consumer gets a fresh store handle.
#[derive(Clone)]
enum CachedContent {
    Materialized(Bytes),
    InStore { content_key: String },
}

#[derive(Clone)]
struct CachedOutput {
    content: CachedContent,
    map: Option<SourceMap>,
}

type SharedGenerate = Shared<BoxFuture<'static, Result<CachedOutput, GenerateError>>>;

/// Process-lifetime cache of generate results, keyed by asset token.
///
/// The token map is the only shared mutable state here. Entries for
/// assets that have left their owning scope are reclaimed explicitly
/// through [`GenerateCache::forget`]; nothing is evicted implicitly.
pub struct GenerateCache {
    store: Arc<dyn BlobStore>,
    registry: Arc<dyn PluginRegistry>,
    options: PluginOptions,
    inflight: Mutex<HashMap<AssetToken, SharedGenerate>>,
}

impl GenerateCache {
    /// Creates a cache persisting through `store`, resolving plugins
    /// from `registry`, and handing `options` to every plugin invocation.
    pub fn new(
        store: Arc<dyn BlobStore>,
        registry: Arc<dyn PluginRegistry>,
        options: PluginOptions,
    ) -> Self {
        Self {
            store,
            registry,
            options,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Renders the asset's AST to output bytes, at most once per asset
    /// record per process.
    ///
    /// The first call for a record starts the computation; concurrent
    /// and later calls share its outcome without re-invoking the plugin
    /// or rewriting the store. A failed computation is not memoized: all
    /// currently-awaiting callers observe the failure, and the next call
    /// afterward re-attempts from scratch.
    pub async fn generate_from_ast(&self, asset: &Asset) -> Result<GeneratedOutput, GenerateError> {
        let token = asset.token();
        let future = {
            let mut inflight = self.inflight.lock().expect("generate cache lock poisoned");
            match inflight.entry(token) {
                Entry::Occupied(entry) => {
                    tracing::debug!(asset = %asset.id, "generate cache hit");
                    entry.get().clone()
                }
                Entry::Vacant(entry) => {
                    let future = Self::run(
                        Arc::clone(&self.store),
                        Arc::clone(&self.registry),
                        self.options.clone(),
                        asset.clone(),
                    )
                    .boxed()
                    .shared();
                    entry.insert(future.clone());
                    future
                }
            }
        };

        match future.clone().await {
            Ok(cached) => self.resolve_output(cached).await,
            Err(err) => {
                // Evict only the future that failed; a newer attempt may
                // already occupy the slot.
                let mut inflight = self.inflight.lock().expect("generate cache lock poisoned");
                if inflight
                    .get(&token)
                    .is_some_and(|existing| existing.ptr_eq(&future))
                {
                    inflight.remove(&token);
                }
                Err(err)
            }
        }
    }

    /// Drops the cached result for an asset token, if any.
    ///
    /// Call when the owning scope discards the asset record, so a
    /// long-lived process does not accumulate completed futures.
    pub fn forget(&self, token: AssetToken) {
        self.inflight
            .lock()
            .expect("generate cache lock poisoned")
            .remove(&token);
    }

    /// Number of cached (in-flight or completed) entries.
    pub fn len(&self) -> usize {
        self.inflight
            .lock()
            .expect("generate cache lock poisoned")
            .len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn resolve_output(&self, cached: CachedOutput) -> Result<GeneratedOutput, GenerateError> {
        let content = match cached.content {
            CachedContent::Materialized(bytes) => Blob::Bytes(bytes),
            CachedContent::InStore { content_key } => {
                let stream = self.store.get_stream(&content_key).await.map_err(|e| {
                    GenerateError::StoreRead {
                        key: content_key.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Blob::Stream(stream)
            }
        };
        Ok(GeneratedOutput {
            content,
            map: cached.map,
        })
    }

    async fn run(
        store: Arc<dyn BlobStore>,
        registry: Arc<dyn PluginRegistry>,
        options: PluginOptions,
        asset: Asset,
    ) -> Result<CachedOutput, GenerateError> {
        let asset_id = asset.id.clone();

        let ast_key = asset.ast_key.clone().ok_or_else(|| GenerateError::MissingAst {
            asset_id: asset_id.clone(),
        })?;
        let ast_bytes = match store.get_blob(&ast_key).await {
            Ok(bytes) => bytes,
            Err(StoreError::MissingKey { .. }) => {
                return Err(GenerateError::MissingAst { asset_id });
            }
            Err(e) => {
                return Err(GenerateError::AstRead {
                    asset_id,
                    reason: e.to_string(),
                });
            }
        };
        let ast: Ast =
            serde_json::from_slice(&ast_bytes).map_err(|e| GenerateError::AstRead {
                asset_id: asset_id.clone(),
                reason: e.to_string(),
            })?;

        let missing_provenance = || GenerateError::MissingProvenance {
            asset_id: asset_id.clone(),
        };
        let plugin_name = asset.plugin.clone().ok_or_else(missing_provenance)?;
        let config_path = asset.config_path.clone().ok_or_else(missing_provenance)?;
        let config_key_path = asset
            .config_key_path
            .clone()
            .ok_or_else(missing_provenance)?;

        let loaded = registry
            .load(&plugin_name, &config_path, &config_key_path)
            .await
            .map_err(|e| GenerateError::PluginLoad {
                plugin: plugin_name.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!(asset = %asset_id, plugin = %plugin_name, "generating output from AST");
        let logger = PluginLogger::new(&plugin_name);
        let request = GenerateRequest {
            asset_id: &asset.id,
            file_path: &asset.file_path,
            kind: &asset.kind,
            ast: &ast,
            options: &options,
            logger: &logger,
        };
        let Some(generate) = loaded.plugin.generate(request) else {
            return Err(GenerateError::UnsupportedPlugin {
                plugin: plugin_name,
            });
        };
        let GeneratedCode { content, map } =
            generate.await.map_err(|e| GenerateError::Plugin {
                plugin: plugin_name.clone(),
                asset_id: asset_id.clone(),
                reason: e.to_string(),
            })?;

        let content_key = asset
            .content_key
            .clone()
            .ok_or_else(|| GenerateError::MissingStoreKey {
                asset_id: asset_id.clone(),
                key_kind: "content",
            })?;

        let (cached_content, content_stream) = match content {
            Blob::Bytes(bytes) => (
                CachedContent::Materialized(bytes.clone()),
                Blob::Bytes(bytes).into_stream(),
            ),
            Blob::Stream(stream) => (
                CachedContent::InStore {
                    content_key: content_key.clone(),
                },
                stream,
            ),
        };

        // Both writes run concurrently; the result is not cached until
        // both have finished.
        let content_write = async {
            store
                .set_stream(&content_key, content_stream)
                .await
                .map_err(|e| GenerateError::StoreWrite {
                    key: content_key.clone(),
                    asset_id: asset_id.clone(),
                    reason: e.to_string(),
                })
        };
        let map_write = async {
            if let Some(map) = &map {
                let map_key =
                    asset
                        .map_key
                        .clone()
                        .ok_or_else(|| GenerateError::MissingStoreKey {
                            asset_id: asset_id.clone(),
                            key_kind: "map",
                        })?;
                store
                    .set_blob(&map_key, Bytes::from(map.to_bytes()))
                    .await
                    .map_err(|e| GenerateError::StoreWrite {
                        key: map_key.clone(),
                        asset_id: asset_id.clone(),
                        reason: e.to_string(),
                    })?;
            }
            Ok(())
        };
        futures::future::try_join(content_write, map_write).await?;

        tracing::debug!(asset = %asset_id, "generated output persisted");
        Ok(CachedOutput {
            content: cached_content,
            map,
        })
    }
}
