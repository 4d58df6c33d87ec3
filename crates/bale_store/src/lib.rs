//! Content-addressable blob storage for generated bundler output.
//!
//! This crate defines the [`BlobStore`] boundary the asset core persists
//! generated content, source maps, and ASTs through, plus two
//! implementations: an in-memory store for tests and short-lived builds,
//! and a filesystem store with validated binary headers for on-disk
//! caches that survive across builds.
//!
//! Keys are opaque strings chosen by the caller. The store has no
//! eviction policy of its own; entry lifetime is owned by whoever manages
//! the store directory.

#![warn(missing_docs)]

pub mod blob;
pub mod error;
pub mod fs;
pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

pub use blob::{Blob, ByteStream};
pub use error::StoreError;
pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

/// Persistent keyed blob storage.
///
/// All operations are keyed by opaque strings. Writes replace any
/// existing blob under the same key. Reads of absent keys fail with
/// [`StoreError::MissingKey`] rather than returning empty content, so
/// callers can distinguish "never written" from "written empty".
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes a finite byte stream under `key`, consuming the stream.
    async fn set_stream(&self, key: &str, stream: ByteStream) -> Result<(), StoreError>;

    /// Writes fully materialized bytes under `key`.
    async fn set_blob(&self, key: &str, bytes: Bytes) -> Result<(), StoreError>;

    /// Reads the blob under `key` fully into memory.
    async fn get_blob(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Returns a fresh finite byte stream over the blob under `key`.
    ///
    /// Every call returns an independent stream; callers may read the
    /// same key concurrently without interfering with each other.
    async fn get_stream(&self, key: &str) -> Result<ByteStream, StoreError> {
        let bytes = self.get_blob(key).await?;
        Ok(futures::stream::once(async move { Ok(bytes) }).boxed())
    }

    /// Returns `true` if a blob exists under `key`.
    async fn has(&self, key: &str) -> bool;
}
