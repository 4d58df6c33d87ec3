//! In-memory blob store for tests and single-shot builds.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::blob::{collect_stream, ByteStream};
use crate::error::StoreError;
use crate::BlobStore;

/// A [`BlobStore`] backed by a process-local map.
///
/// Nothing survives the process; this exists for tests and for builds
/// that opt out of the persistent disk cache. Writes fully materialize
/// streams before inserting.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.lock().expect("blob map lock poisoned").len()
    }

    /// Returns `true` if no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn set_stream(&self, key: &str, stream: ByteStream) -> Result<(), StoreError> {
        let bytes = collect_stream(stream)
            .await
            .map_err(|source| StoreError::Stream {
                key: key.to_string(),
                source,
            })?;
        self.set_blob(key, bytes).await
    }

    async fn set_blob(&self, key: &str, bytes: Bytes) -> Result<(), StoreError> {
        self.blobs
            .lock()
            .expect("blob map lock poisoned")
            .insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get_blob(&self, key: &str) -> Result<Bytes, StoreError> {
        self.blobs
            .lock()
            .expect("blob map lock poisoned")
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::MissingKey {
                key: key.to_string(),
            })
    }

    async fn has(&self, key: &str) -> bool {
        self.blobs
            .lock()
            .expect("blob map lock poisoned")
            .contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Blob;

    #[tokio::test]
    async fn set_and_get_blob() {
        let store = MemoryBlobStore::new();
        store
            .set_blob("a.content", Bytes::from("generated"))
            .await
            .unwrap();
        assert_eq!(store.get_blob("a.content").await.unwrap(), "generated");
    }

    #[tokio::test]
    async fn missing_key_errors() {
        let store = MemoryBlobStore::new();
        let err = store.get_blob("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::MissingKey { .. }));
    }

    #[tokio::test]
    async fn set_stream_materializes() {
        let store = MemoryBlobStore::new();
        let stream = Blob::from_bytes("streamed content").into_stream();
        store.set_stream("s.content", stream).await.unwrap();
        assert_eq!(
            store.get_blob("s.content").await.unwrap(),
            "streamed content"
        );
    }

    #[tokio::test]
    async fn get_stream_is_fresh_per_call() {
        let store = MemoryBlobStore::new();
        store.set_blob("k", Bytes::from("payload")).await.unwrap();

        let first = store.get_stream("k").await.unwrap();
        let second = store.get_stream("k").await.unwrap();
        assert_eq!(collect_stream(first).await.unwrap(), "payload");
        assert_eq!(collect_stream(second).await.unwrap(), "payload");
    }

    #[tokio::test]
    async fn overwrite_replaces() {
        let store = MemoryBlobStore::new();
        store.set_blob("k", Bytes::from("old")).await.unwrap();
        store.set_blob("k", Bytes::from("new")).await.unwrap();
        assert_eq!(store.get_blob("k").await.unwrap(), "new");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn has_reflects_contents() {
        let store = MemoryBlobStore::new();
        assert!(!store.has("k").await);
        store.set_blob("k", Bytes::new()).await.unwrap();
        assert!(store.has("k").await);
    }

    #[tokio::test]
    async fn empty_blob_is_present_not_missing() {
        let store = MemoryBlobStore::new();
        store.set_blob("empty", Bytes::new()).await.unwrap();
        assert_eq!(store.get_blob("empty").await.unwrap().len(), 0);
    }
}
