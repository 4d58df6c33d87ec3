//! Filesystem-backed blob store with validated binary headers.
//!
//! Blobs are stored as `<root>/<shard>/<key>.blob` where the shard is
//! derived from the key hash, keeping directories small for large
//! caches. Each file carries a header with magic bytes, a format
//! version, and a checksum so a corrupt or truncated file is reported
//! as [`StoreError::Corrupt`] instead of handing back garbage bytes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bale_common::ContentHash;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::blob::{collect_stream, ByteStream};
use crate::error::StoreError;
use crate::BlobStore;

/// Magic bytes identifying a Bale blob file.
const BLOB_MAGIC: [u8; 4] = *b"BALE";

/// Current blob format version. Increment on breaking changes to the
/// header or payload layout.
const BLOB_FORMAT_VERSION: u32 = 1;

/// File extension for stored blobs.
const BLOB_EXT: &str = "blob";

/// Header prepended to every stored blob for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlobHeader {
    /// Magic bytes: must be `b"BALE"`.
    magic: [u8; 4],

    /// Blob format version.
    format_version: u32,

    /// Content hash of the payload (for integrity checks).
    checksum: ContentHash,
}

/// A [`BlobStore`] persisting blobs under a root directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Creates a store rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Returns the file path a key is stored at.
    pub fn blob_path(&self, key: &str) -> PathBuf {
        let shard = format!("{}", ContentHash::from_str_content(key));
        let sanitized: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        self.root
            .join(&shard[..2])
            .join(format!("{sanitized}.{BLOB_EXT}"))
    }

    fn encode(key: &str, payload: &[u8]) -> Result<Vec<u8>, StoreError> {
        let header = BlobHeader {
            magic: BLOB_MAGIC,
            format_version: BLOB_FORMAT_VERSION,
            checksum: ContentHash::from_bytes(payload),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| StoreError::Serialization {
                reason: format!("key {key}: {e}"),
            })?;

        // Layout: 4-byte header length (little-endian) + header + payload
        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(payload);
        Ok(output)
    }

    fn decode(key: &str, raw: &[u8]) -> Result<Bytes, StoreError> {
        let corrupt = |reason: &str| StoreError::Corrupt {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if raw.len() < 4 {
            return Err(corrupt("file shorter than header length field"));
        }
        let header_len =
            u32::from_le_bytes(raw[..4].try_into().map_err(|_| corrupt("bad length field"))?)
                as usize;
        if raw.len() < 4 + header_len {
            return Err(corrupt("file shorter than declared header"));
        }

        let header: BlobHeader =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
                .map_err(|e| corrupt(&format!("undecodable header: {e}")))?
                .0;

        if header.magic != BLOB_MAGIC {
            return Err(corrupt("bad magic bytes"));
        }
        if header.format_version != BLOB_FORMAT_VERSION {
            return Err(corrupt(&format!(
                "format version {} (expected {BLOB_FORMAT_VERSION})",
                header.format_version
            )));
        }

        let payload = &raw[4 + header_len..];
        if ContentHash::from_bytes(payload) != header.checksum {
            return Err(corrupt("checksum mismatch"));
        }

        Ok(Bytes::copy_from_slice(payload))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
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
        let path = self.blob_path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let encoded = Self::encode(key, &bytes)?;
        tokio::fs::write(&path, encoded)
            .await
            .map_err(|source| StoreError::Io { path, source })
    }

    async fn get_blob(&self, key: &str) -> Result<Bytes, StoreError> {
        let path = self.blob_path(key);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::MissingKey {
                    key: key.to_string(),
                });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Self::decode(key, &raw)
    }

    async fn has(&self, key: &str) -> bool {
        tokio::fs::try_exists(self.blob_path(key))
            .await
            .unwrap_or(false)
    }
}
