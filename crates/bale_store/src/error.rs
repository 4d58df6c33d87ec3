//! Error types for blob store operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing the blob store.
///
/// Reads distinguish absent keys from corrupt entries so callers can
/// treat the former as an expected cache miss and the latter as a
/// diagnostic-worthy store problem.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred while touching the backing storage.
    #[error("blob store I/O error at {path}: {source}")]
    Io {
        /// The filesystem path involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// No blob has been written under the requested key.
    #[error("no blob stored under key {key}")]
    MissingKey {
        /// The requested key.
        key: String,
    },

    /// A stored blob failed header or checksum validation.
    #[error("corrupt blob under key {key}: {reason}")]
    Corrupt {
        /// The key of the corrupt entry.
        key: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The content stream being written failed before completion.
    #[error("content stream for key {key} failed: {source}")]
    Stream {
        /// The key being written.
        key: String,
        /// The underlying stream error.
        source: std::io::Error,
    },

    /// A header serialization or deserialization error occurred.
    #[error("blob header serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
