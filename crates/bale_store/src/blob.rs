//! The blob content model shared between plugins and the store.
//!
//! Plugin code generation may produce either fully materialized bytes or
//! a finite byte stream. [`Blob`] carries both forms through the generate
//! pipeline without forcing streams into memory until a consumer needs
//! them.

use bytes::{Bytes, BytesMut};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::fmt;
use std::io;

/// A finite stream of byte chunks, as produced by plugins and the store.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// Generated content in either materialized or streaming form.
pub enum Blob {
    /// Fully materialized bytes.
    Bytes(Bytes),
    /// A finite, single-use byte stream.
    Stream(ByteStream),
}

impl Blob {
    /// Creates a materialized blob from anything convertible to bytes.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Blob::Bytes(bytes.into())
    }

    /// Creates a streaming blob.
    pub fn from_stream(stream: ByteStream) -> Self {
        Blob::Stream(stream)
    }

    /// Returns `true` if this blob is in streaming form.
    ///
    /// Streams are single-use: once consumed they cannot be replayed, so
    /// the generate pipeline substitutes a fresh store read handle for
    /// them after persisting.
    pub fn is_stream(&self) -> bool {
        matches!(self, Blob::Stream(_))
    }

    /// Converts this blob into a byte stream, consuming it.
    ///
    /// Materialized bytes become a single-chunk stream.
    pub fn into_stream(self) -> ByteStream {
        match self {
            Blob::Bytes(bytes) => futures::stream::once(async move { Ok(bytes) }).boxed(),
            Blob::Stream(stream) => stream,
        }
    }

    /// Collects this blob fully into memory, consuming it.
    pub async fn into_bytes(self) -> io::Result<Bytes> {
        match self {
            Blob::Bytes(bytes) => Ok(bytes),
            Blob::Stream(stream) => collect_stream(stream).await,
        }
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blob::Bytes(bytes) => write!(f, "Blob::Bytes({} bytes)", bytes.len()),
            Blob::Stream(_) => write!(f, "Blob::Stream(..)"),
        }
    }
}

/// Drains a byte stream into a single contiguous buffer.
pub async fn collect_stream(mut stream: ByteStream) -> io::Result<Bytes> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        buf.extend_from_slice(&chunk?);
    }
    Ok(buf.freeze())
}
