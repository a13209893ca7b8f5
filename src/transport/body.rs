//! Streaming response bodies.

use std::fmt;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use tokio_stream::{Stream, StreamExt};

use super::TransportError;

type Chunk = Result<Bytes, TransportError>;
type ChunkStream = Pin<Box<dyn Stream<Item = Chunk> + Send>>;

/// A response body delivered as a stream of chunks.
///
/// The body must be consumed or dropped by its owner. Reading it to the end
/// (via [`bytes`](Self::bytes) or [`drain`](Self::drain)) lets pooled
/// connections be reused; dropping it early closes the connection instead.
pub struct ResponseBody {
    chunks: ChunkStream,
}

impl ResponseBody {
    /// Creates an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_stream(tokio_stream::empty())
    }

    /// Creates a body from a single buffered chunk.
    #[must_use]
    pub fn from_bytes(body: impl Into<Bytes>) -> Self {
        let body = body.into();
        if body.is_empty() {
            return Self::empty();
        }
        Self::from_stream(tokio_stream::once(Ok(body)))
    }

    /// Creates a body from an arbitrary chunk stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Chunk> + Send + 'static,
    {
        Self {
            chunks: Box::pin(stream),
        }
    }

    /// Returns the next chunk, or `None` at the end of the body.
    pub async fn next_chunk(&mut self) -> Option<Chunk> {
        self.chunks.next().await
    }

    /// Reads the whole body into memory.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the underlying stream.
    pub async fn bytes(mut self) -> Result<Bytes, TransportError> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.chunks.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Reads at most `limit` bytes and discards the rest of the body.
    ///
    /// The remainder is still consumed so the connection can be reused.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the underlying stream.
    pub async fn bytes_limited(mut self, limit: usize) -> Result<Vec<u8>, TransportError> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.chunks.next().await {
            let chunk = chunk?;
            let room = limit.saturating_sub(buf.len());
            buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }
        Ok(buf)
    }

    /// Consumes and discards the body, returning the number of bytes read.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the underlying stream.
    pub async fn drain(mut self) -> Result<u64, TransportError> {
        let mut total = 0u64;
        while let Some(chunk) = self.chunks.next().await {
            total += chunk?.len() as u64;
        }
        Ok(total)
    }
}

impl Default for ResponseBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody").finish_non_exhaustive()
    }
}
