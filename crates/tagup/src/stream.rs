//! Async chunk delivery
//!
//! Adapts [`IntoChunks`] into a `futures::Stream` so a tree can be
//! flushed progressively into an async response body. The stream does no
//! I/O and is always ready: traversal between handoffs is synchronous,
//! so backpressure comes entirely from how often the consumer polls.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tagup_core::{CancellationToken, IntoChunks, Node};

/// Render a tree as an async stream of UTF-8 byte chunks.
///
/// The tree is consumed so the stream can outlive the frame that built
/// it. Concatenating every chunk reproduces the buffered output byte for
/// byte.
pub fn render_stream(node: Node, cancel: &CancellationToken) -> ChunkStream {
    ChunkStream {
        chunks: node.into_chunks(cancel),
    }
}

/// A finite stream of markup chunks.
///
/// Ends early, without an error item, once the cancellation token fires;
/// chunks already yielded stay valid. Dropping the stream mid-way simply
/// abandons the remaining traversal.
pub struct ChunkStream {
    chunks: IntoChunks,
}

impl ChunkStream {
    /// Whether the stream ended because the token fired.
    pub fn is_cancelled(&self) -> bool {
        self.chunks.is_cancelled()
    }
}

impl Stream for ChunkStream {
    type Item = Bytes;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
        let chunk = self.get_mut().chunks.next();
        Poll::Ready(chunk.map(|chunk| Bytes::from(chunk.into_bytes())))
    }
}
