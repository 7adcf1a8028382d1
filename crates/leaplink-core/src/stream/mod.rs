// ── Property stream adapter ──
//
// Converts a property subscription into a `Stream` for use with
// `StreamExt` combinators.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the value current at creation time, then every subsequent
/// change. Watch semantics apply: a slow consumer observes the latest
/// value, not every intermediate one.
pub struct PropertyStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<T>,
}

impl<T: Clone + Send + Sync + 'static> PropertyStream<T> {
    pub fn new(receiver: watch::Receiver<T>) -> Self {
        Self {
            inner: WatchStream::new(receiver),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> From<watch::Receiver<T>> for PropertyStream<T> {
    fn from(receiver: watch::Receiver<T>) -> Self {
        Self::new(receiver)
    }
}

impl<T: Clone + Send + Sync + 'static> Stream for PropertyStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream<T> is Unpin for T: Clone + Send + Sync.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
