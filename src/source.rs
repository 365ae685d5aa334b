//! Source adapter seams and the per-query publish handle.
//!
//! The aggregator is polymorphic over two capability shapes: a synchronous
//! source queried inline, and cancelable asynchronous sources that hand
//! batches back through a [`BatchSink`]. Sources never touch aggregator
//! state directly; every result re-enters the session through the sink's
//! channel, on the session's own task.

use crate::controller::SessionEvent;
use crate::types::{SearchResult, SourceCategory};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// A source that answers inline, without suspension.
///
/// Implementations must return promptly and deterministically; any
/// per-subtype result capping is the source's own contract and opaque to
/// the aggregator.
pub trait SyncSource: Send {
    /// Returns every match for `query`, in render order.
    fn search(&mut self, query: &str) -> Vec<SearchResult>;
}

/// A cancelable asynchronous source.
///
/// `start` replaces any in-flight request for this source. After `stop`
/// returns, or once a newer `start` call supersedes the request, the old
/// sink must no longer be invoked; a publish through a cancelled sink is
/// dropped at the sink, and a stale batch that still reaches the session is
/// treated as a broken adapter (see [`BatchSink::publish`]).
pub trait StreamingSource: Send {
    /// Begins a search for `query`, delivering batches through `sink`.
    ///
    /// A single `start` may publish zero or more batches; each batch is a
    /// complete replacement for this source's results, not a delta.
    fn start(&mut self, query: &str, sink: BatchSink);

    /// Cancels in-flight work. Idempotent; a no-op when nothing is in flight.
    fn stop(&mut self);
}

/// Publish handle handed to a [`StreamingSource`] for one query.
///
/// The sink is pinned to the query generation it was created under and to
/// one source category; it can be cloned freely into whatever tasks the
/// source spawns.
#[derive(Debug, Clone)]
pub struct BatchSink {
    pub(crate) events: mpsc::UnboundedSender<SessionEvent>,
    pub(crate) generation: u64,
    pub(crate) category: SourceCategory,
    pub(crate) cancel: CancellationToken,
}

impl BatchSink {
    /// Delivers a complete replacement batch for this sink's source.
    ///
    /// Once the owning query has been superseded this is a no-op: ranked
    /// providers flush an empty batch from inside `stop`, and that flush
    /// must not surface under the new query. A batch that bypasses the
    /// cancelled sink and still reaches the session with a stale generation
    /// asserts in debug builds and is discarded in release builds.
    pub fn publish(&self, results: Vec<SearchResult>) {
        if self.cancel.is_cancelled() {
            trace!(category = %self.category, "dropping batch for superseded query");
            return;
        }
        let _ = self.events.send(SessionEvent::Batch {
            generation: self.generation,
            category: self.category,
            results,
        });
    }

    /// True once the owning query has been superseded or torn down.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// The three sources wired into a [`SearchController`](crate::SearchController).
pub struct SourceSet {
    /// Synchronous in-memory matcher; results render under
    /// [`SourceCategory::Expressions`].
    pub matcher: Box<dyn SyncSource>,
    /// Ranked asynchronous search; results render under
    /// [`SourceCategory::Links`].
    pub ranked: Box<dyn StreamingSource>,
    /// Rate-limited external fetch, dispatched behind the debounce delay;
    /// results render under [`SourceCategory::Gifs`].
    pub gifs: Box<dyn StreamingSource>,
}
