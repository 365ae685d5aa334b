//! The search controller: public handle over the aggregation session.
//!
//! [`SearchController::spawn`] launches a session task that exclusively
//! owns all per-query state. `start_search` commands, source batches, and
//! timer expiries all re-enter the session through one channel, so the
//! aggregation logic runs on a single logical owner without locking;
//! channel order is the happens-before edge between a new search and any
//! event it did not cancel.

mod session;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::source::SourceSet;
use crate::types::{SearchResult, SearchResults, SourceCategory};
use session::SearchSession;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Callback receiving published result batches.
///
/// Invoked one or more times per `start_search` call, and replaced
/// wholesale (not chained) by the next call.
pub type ResultsPublisher = Box<dyn FnMut(SearchResults) + Send>;

/// Messages driving the session task.
pub(crate) enum SessionEvent {
    /// New search command from the controller handle.
    Search {
        query: String,
        publisher: ResultsPublisher,
    },
    /// A replacement batch from a streaming source's sink.
    Batch {
        generation: u64,
        category: SourceCategory,
        results: Vec<SearchResult>,
    },
    /// The burn-in window for `generation` elapsed.
    BurnInElapsed { generation: u64 },
    /// The gif debounce delay for `generation` elapsed.
    DebounceElapsed { generation: u64 },
    /// Tear down and exit the session task.
    Shutdown,
}

/// Handle over a running search aggregation session.
///
/// Dropping the handle tears the session down (best effort, without
/// awaiting); call [`shutdown`](Self::shutdown) to wait for teardown.
pub struct SearchController {
    events: mpsc::UnboundedSender<SessionEvent>,
    task: Option<JoinHandle<()>>,
}

impl SearchController {
    /// Validates `config` and spawns the session task over `sources`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid.
    pub fn spawn(sources: SourceSet, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let (events, rx) = mpsc::unbounded_channel();
        let session = SearchSession::new(sources, config, events.clone());
        let task = tokio::spawn(session.run(rx));
        Ok(Self {
            events,
            task: Some(task),
        })
    }

    /// Starts a search for `query`, superseding any search in progress.
    ///
    /// All in-flight work for the previous query is cancelled before any
    /// new dispatch, and the previous publisher receives no further
    /// invocations. An empty query clears the session and invokes
    /// `publisher` exactly once with an empty batch, dispatching nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Closed`] once the session has shut down.
    pub fn start_search<F>(&self, query: impl Into<String>, publisher: F) -> Result<()>
    where
        F: FnMut(SearchResults) + Send + 'static,
    {
        self.events
            .send(SessionEvent::Search {
                query: query.into(),
                publisher: Box::new(publisher),
            })
            .map_err(|_| SearchError::Closed)
    }

    /// Stops all in-flight work and waits for the session task to exit.
    ///
    /// Idempotent; further `start_search` calls return
    /// [`SearchError::Closed`].
    pub async fn shutdown(&mut self) {
        let _ = self.events.send(SessionEvent::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        let _ = self.events.send(SessionEvent::Shutdown);
    }
}
