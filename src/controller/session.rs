//! Per-query aggregation state machine.
//!
//! The session exclusively owns the three sources, the burn-in and debounce
//! timers, and the buffers for the active query. It is driven entirely by
//! [`SessionEvent`]s; a query moves `PreBurnIn` → `PostBurnIn` once, and a
//! new search abandons the previous query's state wholesale.

use super::{ResultsPublisher, SessionEvent};
use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::source::{BatchSink, SourceSet};
use crate::types::{SearchResult, SearchResults, SearchSection, SourceCategory};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

/// Where the active query sits relative to the burn-in window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryPhase {
    /// Arrivals are buffered until the burn-in timer fires.
    PreBurnIn,
    /// The combined batch is out; arrivals now publish immediately.
    PostBurnIn,
}

/// State owned exclusively by the session for the query in flight.
///
/// Created on each non-empty search and fully replaced, never merged, by
/// the next one.
struct ActiveQuery {
    query: String,
    publisher: ResultsPublisher,
    /// One buffer per category, indexed by [`SourceCategory::index`]. A
    /// source's batch replaces its buffer wholesale; buffers never
    /// accumulate across batches.
    buffers: [Vec<SearchResult>; SourceCategory::ALL.len()],
    phase: QueryPhase,
    /// Cancelled on supersession, before the sources are stopped, so a
    /// stop-triggered flush from a provider dies at its sink.
    cancel: CancellationToken,
}

pub(crate) struct SearchSession {
    sources: SourceSet,
    config: SearchConfig,
    events: mpsc::UnboundedSender<SessionEvent>,
    burn_in: Debouncer,
    gif_debounce: Debouncer,
    /// Bumped on every search command; every sink and timer callback
    /// carries the generation it was created under, which replaces
    /// query-string comparison for stale detection.
    generation: u64,
    active: Option<ActiveQuery>,
}

impl SearchSession {
    pub(crate) fn new(
        sources: SourceSet,
        config: SearchConfig,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            sources,
            config,
            events,
            burn_in: Debouncer::new(),
            gif_debounce: Debouncer::new(),
            generation: 0,
            active: None,
        }
    }

    /// Drives the session until the controller shuts down.
    pub(crate) async fn run(mut self, mut rx: mpsc::UnboundedReceiver<SessionEvent>) {
        while let Some(event) = rx.recv().await {
            match event {
                SessionEvent::Search { query, publisher } => self.handle_search(query, publisher),
                SessionEvent::Batch {
                    generation,
                    category,
                    results,
                } => self.handle_batch(generation, category, results),
                SessionEvent::BurnInElapsed { generation } => self.handle_burn_in(generation),
                SessionEvent::DebounceElapsed { generation } => self.handle_debounce(generation),
                SessionEvent::Shutdown => break,
            }
        }
        self.abandon_active();
        debug!("search session stopped");
    }

    /// Cancels every piece of in-flight work belonging to the active query:
    /// per-query token first, then both streaming sources, the gif
    /// debounce, and the burn-in timer.
    fn abandon_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
        self.sources.ranked.stop();
        self.sources.gifs.stop();
        self.gif_debounce.cancel();
        self.burn_in.cancel();
    }

    fn handle_search(&mut self, query: String, mut publisher: ResultsPublisher) {
        self.abandon_active();
        self.generation += 1;
        let generation = self.generation;
        trace!(generation, %query, "starting search");

        if query.is_empty() {
            debug!(generation, "empty query, clearing results");
            publisher(SearchResults::default());
            return;
        }

        let cancel = CancellationToken::new();
        let mut active = ActiveQuery {
            query: query.clone(),
            publisher,
            buffers: Default::default(),
            phase: QueryPhase::PreBurnIn,
            cancel: cancel.clone(),
        };

        let events = self.events.clone();
        self.burn_in.schedule(self.config.burn_in_period, move || {
            let _ = events.send(SessionEvent::BurnInElapsed { generation });
        });

        active.buffers[SourceCategory::Expressions.index()] = self.sources.matcher.search(&query);

        let sink = self.sink(SourceCategory::Links, &cancel);
        self.sources.ranked.start(&query, sink);

        let events = self.events.clone();
        self.gif_debounce
            .schedule(self.config.debounce_delay, move || {
                let _ = events.send(SessionEvent::DebounceElapsed { generation });
            });

        self.active = Some(active);
    }

    fn sink(&self, category: SourceCategory, cancel: &CancellationToken) -> BatchSink {
        BatchSink {
            events: self.events.clone(),
            generation: self.generation,
            category,
            cancel: cancel.child_token(),
        }
    }

    /// The gif debounce elapsed: dispatch the fetch if the query is still
    /// current. A stale expiry lost the race with a supersession; benign.
    fn handle_debounce(&mut self, generation: u64) {
        if generation != self.generation {
            trace!(generation, "ignoring debounce expiry for superseded query");
            return;
        }
        let Some(active) = &self.active else {
            return;
        };
        let query = active.query.clone();
        let sink = self.sink(SourceCategory::Gifs, &active.cancel);
        debug!(generation, "dispatching debounced gif search");
        self.sources.gifs.start(&query, sink);
    }

    /// The burn-in window elapsed: publish the one combined batch and
    /// switch to incremental publishing. Fires at most once per query; a
    /// stale expiry is ignored.
    fn handle_burn_in(&mut self, generation: u64) {
        if generation != self.generation {
            trace!(generation, "ignoring burn-in expiry for superseded query");
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        debug_assert!(
            active.phase == QueryPhase::PreBurnIn,
            "burn-in fired twice for one query"
        );

        let combined = combined_batch(&active.buffers);
        debug!(
            generation,
            sections = combined.sections.len(),
            "publishing burn-in batch"
        );
        (active.publisher)(combined);
        active.phase = QueryPhase::PostBurnIn;
    }

    /// A streaming source delivered a replacement batch.
    ///
    /// A stale generation here means a source kept publishing after its
    /// sink was cancelled and `stop()` returned: a broken adapter, not a
    /// transient condition.
    fn handle_batch(
        &mut self,
        generation: u64,
        category: SourceCategory,
        results: Vec<SearchResult>,
    ) {
        if generation != self.generation {
            debug_assert!(
                false,
                "batch for superseded query: source kept publishing after stop"
            );
            error!(
                generation,
                current = self.generation,
                category = %category,
                "discarding batch for superseded query"
            );
            return;
        }
        let Some(active) = self.active.as_mut() else {
            debug_assert!(false, "batch delivered with no active query");
            return;
        };

        trace!(generation, category = %category, count = results.len(), "source batch");
        active.buffers[category.index()] = results;

        if active.phase == QueryPhase::PostBurnIn {
            let buffer = &active.buffers[category.index()];
            if buffer.is_empty() {
                return;
            }
            // Appends a standalone section; previously published sections
            // with the same heading are not updated in place.
            let batch = SearchResults {
                sections: vec![SearchSection::for_category(category, buffer.clone())],
            };
            debug!(category = %category, "publishing incremental batch");
            (active.publisher)(batch);
        }
    }
}

/// Concatenates the non-empty buffers into one batch, in category order.
fn combined_batch(buffers: &[Vec<SearchResult>; SourceCategory::ALL.len()]) -> SearchResults {
    let sections = SourceCategory::ALL
        .iter()
        .copied()
        .filter(|category| !buffers[category.index()].is_empty())
        .map(|category| SearchSection::for_category(category, buffers[category.index()].clone()))
        .collect();
    SearchResults { sections }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emoji(emoji: &str) -> SearchResult {
        SearchResult::Emoji {
            emoji: emoji.into(),
        }
    }

    fn link(url: &str) -> SearchResult {
        SearchResult::HistoryLink {
            url: url.into(),
            title: "cat - Search".into(),
        }
    }

    fn gif(description: &str) -> SearchResult {
        SearchResult::Gif {
            url: "https://media.example.com/plink-cat.gif".into(),
            preview_url: "https://media.example.com/plink-cat.png".into(),
            width: 480,
            height: 480,
            content_description: description.into(),
        }
    }

    #[test]
    fn combined_batch_keeps_category_order_with_all_buffers_full() {
        let buffers = [
            vec![emoji("🐱")],
            vec![link("https://www.example.com/search?q=cat")],
            vec![gif("cat blink")],
        ];
        let batch = combined_batch(&buffers);
        let headings: Vec<&str> = batch
            .sections
            .iter()
            .map(|section| section.heading.as_str())
            .collect();
        assert_eq!(
            headings,
            vec!["Matching expressions", "Matching links", "Other expressions"]
        );
    }

    #[test]
    fn combined_batch_suppresses_empty_buffers() {
        let buffers = [Vec::new(), Vec::new(), vec![gif("cat blink")]];
        let batch = combined_batch(&buffers);
        assert_eq!(batch.sections.len(), 1);
        assert_eq!(batch.sections[0].heading, "Other expressions");
    }

    #[test]
    fn combined_batch_with_no_results_has_no_sections() {
        let buffers: [Vec<SearchResult>; 3] = Default::default();
        assert!(combined_batch(&buffers).sections.is_empty());
    }

    #[test]
    fn combined_batch_places_gifs_last_regardless_of_arrival() {
        // Arrival order is not represented here at all: the gif buffer was
        // filled first, yet its section still renders after the links one.
        let mut buffers: [Vec<SearchResult>; 3] = Default::default();
        buffers[SourceCategory::Gifs.index()] = vec![gif("cat blink")];
        buffers[SourceCategory::Links.index()] =
            vec![link("https://www.example.com/search?q=cat")];

        let batch = combined_batch(&buffers);
        assert_eq!(batch.sections.len(), 2);
        assert_eq!(batch.sections[0].heading, "Matching links");
        assert_eq!(batch.sections[1].heading, "Other expressions");
    }
}
