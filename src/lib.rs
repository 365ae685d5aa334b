//! # picker-search
//!
//! Multi-source, time-windowed search aggregation for a type-ahead picker.
//!
//! For each query, a [`SearchController`] fans out to three heterogeneous
//! sources (a synchronous in-memory matcher, an asynchronous ranked-search
//! provider, and a rate-limited external gif fetch), buffers their results
//! behind a short burn-in window to avoid flicker, then streams further
//! arrivals incrementally while preserving section ordering and suppressing
//! stale or empty output.
//!
//! ## Design
//!
//! - One session task owns all per-query state; sources and timers re-enter
//!   through a single channel, so there is no locking
//! - The burn-in window bounds the first paint: exactly one combined batch
//!   is published when it expires, with sections in fixed category order
//!   regardless of which source won the race
//! - The gif source is dispatched behind a debounce delay and stopped on
//!   supersession, so a burst of keystrokes costs at most one fetch
//! - A per-query generation and cancellation token guarantee that no batch
//!   from an abandoned query ever reaches the publisher
//!
//! ## Security
//!
//! - Search queries are logged only at trace level
//! - No network access: sources are caller-supplied seams
//!
//! ## Example
//!
//! ```no_run
//! use picker_search::{
//!     BatchSink, SearchConfig, SearchController, SearchResult, SourceSet, StreamingSource,
//!     SyncSource,
//! };
//!
//! struct EmojiMatcher;
//!
//! impl SyncSource for EmojiMatcher {
//!     fn search(&mut self, query: &str) -> Vec<SearchResult> {
//!         if query.contains("cat") {
//!             vec![SearchResult::Emoji { emoji: "🐱".into() }]
//!         } else {
//!             Vec::new()
//!         }
//!     }
//! }
//!
//! struct Silent;
//!
//! impl StreamingSource for Silent {
//!     fn start(&mut self, _query: &str, _sink: BatchSink) {}
//!     fn stop(&mut self) {}
//! }
//!
//! # async fn example() -> picker_search::Result<()> {
//! let controller = SearchController::spawn(
//!     SourceSet {
//!         matcher: Box::new(EmojiMatcher),
//!         ranked: Box::new(Silent),
//!         gifs: Box::new(Silent),
//!     },
//!     SearchConfig::default(),
//! )?;
//! controller.start_search("cat", |batch| {
//!     for section in &batch.sections {
//!         println!("{}: {} results", section.heading, section.results.len());
//!     }
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod source;
pub mod types;

pub use config::SearchConfig;
pub use controller::{ResultsPublisher, SearchController};
pub use debounce::Debouncer;
pub use error::{Result, SearchError};
pub use source::{BatchSink, SourceSet, StreamingSource, SyncSource};
pub use types::{SearchResult, SearchResults, SearchSection, SourceCategory};
