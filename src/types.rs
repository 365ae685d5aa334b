//! Core types for picker results, sections, and published batches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single result produced by one of the picker's search sources.
///
/// Each kind carries only the fields the picker needs to render it. The
/// aggregator never inspects these payloads; it only groups them into
/// sections by source category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchResult {
    /// Plain text to insert verbatim.
    Text {
        /// The text shown and inserted.
        primary_text: String,
    },
    /// A single emoji.
    Emoji {
        /// The emoji grapheme cluster.
        emoji: String,
    },
    /// A typographic symbol.
    Symbol {
        /// The symbol character.
        symbol: String,
    },
    /// A multi-character emoticon.
    Emoticon {
        /// The emoticon text, e.g. `¯\_(ツ)_/¯`.
        emoticon: String,
    },
    /// An animated GIF from the external media provider.
    Gif {
        /// URL of the full-size GIF.
        url: String,
        /// URL of a lightweight preview image.
        preview_url: String,
        /// Full-size width in pixels.
        width: u32,
        /// Full-size height in pixels.
        height: u32,
        /// Accessible description of the GIF's content.
        content_description: String,
    },
    /// A link from the user's browsing history.
    HistoryLink {
        /// The linked URL.
        url: String,
        /// The page title at the time it was visited.
        title: String,
    },
}

/// The fixed rendering-priority bucket a source's results belong to.
///
/// Publish order is the declaration order here, never arrival order: the
/// rate-limited gif category always renders last even when its network call
/// happens to win the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceCategory {
    /// Synchronous in-memory matcher output (emoji, symbols, emoticons).
    Expressions,
    /// Ranked asynchronous search output (browsing history links).
    Links,
    /// Debounced external fetch output (gifs).
    Gifs,
}

impl SourceCategory {
    /// Every category, in publish order.
    pub const ALL: [SourceCategory; 3] = [Self::Expressions, Self::Links, Self::Gifs];

    /// Returns the lowercase name of this category, for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Expressions => "expressions",
            Self::Links => "links",
            Self::Gifs => "gifs",
        }
    }

    /// Returns the section heading shown above this category's results.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Expressions => "Matching expressions",
            Self::Links => "Matching links",
            Self::Gifs => "Other expressions",
        }
    }

    /// Position of this category in [`SourceCategory::ALL`], used to index
    /// the per-category buffers.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Expressions => 0,
            Self::Links => 1,
            Self::Gifs => 2,
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One titled group of results inside a published batch.
///
/// A section with zero results is never published; an empty source simply
/// contributes no section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSection {
    /// Heading rendered above the section.
    pub heading: String,
    /// Results in source-provided order.
    pub results: Vec<SearchResult>,
}

impl SearchSection {
    /// Builds the section for `category` with the given results.
    pub fn for_category(category: SourceCategory, results: Vec<SearchResult>) -> Self {
        Self {
            heading: category.heading().to_string(),
            results,
        }
    }
}

/// An ordered batch of sections handed to the publisher callback.
///
/// The burn-in batch carries every non-empty section; post-burn-in
/// incremental batches carry exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Sections in fixed category order.
    pub sections: Vec<SearchSection>,
}
