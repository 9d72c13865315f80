//! Emoji + GIF reactions on sessions.
//!
//! A [`ReactionPicker`] walks the user through choosing a topic (a fixed
//! category, a free-text search or the trending list), loads candidate GIFs
//! from a [`GifCatalog`] and turns the chosen one into a [`ReactionPayload`].
//! Catalog calls never fail: network or API problems show up as an empty
//! list.

mod giphy;

pub use giphy::GiphyClient;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::ReactionPayload;

/// Number of GIFs loaded per topic
pub const DEFAULT_GIF_LIMIT: usize = 12;

/// Emoji attached to reactions picked from a free-text search
pub const SEARCH_EMOJI: &str = "💬";

const TRENDING_LABEL: &str = "Trending";
const TRENDING_EMOJI: &str = "✨";

/// A GIF candidate from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionGif {
    pub id: String,
    pub url: String,
    pub title: String,
}

/// Source of GIF candidates; implementations must fail soft
#[allow(async_fn_in_trait)]
pub trait GifCatalog {
    /// GIFs matching `query`, at most `limit`
    async fn search(&self, query: &str, limit: usize) -> Vec<ReactionGif>;

    /// Currently popular GIFs, at most `limit`
    async fn trending(&self, limit: usize) -> Vec<ReactionGif>;
}

/// A named reaction with its emoji and the search term used for its GIFs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionCategory {
    pub label: &'static str,
    pub emoji: &'static str,
    pub query: &'static str,
}

pub const REACTION_CATEGORIES: [ReactionCategory; 6] = [
    ReactionCategory {
        label: "Fire",
        emoji: "🔥",
        query: "fire",
    },
    ReactionCategory {
        label: "Strong",
        emoji: "💪",
        query: "strong",
    },
    ReactionCategory {
        label: "Celebration",
        emoji: "🎉",
        query: "celebration",
    },
    ReactionCategory {
        label: "Beast Mode",
        emoji: "🦍",
        query: "beast mode",
    },
    ReactionCategory {
        label: "Mind Blown",
        emoji: "🤯",
        query: "mind blown",
    },
    ReactionCategory {
        label: "Applause",
        emoji: "👏",
        query: "applause",
    },
];

/// Search terms offered next to the free-text box
pub const SUGGESTED_SEARCHES: [&str; 14] = [
    "fire",
    "strong",
    "celebration",
    "clapping",
    "wow",
    "beast mode",
    "mind blown",
    "fail",
    "nice",
    "funny",
    "impressive",
    "flex",
    "workout",
    "victory",
];

/// Find a category by label or search term, ignoring case
pub fn find_category(name: &str) -> Option<&'static ReactionCategory> {
    let name = name.trim();
    REACTION_CATEGORIES.iter().find(|category| {
        category.label.eq_ignore_ascii_case(name) || category.query.eq_ignore_ascii_case(name)
    })
}

/// What the picker is currently showing GIFs for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerTopic {
    Category(&'static ReactionCategory),
    Search(String),
    Trending,
}

impl PickerTopic {
    /// Label stored as the reaction's category
    pub fn label(&self) -> &str {
        match self {
            Self::Category(category) => category.label,
            Self::Search(query) => query,
            Self::Trending => TRENDING_LABEL,
        }
    }

    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Category(category) => category.emoji,
            Self::Search(_) => SEARCH_EMOJI,
            Self::Trending => TRENDING_EMOJI,
        }
    }
}

/// Topic selection, GIF loading and final pick for one reaction
pub struct ReactionPicker<C: GifCatalog> {
    catalog: C,
    limit: usize,
    topic: Option<PickerTopic>,
    gifs: Vec<ReactionGif>,
}

impl<C: GifCatalog> ReactionPicker<C> {
    pub const fn new(catalog: C) -> Self {
        Self {
            catalog,
            limit: DEFAULT_GIF_LIMIT,
            topic: None,
            gifs: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub const fn topic(&self) -> Option<&PickerTopic> {
        self.topic.as_ref()
    }

    /// Candidates for the current topic
    pub fn gifs(&self) -> &[ReactionGif] {
        &self.gifs
    }

    /// Load GIFs for a fixed category
    pub async fn select_category(&mut self, name: &str) -> Result<&[ReactionGif]> {
        let category = find_category(name)
            .ok_or_else(|| Error::InvalidInput(format!("unknown reaction category: {name}")))?;
        self.gifs = self.catalog.search(category.query, self.limit).await;
        self.topic = Some(PickerTopic::Category(category));
        Ok(&self.gifs)
    }

    /// Load GIFs for a free-text query; a blank query clears the picker
    pub async fn search(&mut self, query: &str) -> &[ReactionGif] {
        let query = query.trim();
        if query.is_empty() {
            self.back();
            return &self.gifs;
        }
        self.gifs = self.catalog.search(query, self.limit).await;
        self.topic = Some(PickerTopic::Search(query.to_string()));
        &self.gifs
    }

    pub async fn trending(&mut self) -> &[ReactionGif] {
        self.gifs = self.catalog.trending(self.limit).await;
        self.topic = Some(PickerTopic::Trending);
        &self.gifs
    }

    /// Return to topic selection
    pub fn back(&mut self) {
        self.topic = None;
        self.gifs.clear();
    }

    /// Choose the GIF at `index` and reset the picker.
    ///
    /// Returns `None` when no topic is selected or the index is out of range.
    pub fn pick(&mut self, index: usize) -> Option<ReactionPayload> {
        let topic = self.topic.as_ref()?;
        let gif = self.gifs.get(index)?;
        let payload = ReactionPayload {
            category: topic.label().to_string(),
            emoji: topic.emoji().to_string(),
            gif_url: gif.url.clone(),
            gif_id: gif.id.clone(),
        };
        self.back();
        Some(payload)
    }
}
