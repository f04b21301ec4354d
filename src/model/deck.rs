use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between the components of a nested deck name (`Spanish::Verbs`)
pub const DECK_NAME_SEPARATOR: &str = "::";

/// The reserved id of the collection's default deck
pub const DEFAULT_DECK_ID: DeckId = DeckId(1);

/// Opaque deck identifier, unique within a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(pub i64);

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeckId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(DeckId)
    }
}

/// A deck as stored in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    /// Full name, components joined by `::`
    pub name: String,
    /// Number of cards assigned to this deck
    #[serde(default)]
    pub cards: u32,
    /// Due counts for this deck alone
    #[serde(default)]
    pub new: u32,
    #[serde(default)]
    pub learn: u32,
    #[serde(default)]
    pub review: u32,
    /// Children hidden from the deck list
    #[serde(default)]
    pub collapsed: bool,
    /// Filtered (dynamic) deck, built from a search rather than fixed assignment
    #[serde(default)]
    pub filtered: bool,
}

impl Deck {
    pub fn new(id: DeckId, name: impl Into<String>) -> Self {
        Deck {
            id,
            name: name.into(),
            cards: 0,
            new: 0,
            learn: 0,
            review: 0,
            collapsed: false,
            filtered: false,
        }
    }

    /// Name components, trimmed (`"A:: B"` → `["A", "B"]`)
    pub fn name_components(&self) -> Vec<&str> {
        split_deck_name(&self.name)
    }

    /// Full names of every ancestor, farthest first
    pub fn ancestor_names(&self) -> Vec<String> {
        let components = self.name_components();
        (1..components.len())
            .map(|n| components[..n].join(DECK_NAME_SEPARATOR))
            .collect()
    }
}

/// Split a full deck name into its trimmed components.
pub fn split_deck_name(name: &str) -> Vec<&str> {
    name.split(DECK_NAME_SEPARATOR).map(str::trim).collect()
}

/// A node of the due tree: one deck, its due counts and its subdecks.
///
/// `depth` is supplied by whoever builds the tree and is never recomputed by
/// consumers. Counts may or may not include descendants depending on the
/// supplier; [`crate::ops::deck_tree::due_tree`] aggregates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckNode {
    pub id: DeckId,
    pub name: String,
    pub depth: usize,
    pub new_count: u32,
    pub learn_count: u32,
    pub review_count: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DeckNode>,
}

impl DeckNode {
    pub fn new(id: DeckId, name: impl Into<String>, depth: usize) -> Self {
        DeckNode {
            id,
            name: name.into(),
            depth,
            new_count: 0,
            learn_count: 0,
            review_count: 0,
            children: Vec::new(),
        }
    }

    /// Builder-style counts setter
    pub fn with_counts(mut self, new: u32, learn: u32, review: u32) -> Self {
        self.new_count = new;
        self.learn_count = learn;
        self.review_count = review;
        self
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: DeckNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The last `::` component of the name, as shown in the deck list
    pub fn last_name_component(&self) -> &str {
        self.name
            .rsplit(DECK_NAME_SEPARATOR)
            .next()
            .map(str::trim)
            .unwrap_or(&self.name)
    }

    pub fn counts(&self) -> [u32; 3] {
        [self.new_count, self.learn_count, self.review_count]
    }
}
