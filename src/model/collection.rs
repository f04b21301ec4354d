use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::IndexMap;

use super::config::{CollectionConfig, DisplayConfig, SchedulerConfig};
use super::deck::{DEFAULT_DECK_ID, Deck, DeckId, DECK_NAME_SEPARATOR, split_deck_name};
use crate::ops::projector::DeckMetadata;

/// A loaded deck collection
#[derive(Debug, Clone)]
pub struct Collection {
    /// Directory containing `deckview/`
    pub root: PathBuf,
    /// The `deckview/` directory itself
    pub dir: PathBuf,
    pub current: DeckId,
    pub scheduler: SchedulerConfig,
    pub display: DisplayConfig,
    /// Decks in file order
    pub decks: IndexMap<DeckId, Deck>,
    /// Normalized full name → id
    name_index: HashMap<String, DeckId>,
}

impl Collection {
    /// Build a collection from an already validated config.
    pub fn new(root: PathBuf, dir: PathBuf, config: CollectionConfig) -> Self {
        let mut decks = IndexMap::new();
        let mut name_index = HashMap::new();
        for deck in config.decks {
            name_index.insert(normalize_name(&deck.name), deck.id);
            decks.insert(deck.id, deck);
        }
        Collection {
            root,
            dir,
            current: config.current,
            scheduler: config.scheduler,
            display: config.display,
            decks,
            name_index,
        }
    }

    pub fn deck(&self, did: DeckId) -> Option<&Deck> {
        self.decks.get(&did)
    }

    pub fn deck_mut(&mut self, did: DeckId) -> Option<&mut Deck> {
        self.decks.get_mut(&did)
    }

    /// Look up a deck by full name, ignoring case and spacing around `::`
    pub fn by_name(&self, name: &str) -> Option<&Deck> {
        self.name_index
            .get(&normalize_name(name))
            .and_then(|did| self.decks.get(did))
    }

    /// Resolve a user-supplied deck reference: a numeric id or a full name.
    pub fn resolve(&self, query: &str) -> Option<DeckId> {
        if let Ok(did) = query.parse::<DeckId>()
            && self.decks.contains_key(&did)
        {
            return Some(did);
        }
        self.by_name(query).map(|d| d.id)
    }
}

/// Canonical form of a deck name for lookups
pub fn normalize_name(name: &str) -> String {
    split_deck_name(name)
        .join(DECK_NAME_SEPARATOR)
        .to_lowercase()
}

impl DeckMetadata for Collection {
    fn is_collapsed(&self, did: DeckId) -> bool {
        self.deck(did).is_some_and(|d| d.collapsed)
    }

    fn parents(&self, did: DeckId) -> Vec<DeckId> {
        let Some(deck) = self.deck(did) else {
            return Vec::new();
        };
        deck.ancestor_names()
            .iter()
            .filter_map(|name| self.by_name(name).map(|d| d.id))
            .collect()
    }

    fn has_cards(&self, did: DeckId) -> bool {
        self.deck(did).is_some_and(|d| d.cards > 0)
    }

    fn is_dynamic(&self, did: DeckId) -> bool {
        self.deck(did).is_some_and(|d| d.filtered)
    }

    fn current_deck(&self) -> DeckId {
        if self.decks.contains_key(&self.current) {
            self.current
        } else {
            DEFAULT_DECK_ID
        }
    }
}
