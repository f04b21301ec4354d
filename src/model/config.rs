use serde::{Deserialize, Serialize};

use super::deck::{DEFAULT_DECK_ID, Deck, DeckId};

/// Contents of collection.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Currently selected deck
    #[serde(default = "default_current")]
    pub current: DeckId,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub decks: Vec<Deck>,
}

/// Average answer times used for the time-to-completion estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_secs_new")]
    pub secs_new: u32,
    #[serde(default = "default_secs_learn")]
    pub secs_learn: u32,
    #[serde(default = "default_secs_review")]
    pub secs_review: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            secs_new: default_secs_new(),
            secs_learn: default_secs_learn(),
            secs_review: default_secs_review(),
        }
    }
}

/// Text layout of the deck list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Spaces per nesting level
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Deck names wider than this many cells are truncated with `…`
    #[serde(default = "default_max_name_width")]
    pub max_name_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            indent: default_indent(),
            max_name_width: default_max_name_width(),
        }
    }
}

fn default_current() -> DeckId {
    DEFAULT_DECK_ID
}

fn default_secs_new() -> u32 {
    30
}

fn default_secs_learn() -> u32 {
    20
}

fn default_secs_review() -> u32 {
    10
}

fn default_indent() -> usize {
    2
}

fn default_max_name_width() -> usize {
    40
}
