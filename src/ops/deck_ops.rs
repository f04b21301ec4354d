use crate::io::collection_io::{self, CollectionError};
use crate::model::collection::Collection;
use crate::model::deck::DeckId;

/// Error type for deck operations
#[derive(Debug, thiserror::Error)]
pub enum DeckOpError {
    #[error("deck not found: {0}")]
    NotFound(String),
    #[error("collection error: {0}")]
    Collection(#[from] CollectionError),
}

/// Resolve a deck reference (id or full name) against the collection.
pub fn resolve_deck(collection: &Collection, query: &str) -> Result<DeckId, DeckOpError> {
    collection
        .resolve(query)
        .ok_or_else(|| DeckOpError::NotFound(query.to_string()))
}

/// Collapse or expand a deck, in memory and in the config document.
pub fn set_collapsed(
    doc: &mut toml_edit::DocumentMut,
    collection: &mut Collection,
    did: DeckId,
    collapsed: bool,
) -> Result<(), DeckOpError> {
    let deck = collection
        .deck_mut(did)
        .ok_or_else(|| DeckOpError::NotFound(did.to_string()))?;
    if !collection_io::set_deck_flag(doc, did, "collapsed", collapsed) {
        return Err(DeckOpError::NotFound(did.to_string()));
    }
    deck.collapsed = collapsed;
    Ok(())
}

/// Flip a deck's collapse state. Returns the new state.
pub fn toggle_collapsed(
    doc: &mut toml_edit::DocumentMut,
    collection: &mut Collection,
    did: DeckId,
) -> Result<bool, DeckOpError> {
    let collapsed = collection
        .deck(did)
        .map(|d| !d.collapsed)
        .ok_or_else(|| DeckOpError::NotFound(did.to_string()))?;
    set_collapsed(doc, collection, did, collapsed)?;
    Ok(collapsed)
}

/// Make a deck the current one.
pub fn select_deck(
    doc: &mut toml_edit::DocumentMut,
    collection: &mut Collection,
    did: DeckId,
) -> Result<(), DeckOpError> {
    if collection.deck(did).is_none() {
        return Err(DeckOpError::NotFound(did.to_string()));
    }
    collection_io::set_current(doc, did);
    collection.current = did;
    Ok(())
}
