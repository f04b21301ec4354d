use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::collection::{Collection, normalize_name};
use crate::model::config::CollectionConfig;
use crate::model::deck::DeckId;

/// Directory holding the collection, relative to the collection root
pub const COLLECTION_DIR: &str = "deckview";
/// Collection file inside [`COLLECTION_DIR`]
pub const COLLECTION_FILE: &str = "collection.toml";

/// Error type for collection I/O operations
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("not a deck collection: no deckview/collection.toml found")]
    NotACollection,
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse collection.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit collection.toml: {0}")]
    DocumentError(#[from] toml_edit::TomlError),
    #[error("duplicate deck id: {0}")]
    DuplicateId(DeckId),
    #[error("duplicate deck name: {0}")]
    DuplicateName(String),
    #[error("deck {0} has an empty name component")]
    EmptyName(DeckId),
    #[error("deck \"{deck}\" has no parent deck \"{parent}\"")]
    MissingParent { deck: String, parent: String },
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

/// Discover the collection by walking up from the given directory, looking
/// for a `deckview/collection.toml`.
pub fn discover_collection(start: &Path) -> Result<PathBuf, CollectionError> {
    let mut current = start.to_path_buf();
    loop {
        if collection_path(&current).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(CollectionError::NotACollection);
        }
    }
}

/// Path of the collection file under a collection root
pub fn collection_path(root: &Path) -> PathBuf {
    root.join(COLLECTION_DIR).join(COLLECTION_FILE)
}

/// Load and validate the collection rooted at `root`.
pub fn load_collection(root: &Path) -> Result<Collection, CollectionError> {
    let dir = root.join(COLLECTION_DIR);
    if !dir.is_dir() {
        return Err(CollectionError::NotACollection);
    }
    let text = read_collection_text(&dir)?;
    let config: CollectionConfig = toml::from_str(&text)?;
    validate(&config)?;

    tracing::debug!(root = %root.display(), decks = config.decks.len(), "loaded collection");
    Ok(Collection::new(root.to_path_buf(), dir, config))
}

/// Check deck ids and names: ids and names unique, no empty name
/// components, and every nested deck's parent present.
pub fn validate(config: &CollectionConfig) -> Result<(), CollectionError> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for deck in &config.decks {
        if !ids.insert(deck.id) {
            return Err(CollectionError::DuplicateId(deck.id));
        }
        if deck.name_components().iter().any(|c| c.is_empty()) {
            return Err(CollectionError::EmptyName(deck.id));
        }
        if !names.insert(normalize_name(&deck.name)) {
            return Err(CollectionError::DuplicateName(deck.name.clone()));
        }
    }
    for deck in &config.decks {
        if let Some(parent) = deck.ancestor_names().pop()
            && !names.contains(&normalize_name(&parent))
        {
            return Err(CollectionError::MissingParent {
                deck: deck.name.clone(),
                parent,
            });
        }
    }
    Ok(())
}

fn read_collection_text(dir: &Path) -> Result<String, CollectionError> {
    let path = dir.join(COLLECTION_FILE);
    fs::read_to_string(&path).map_err(|e| CollectionError::ReadError { path, source: e })
}

/// Read the collection file as a toml_edit document for round-trip-safe editing.
pub fn read_document(dir: &Path) -> Result<toml_edit::DocumentMut, CollectionError> {
    let text = read_collection_text(dir)?;
    Ok(text.parse()?)
}

/// Write the document back to disk, preserving formatting.
pub fn write_document(dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), CollectionError> {
    atomic_write(&dir.join(COLLECTION_FILE), doc.to_string().as_bytes())?;
    Ok(())
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Set a boolean field on the deck entry with the given id. Decks may be
/// written as `[[decks]]` tables or as an inline `decks = [{ ... }]` array.
/// Returns false when no entry has that id.
pub fn set_deck_flag(doc: &mut toml_edit::DocumentMut, did: DeckId, key: &str, value: bool) -> bool {
    let Some(decks) = doc.get_mut("decks") else {
        return false;
    };
    let matches = |id: Option<&toml_edit::Value>| id.and_then(|v| v.as_integer()) == Some(did.0);

    if let Some(tables) = decks.as_array_of_tables_mut() {
        for table in tables.iter_mut() {
            if matches(table.get("id").and_then(|i| i.as_value())) {
                table[key] = toml_edit::value(value);
                return true;
            }
        }
    } else if let Some(array) = decks.as_array_mut() {
        for table in array.iter_mut().filter_map(|v| v.as_inline_table_mut()) {
            if matches(table.get("id")) {
                table.insert(key, toml_edit::Value::from(value));
                return true;
            }
        }
    }
    false
}

/// Update the top-level `current` deck id
pub fn set_current(doc: &mut toml_edit::DocumentMut, did: DeckId) {
    doc["current"] = toml_edit::value(did.0);
}
