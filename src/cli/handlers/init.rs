use std::fs;

use super::start_dir;
use crate::cli::commands::InitArgs;
use crate::io::collection_io::{self, COLLECTION_DIR, COLLECTION_FILE};
use crate::model::collection::normalize_name;
use crate::model::config::CollectionConfig;
use crate::model::deck::{DEFAULT_DECK_ID, DECK_NAME_SEPARATOR, split_deck_name};

const COLLECTION_TOML_TEMPLATE: &str = r##"# Currently selected deck
current = 1

# Average seconds per card, used for the time estimate.
[scheduler]
secs_new = 30
secs_learn = 20
secs_review = 10

[display]
# spaces per nesting level
indent = 2
# longer deck names are truncated with …
max_name_width = 40

# --- Decks ---
# Nested decks use "::" in their name. Every parent must exist.
#
# [[decks]]
# id = 2
# name = "Spanish::Verbs"
# cards = 0
# new = 0
# learn = 0
# review = 0
# collapsed = false
# filtered = false

[[decks]]
id = 1
name = "Default"
"##;

/// Expand requested deck names into a list that also contains every
/// missing ancestor, parents before children, without duplicates.
fn expand_deck_names(names: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::from([normalize_name("Default")]);
    let mut result = Vec::new();
    for name in names {
        let components = split_deck_name(name);
        for n in 1..=components.len() {
            let prefix = components[..n].join(DECK_NAME_SEPARATOR);
            if seen.insert(normalize_name(&prefix)) {
                result.push(prefix);
            }
        }
    }
    result
}

/// Render collection.toml with the default deck plus the given decks.
fn render_collection_toml(names: &[String]) -> Result<String, toml_edit::TomlError> {
    let mut doc: toml_edit::DocumentMut = COLLECTION_TOML_TEMPLATE.parse()?;
    if let Some(decks) = doc["decks"].as_array_of_tables_mut() {
        for (i, name) in names.iter().enumerate() {
            let mut table = toml_edit::Table::new();
            table["id"] = toml_edit::value(DEFAULT_DECK_ID.0 + 1 + i as i64);
            table["name"] = toml_edit::value(name.as_str());
            decks.push(table);
        }
    }
    Ok(doc.to_string())
}

pub fn cmd_init(args: InitArgs, dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = start_dir(dir)?;
    let collection_dir = root.join(COLLECTION_DIR);
    let path = collection_dir.join(COLLECTION_FILE);

    if path.exists() && !args.force {
        return Err(format!(
            "collection already exists in ./{}/ (use --force to overwrite)",
            COLLECTION_DIR
        )
        .into());
    }

    let names = expand_deck_names(&args.deck);
    let content = render_collection_toml(&names)?;

    // Refuse to write a file that would not load
    let config: CollectionConfig = toml::from_str(&content)?;
    collection_io::validate(&config)?;

    fs::create_dir_all(&collection_dir)?;
    collection_io::atomic_write(&path, content.as_bytes())?;
    tracing::info!(path = %path.display(), decks = config.decks.len(), "initialized collection");

    println!("Initialized collection in ./{}/", COLLECTION_DIR);
    for deck in config.decks.iter().filter(|d| d.id != DEFAULT_DECK_ID) {
        println!("  deck: {} ({})", deck.name, deck.id);
    }
    Ok(())
}
