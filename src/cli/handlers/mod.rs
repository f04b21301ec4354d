mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::collection_io::{self, CollectionError};
use crate::model::collection::Collection;
use crate::model::deck::DeckId;
use crate::ops::deck_ops::{self, DeckOpError};
use crate::ops::deck_tree::due_tree;
use crate::ops::eta::SecondsPerCard;
use crate::ops::projector;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let dir = cli.collection_dir.as_deref();

    match cli.command {
        // Init is normally handled in main.rs; it never discovers a collection
        Commands::Init(args) => cmd_init(args, dir),

        // Read commands
        Commands::List => cmd_list(&start_dir(dir)?, json),
        Commands::Find(arg) => cmd_find(&start_dir(dir)?, arg, json),
        Commands::Due => cmd_due(&start_dir(dir)?, json),

        // Write commands
        Commands::Collapse(arg) => cmd_set_collapsed(&start_dir(dir)?, arg, Some(true)),
        Commands::Expand(arg) => cmd_set_collapsed(&start_dir(dir)?, arg, Some(false)),
        Commands::Toggle(arg) => cmd_set_collapsed(&start_dir(dir)?, arg, None),
        Commands::Select(arg) => cmd_select(&start_dir(dir)?, arg),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Directory to start collection discovery from (`-C` or the cwd)
pub(crate) fn start_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn load_collection_from(start: &Path) -> Result<Collection, CollectionError> {
    let root = collection_io::discover_collection(start)?;
    collection_io::load_collection(&root)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn deck_name(collection: &Collection, did: DeckId) -> String {
    collection
        .deck(did)
        .map(|d| d.name.clone())
        .unwrap_or_else(|| did.to_string())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(start: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let collection = load_collection_from(start)?;
    let tree = due_tree(&collection);
    let list = projector::build(&tree, &collection);
    let eta = list.eta(&SecondsPerCard::from(collection.scheduler));

    if json {
        return print_json(&deck_list_to_json(&list, eta));
    }

    if list.is_empty() {
        println!("No decks.");
        return Ok(());
    }
    for line in format_deck_list(&list, &collection.display) {
        println!("{}", line);
    }
    println!();
    println!("{}", format_due_summary(list.total_due(), eta));
    Ok(())
}

fn cmd_find(start: &Path, arg: DeckArg, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let collection = load_collection_from(start)?;
    // Unknown numeric ids are allowed: they resolve to the first row
    let did = match collection.resolve(&arg.deck) {
        Some(did) => did,
        None => arg
            .deck
            .parse::<DeckId>()
            .map_err(|_| DeckOpError::NotFound(arg.deck.clone()))?,
    };

    let tree = due_tree(&collection);
    let list = projector::build(&tree, &collection);
    let index = list.visible_row_index(did);
    let row = list.rows().get(index);
    tracing::debug!(%did, index, "resolved visible row");

    if json {
        return print_json(&FindJson {
            deck: did,
            index,
            row: row.map(|r| r.id()),
        });
    }
    println!("{}", format_find(&arg.deck, did, index, row));
    Ok(())
}

fn cmd_due(start: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let collection = load_collection_from(start)?;
    let tree = due_tree(&collection);
    let list = projector::build(&tree, &collection);
    let eta = list.eta(&SecondsPerCard::from(collection.scheduler));

    if json {
        return print_json(&DueJson {
            totals: list.totals(),
            total: list.total_due(),
            eta_minutes: eta,
        });
    }
    for line in format_due(list.totals(), eta) {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

/// Collapse (`Some(true)`), expand (`Some(false)`) or toggle (`None`) a deck.
fn cmd_set_collapsed(
    start: &Path,
    arg: DeckArg,
    state: Option<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut collection = load_collection_from(start)?;
    let did = deck_ops::resolve_deck(&collection, &arg.deck)?;
    let mut doc = collection_io::read_document(&collection.dir)?;

    let collapsed = match state {
        Some(collapsed) => {
            deck_ops::set_collapsed(&mut doc, &mut collection, did, collapsed)?;
            collapsed
        }
        None => deck_ops::toggle_collapsed(&mut doc, &mut collection, did)?,
    };
    collection_io::write_document(&collection.dir, &doc)?;
    tracing::info!(%did, collapsed, "updated collapse state");

    let verb = if collapsed { "Collapsed" } else { "Expanded" };
    println!("{} {}", verb, deck_name(&collection, did));
    Ok(())
}

fn cmd_select(start: &Path, arg: DeckArg) -> Result<(), Box<dyn std::error::Error>> {
    let mut collection = load_collection_from(start)?;
    let did = deck_ops::resolve_deck(&collection, &arg.deck)?;
    let mut doc = collection_io::read_document(&collection.dir)?;

    deck_ops::select_deck(&mut doc, &mut collection, did)?;
    collection_io::write_document(&collection.dir, &doc)?;
    tracing::info!(%did, "selected deck");

    println!("Selected {}", deck_name(&collection, did));
    Ok(())
}
