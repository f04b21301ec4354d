use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dv", about = concat!("deckview v", env!("CARGO_PKG_VERSION"), " - your deck tree as a list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different collection directory
    #[arg(short = 'C', long = "collection-dir", global = true)]
    pub collection_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new collection in the current directory
    Init(InitArgs),
    /// Show the visible deck list
    List,
    /// Show the visible row of a deck (or of its nearest visible parent)
    Find(DeckArg),
    /// Show due totals and the time estimate
    Due,
    /// Hide a deck's subdecks
    Collapse(DeckArg),
    /// Show a deck's subdecks
    Expand(DeckArg),
    /// Flip a deck between collapsed and expanded
    Toggle(DeckArg),
    /// Make a deck the current deck
    Select(DeckArg),
}

#[derive(Args)]
pub struct InitArgs {
    /// Create a deck (repeatable); missing parent decks are created too
    #[arg(long)]
    pub deck: Vec<String>,
    /// Overwrite an existing deckview/collection.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct DeckArg {
    /// Deck id or full name (e.g. "Spanish::Verbs")
    pub deck: String,
}
