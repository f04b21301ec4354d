use serde::Serialize;

use crate::model::config::DisplayConfig;
use crate::model::deck::DeckId;
use crate::ops::projector::{DeckList, DueCounts, Expander, VisibleRow};
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct DeckRowJson {
    pub index: usize,
    pub id: DeckId,
    pub name: String,
    pub label: String,
    pub depth: usize,
    pub new: u32,
    pub learn: u32,
    pub review: u32,
    pub expander: Expander,
    pub current: bool,
    pub dynamic: bool,
}

#[derive(Serialize)]
pub struct DeckListJson {
    pub rows: Vec<DeckRowJson>,
    pub totals: DueCounts,
    pub total_due: u32,
    pub eta_minutes: u32,
    pub has_subdecks: bool,
}

#[derive(Serialize)]
pub struct DueJson {
    #[serde(flatten)]
    pub totals: DueCounts,
    pub total: u32,
    pub eta_minutes: u32,
}

#[derive(Serialize)]
pub struct FindJson {
    pub deck: DeckId,
    pub index: usize,
    /// Id of the row at `index`; differs from `deck` when the deck is hidden
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<DeckId>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn row_to_json(index: usize, row: &VisibleRow) -> DeckRowJson {
    let node = row.node;
    DeckRowJson {
        index,
        id: node.id,
        name: node.name.clone(),
        label: node.last_name_component().to_string(),
        depth: node.depth,
        new: node.new_count,
        learn: node.learn_count,
        review: node.review_count,
        expander: row.expander,
        current: row.is_current,
        dynamic: row.is_dynamic,
    }
}

pub fn deck_list_to_json(list: &DeckList, eta_minutes: u32) -> DeckListJson {
    DeckListJson {
        rows: list
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| row_to_json(i, row))
            .collect(),
        totals: list.totals(),
        total_due: list.total_due(),
        eta_minutes,
        has_subdecks: list.has_subdecks(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn expander_char(expander: Expander) -> char {
    match expander {
        Expander::Collapsed => '+',
        Expander::Expanded => '-',
        Expander::None => ' ',
    }
}

/// Indented, truncated deck name for a row
fn row_label(row: &VisibleRow, display: &DisplayConfig) -> String {
    format!(
        "{}{}",
        " ".repeat(row.indent() * display.indent),
        truncate_to_width(row.node.last_name_component(), display.max_name_width)
    )
}

/// Format the deck list, one line per visible row.
///
/// Each line is: current marker (`*`), expander (`+` collapsed, `-`
/// expanded; only when the collection has subdecks), the indented name, and
/// the new/learn/review counts.
pub fn format_deck_list(list: &DeckList, display: &DisplayConfig) -> Vec<String> {
    let labels: Vec<String> = list.rows().iter().map(|row| row_label(row, display)).collect();
    let label_width = labels.iter().map(|l| display_width(l)).max().unwrap_or(0);

    list.rows()
        .iter()
        .zip(&labels)
        .map(|(row, label)| {
            let mut line = String::new();
            line.push(if row.is_current { '*' } else { ' ' });
            if list.has_subdecks() {
                line.push(expander_char(row.expander));
            }
            line.push(' ');
            line.push_str(&pad_to_width(label, label_width));
            line.push_str(&format!(
                "  {:>4} {:>4} {:>4}",
                row.node.new_count, row.node.learn_count, row.node.review_count
            ));
            line
        })
        .collect()
}

/// One-line due summary
pub fn format_due_summary(total: u32, eta_minutes: u32) -> String {
    let noun = if total == 1 { "card" } else { "cards" };
    format!("Due: {} {} (~{} min)", total, noun, eta_minutes)
}

/// Due breakdown for `dv due`
pub fn format_due(totals: DueCounts, eta_minutes: u32) -> Vec<String> {
    vec![
        format!("new: {}", totals.new),
        format!("learn: {}", totals.learn),
        format!("review: {}", totals.review),
        format_due_summary(totals.total(), eta_minutes),
    ]
}

/// Result line for `dv find`. `did` is the deck `query` resolved to; the
/// deck is hidden when the row found for it belongs to another deck.
pub fn format_find(query: &str, did: DeckId, index: usize, row: Option<&VisibleRow>) -> String {
    match row {
        Some(row) if row.id() == did => format!("{}: {}", index, row.node.name),
        Some(row) => format!("{}: {} (\"{}\" is hidden)", index, row.node.name, query),
        None => format!("{}: (no visible decks)", index),
    }
}
