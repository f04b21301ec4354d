//! Deck tree → visible deck list projection.
//!
//! [`build`] walks a forest of [`DeckNode`]s in pre-order and produces a
//! [`DeckList`]: the rows a deck picker shows, the due totals of the visible
//! top-level decks, and whether the collection has any subdecks at all.
//! Visibility is decided per node by asking a [`DeckMetadata`] source, so the
//! projection stays free of storage concerns.

use std::fmt;

use serde::Serialize;

use crate::model::deck::{DEFAULT_DECK_ID, DeckId, DeckNode};
use crate::ops::eta::EtaEstimator;

/// Read-only view of the deck metadata the projection depends on.
pub trait DeckMetadata {
    /// Whether the deck's children are hidden
    fn is_collapsed(&self, did: DeckId) -> bool;
    /// Ancestor chain, farthest first: the root comes first and the
    /// immediate parent last. Empty for top-level and unknown decks.
    fn parents(&self, did: DeckId) -> Vec<DeckId>;
    /// Whether any card is assigned to the deck
    fn has_cards(&self, did: DeckId) -> bool;
    /// Whether the deck is a filtered (dynamic) deck
    fn is_dynamic(&self, did: DeckId) -> bool;
    /// The currently selected deck
    fn current_deck(&self) -> DeckId;
}

/// Expand/collapse affordance for a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Expander {
    /// Deck is collapsed; its children are hidden
    Collapsed,
    /// Deck has children and they are shown
    Expanded,
    /// Leaf deck
    None,
}

/// One visible row of the deck list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow<'t> {
    pub node: &'t DeckNode,
    pub expander: Expander,
    pub is_current: bool,
    pub is_dynamic: bool,
}

impl VisibleRow<'_> {
    pub fn id(&self) -> DeckId {
        self.node.id
    }

    /// Indentation in nesting levels
    pub fn indent(&self) -> usize {
        self.node.depth
    }
}

/// New / learning / review due counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DueCounts {
    pub new: u32,
    pub learn: u32,
    pub review: u32,
}

impl DueCounts {
    pub fn new(new: u32, learn: u32, review: u32) -> Self {
        DueCounts { new, learn, review }
    }

    fn add_node(&mut self, node: &DeckNode) {
        self.new = self.new.saturating_add(node.new_count);
        self.learn = self.learn.saturating_add(node.learn_count);
        self.review = self.review.saturating_add(node.review_count);
    }

    pub fn total(&self) -> u32 {
        self.new.saturating_add(self.learn).saturating_add(self.review)
    }

    pub fn as_array(&self) -> [u32; 3] {
        [self.new, self.learn, self.review]
    }
}

/// The result of one projection.
///
/// Borrows the tree it was built from and the metadata source, which is
/// consulted again by [`DeckList::visible_row_index`].
pub struct DeckList<'t, 'm> {
    rows: Vec<VisibleRow<'t>>,
    totals: DueCounts,
    has_subdecks: bool,
    source: &'m dyn DeckMetadata,
}

impl fmt::Debug for DeckList<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckList")
            .field("rows", &self.rows)
            .field("totals", &self.totals)
            .field("has_subdecks", &self.has_subdecks)
            .finish_non_exhaustive()
    }
}

/// Project a deck forest into its visible deck list.
///
/// Rules, applied to each node in pre-order:
/// - the default deck is skipped when it has no children, no cards, and is
///   not the only deck in its sibling list;
/// - when any ancestor of a node is collapsed, that node and the remaining
///   nodes of its sibling list are skipped, and the walk resumes with the
///   next sibling one level up;
/// - top-level rows add their counts to the totals.
pub fn build<'t, 'm>(nodes: &'t [DeckNode], source: &'m dyn DeckMetadata) -> DeckList<'t, 'm> {
    let current = source.current_deck();
    let mut rows = Vec::new();
    let mut totals = DueCounts::default();
    let mut has_subdecks = false;

    // One entry per open sibling list: (sibling count, remaining siblings)
    let mut stack = vec![(nodes.len(), nodes.iter())];

    while let Some((siblings, level)) = stack.last_mut() {
        let siblings = *siblings;
        let Some(node) = level.next() else {
            stack.pop();
            continue;
        };

        if is_hidden_default_deck(node, siblings, source) {
            continue;
        }

        let parents = source.parents(node.id);
        if !parents.is_empty() {
            has_subdecks = true;
        }
        if parents.iter().any(|&p| source.is_collapsed(p)) {
            // Abandon the rest of this sibling list
            stack.pop();
            continue;
        }

        let expander = if source.is_collapsed(node.id) {
            Expander::Collapsed
        } else if node.has_children() {
            Expander::Expanded
        } else {
            Expander::None
        };
        rows.push(VisibleRow {
            node,
            expander,
            is_current: node.id == current,
            is_dynamic: source.is_dynamic(node.id),
        });

        if node.depth == 0 {
            totals.add_node(node);
        }

        if node.has_children() {
            stack.push((node.children.len(), node.children.iter()));
        }
    }

    tracing::debug!(
        rows = rows.len(),
        has_subdecks,
        due = totals.total(),
        "built deck list"
    );

    DeckList {
        rows,
        totals,
        has_subdecks,
        source,
    }
}

/// An empty default deck is noise unless it is all there is.
fn is_hidden_default_deck(node: &DeckNode, siblings: usize, source: &dyn DeckMetadata) -> bool {
    node.id == DEFAULT_DECK_ID
        && siblings > 1
        && !node.has_children()
        && !source.has_cards(node.id)
}

impl<'t> DeckList<'t, '_> {
    pub fn rows(&self) -> &[VisibleRow<'t>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Due totals of the visible top-level decks
    pub fn totals(&self) -> DueCounts {
        self.totals
    }

    /// Whether any visited deck has a parent, collapsed or not
    pub fn has_subdecks(&self) -> bool {
        self.has_subdecks
    }

    pub fn total_due(&self) -> u32 {
        self.totals.total()
    }

    /// Estimated minutes to finish everything due today
    pub fn eta(&self, estimator: &dyn EtaEstimator) -> u32 {
        estimator.eta(self.totals.as_array())
    }

    /// Row index of the deck, if it is visible
    pub fn position(&self, did: DeckId) -> Option<usize> {
        self.rows.iter().position(|row| row.node.id == did)
    }

    /// Row index of the deck, or of its nearest visible ancestor when it is
    /// hidden. Unknown decks without ancestors map to row 0.
    ///
    /// The ancestor chain must be acyclic.
    pub fn visible_row_index(&self, did: DeckId) -> usize {
        let mut did = did;
        loop {
            if let Some(index) = self.position(did) {
                return index;
            }
            match self.source.parents(did).last() {
                Some(&parent) => {
                    tracing::trace!(%did, %parent, "deck hidden, trying parent");
                    did = parent;
                }
                None => return 0,
            }
        }
    }
}
