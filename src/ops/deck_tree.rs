use std::iter::Peekable;

use crate::model::collection::Collection;
use crate::model::deck::{Deck, DeckNode};

/// Build the due tree of a collection.
///
/// Siblings are ordered by name, case-insensitively. Each node's counts
/// include the counts of all its descendants.
pub fn due_tree(collection: &Collection) -> Vec<DeckNode> {
    let mut decks: Vec<&Deck> = collection.decks.values().collect();
    decks.sort_by_cached_key(|d| {
        d.name_components()
            .iter()
            .map(|c| c.to_lowercase())
            .collect::<Vec<_>>()
    });
    let mut decks = decks.into_iter().peekable();
    group_children(&mut decks, 0)
}

fn group_children<'a, I>(decks: &mut Peekable<I>, depth: usize) -> Vec<DeckNode>
where
    I: Iterator<Item = &'a Deck>,
{
    let mut nodes = Vec::new();
    while let Some(deck) = decks.next_if(|d| deck_depth(d) >= depth) {
        let own_depth = deck_depth(deck);
        let mut node =
            DeckNode::new(deck.id, deck.name.clone(), own_depth).with_counts(deck.new, deck.learn, deck.review);
        node.children = group_children(decks, own_depth + 1);
        for child in &node.children {
            node.new_count = node.new_count.saturating_add(child.new_count);
            node.learn_count = node.learn_count.saturating_add(child.learn_count);
            node.review_count = node.review_count.saturating_add(child.review_count);
        }
        nodes.push(node);
    }
    nodes
}

fn deck_depth(deck: &Deck) -> usize {
    deck.name_components().len() - 1
}
