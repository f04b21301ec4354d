pub mod deck_ops;
pub mod deck_tree;
pub mod eta;
pub mod projector;
