pub mod collection;
pub mod config;
pub mod deck;

pub use collection::*;
pub use config::*;
pub use deck::*;
