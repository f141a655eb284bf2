//! Card set: deck factory and the card arena.
//!
//! ## Key Types
//!
//! - `Deck`: builds the 52 cards and produces shuffled orderings
//! - `CardArena`: owns every `Card` and the parent/child stacking links

pub mod arena;
pub mod deck;

pub use arena::CardArena;
pub use deck::Deck;
