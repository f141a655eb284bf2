//! Move records and the undo ledger.
//!
//! The ledger only stores history. Reversing a move mutates the card graph,
//! so that happens in `rules::GameEngine::undo`.

pub mod history;
pub mod moves;

pub use history::{Entry, Ledger};
pub use moves::{Advance, Exposure, Move, Transition};
