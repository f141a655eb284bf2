//! Game rules and the engine that enforces them.
//!
//! ## Key Types
//!
//! - `GameEngine`: owns the table and exposes every operation
//! - `Destination`: an empty pile or a card to stack onto
//! - `Layout`: an explicit position for `GameEngine::arrange`
//!
//! `valid_for_placement` and `valid_for_target` are the pure stacking rules;
//! the engine adds availability and occupancy checks on top of them.

pub mod engine;
pub mod layout;
pub mod validate;

pub use engine::{Destination, GameEngine, Playable};
pub use layout::{ColumnLayout, Layout};
pub use validate::{valid_for_placement, valid_for_target};
