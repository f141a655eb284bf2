//! Core engine types: cards, placements, RNG, configuration, state, errors.
//!
//! Everything here is plain data. Mutation rules live in `rules`.

pub mod card;
pub mod placement;
pub mod rng;
pub mod config;
pub mod state;
pub mod error;

pub use card::{Card, CardId, Face, Pair, Rank, Suit};
pub use placement::{Column, Placement};
pub use rng::{GameRng, GameRngState};
pub use config::{EngineConfig, ScoringConfig};
pub use state::{GameState, Status, StatusKind};
pub use error::{InvalidCardId, Rejection, SnapshotError};
