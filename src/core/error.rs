//! Reasons an operation declined.
//!
//! Public engine operations never fail loudly: they return `false` and leave
//! state untouched. `Rejection` names why, for the `try_*` variants and for
//! debug logging.

use super::card::CardId;
use super::placement::Placement;
use super::state::GameState;

/// A raw card key outside `1..=52`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("card id {0} is out of range")]
pub struct InvalidCardId(pub u8);

/// Why an engine operation made no change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("moves are not accepted while {0}")]
    NotPlaying(GameState),

    #[error("operation requires state {expected}, engine is {actual}")]
    WrongState {
        expected: GameState,
        actual: GameState,
    },

    #[error("{0} has a card on top of it")]
    Unavailable(CardId),

    #[error("{0} is face down")]
    FaceDown(CardId),

    #[error("{card} cannot move out of {placement}")]
    NotMovable { card: CardId, placement: Placement },

    #[error("{card} cannot be placed on {placement}")]
    IllegalPlacement { card: CardId, placement: Placement },

    #[error("{card} cannot be stacked on {target}")]
    IllegalTarget { card: CardId, target: CardId },

    #[error("{0} is already on that pile")]
    SamePile(CardId),

    #[error("{0} is not the top of the stock")]
    NotStockTop(CardId),

    #[error("{0} has no legal destination")]
    NoDestination(CardId),

    #[error("waste is empty")]
    EmptyWaste,

    #[error("nothing to undo")]
    EmptyLedger,
}

/// Failure encoding or decoding an engine snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),
}
