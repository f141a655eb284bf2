//! Scoring and progress.
//!
//! Score deltas are derived purely from a `Move` record and the configured
//! point values. Progress predicates read the zone index and card arena.

use serde::{Deserialize, Serialize};

use crate::cards::CardArena;
use crate::core::{CardId, Placement, Rank, ScoringConfig};
use crate::ledger::Move;
use crate::zones::ZoneManager;

/// Score change for one recorded move.
///
/// ```
/// use canfield_engine::core::{CardId, Column, Placement, Rank, ScoringConfig, Suit};
/// use canfield_engine::ledger::{Move, Transition};
/// use canfield_engine::scoring::score_move;
///
/// let ace = CardId::new(Suit::Spades, Rank::Ace);
/// let mv = Move {
///     id: 1,
///     card: ace,
///     placement: Transition::new(Placement::Tableau(Column::One), Placement::Foundation(Suit::Spades)),
///     parent: Transition::new(None, None),
///     revealed: Transition::new(true, true),
///     exposed: None,
///     advanced: None,
///     at: 0,
/// };
///
/// assert_eq!(score_move(&ScoringConfig::default(), &mv), 50);
/// ```
#[must_use]
pub fn score_move(config: &ScoringConfig, mv: &Move) -> i64 {
    let rank = mv.card.rank();
    let mut delta = config.reveal * mv.reveals() as i64;

    if mv.placement.to.is_foundation() {
        delta += if rank == Rank::Ace {
            config.foundation_ace
        } else {
            config.foundation
        };
    }

    if mv.placement.to.is_tableau() && rank == Rank::King && mv.parent.to.is_none() {
        delta += config.king_to_empty;
    }

    if mv.placement.from.is_foundation() {
        delta -= if rank == Rank::Ace {
            config.leave_foundation_ace
        } else {
            config.leave_foundation
        };
    }

    delta
}

/// Every foundation is topped by a king.
#[must_use]
pub fn completed(zones: &ZoneManager) -> bool {
    Placement::foundations().all(|f| zones.top(f).is_some_and(|top| top.rank() == Rank::King))
}

/// Every card has been face-up at least once.
#[must_use]
pub fn autocompletable(arena: &CardArena) -> bool {
    arena.revealed_count() >= CardId::COUNT
}

/// Summary of how far a game has come.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Cards revealed at least once.
    pub revealed: usize,

    /// Cards on foundations.
    pub founded: usize,

    pub autocompletable: bool,
    pub completed: bool,
}

impl Progress {
    #[must_use]
    pub fn measure(arena: &CardArena, zones: &ZoneManager) -> Self {
        Self {
            revealed: arena.revealed_count(),
            founded: Placement::foundations().map(|f| zones.len(f)).sum(),
            autocompletable: autocompletable(arena),
            completed: completed(zones),
        }
    }
}
