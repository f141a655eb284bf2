//! Placement legality.
//!
//! Pure rank/suit rules. Zone occupancy and availability are checked by the
//! engine before these are consulted.

use crate::core::{Card, Placement, Rank};

/// May `card` start a new pile on `placement`?
///
/// Tableau columns are started by kings; a foundation by the ace of its suit.
#[must_use]
pub fn valid_for_placement(card: &Card, placement: Placement) -> bool {
    match placement {
        Placement::Tableau(_) => card.rank == Rank::King,
        Placement::Foundation(suit) => card.rank == Rank::Ace && card.suit == suit,
        _ => false,
    }
}

/// May `card` be stacked on `target`?
///
/// - tableau: opposite pair, exactly one rank below the target
/// - foundation: same suit, exactly one rank above the target
#[must_use]
pub fn valid_for_target(card: &Card, target: &Card) -> bool {
    match target.placement {
        Placement::Tableau(_) => {
            target.suit.pair() != card.suit.pair() && target.rank.previous() == Some(card.rank)
        }
        Placement::Foundation(_) => {
            target.suit == card.suit && target.rank.next() == Some(card.rank)
        }
        _ => false,
    }
}
