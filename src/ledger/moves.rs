//! Move records.
//!
//! A `Move` is an immutable record of one accepted placement: which card,
//! where it came from and went, which card it was stacked on before and
//! after, and its revealed flag before and after. Side effects of the move
//! (a tableau card flipped face-up, a stock card auto-advanced into an
//! emptied waste) are recorded alongside so undo can reverse them exactly.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, Face, Placement};

/// A before/after pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition<T> {
    pub from: T,
    pub to: T,
}

impl<T: PartialEq> Transition<T> {
    #[must_use]
    pub fn new(from: T, to: T) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

impl Transition<bool> {
    /// `false → true`.
    #[must_use]
    pub fn turned_on(&self) -> bool {
        !self.from && self.to
    }
}

/// A card turned face-up because the card covering it moved away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exposure {
    pub card: CardId,
    pub face: Transition<Face>,
    pub revealed: Transition<bool>,
}

/// A stock card turned into an emptied waste.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advance {
    pub card: CardId,
    pub revealed: Transition<bool>,
}

/// One accepted placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Sequence number, unique within a game.
    pub id: u32,

    pub card: CardId,
    pub placement: Transition<Placement>,
    pub parent: Transition<Option<CardId>>,
    pub revealed: Transition<bool>,

    /// Card flipped face-up in the vacated tableau column.
    pub exposed: Option<Exposure>,

    /// Stock card auto-advanced into the emptied waste.
    pub advanced: Option<Advance>,

    /// Game clock (elapsed seconds) when recorded.
    pub at: u64,
}

impl Move {
    /// Cards whose revealed flag turned on with this move.
    #[must_use]
    pub fn reveals(&self) -> usize {
        usize::from(self.revealed.turned_on())
            + self.exposed.map_or(0, |e| usize::from(e.revealed.turned_on()))
            + self.advanced.map_or(0, |a| usize::from(a.revealed.turned_on()))
    }

    /// Every card whose state this move touched.
    #[must_use]
    pub fn touched(&self) -> Vec<CardId> {
        let mut cards = vec![self.card];
        cards.extend(self.parent.from);
        cards.extend(self.parent.to);
        cards.extend(self.exposed.map(|e| e.card));
        cards.extend(self.advanced.map(|a| a.card));
        cards
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {}: {} -> {}",
            self.id, self.card, self.placement.from, self.placement.to
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, Rank, Suit};

    fn sample() -> Move {
        let card = CardId::new(Suit::Hearts, Rank::Ace);
        Move {
            id: 3,
            card,
            placement: Transition::new(Placement::Tableau(Column::Two), Placement::Foundation(Suit::Hearts)),
            parent: Transition::new(Some(CardId::new(Suit::Clubs, Rank::Nine)), None),
            revealed: Transition::new(true, true),
            exposed: Some(Exposure {
                card: CardId::new(Suit::Clubs, Rank::Nine),
                face: Transition::new(Face::Down, Face::Up),
                revealed: Transition::new(false, true),
            }),
            advanced: None,
            at: 12,
        }
    }

    #[test]
    fn test_transition() {
        assert!(Transition::new(false, true).turned_on());
        assert!(!Transition::new(true, true).turned_on());
        assert!(!Transition::new(true, false).turned_on());
        assert!(Transition::new(Placement::Stock, Placement::Waste).changed());
    }

    #[test]
    fn test_reveals_counts_side_effects() {
        let mv = sample();
        assert_eq!(mv.reveals(), 1);
    }

    #[test]
    fn test_touched() {
        let mv = sample();
        assert_eq!(
            mv.touched(),
            vec![
                CardId::new(Suit::Hearts, Rank::Ace),
                CardId::new(Suit::Clubs, Rank::Nine),
                CardId::new(Suit::Clubs, Rank::Nine),
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "#3 A♥: tableau(2) -> foundation(♥)");
    }

    #[test]
    fn test_serialization() {
        let mv = sample();
        let json = serde_json::to_string(&mv).unwrap();
        let deserialized: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(mv, deserialized);
    }
}
