//! Explicit table positions.
//!
//! A `Layout` lists the cards of each placement bottom to top. Shells use
//! it to load puzzles; tests use it to set up exact scenarios. Layouts are
//! trusted: stacking rules are not re-checked when a layout is arranged.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, Column, Suit};

/// Cards of one tableau column: face-down cards, then face-up cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub hidden: Vec<CardId>,
    pub visible: Vec<CardId>,
}

/// A full or partial table position.
///
/// ```
/// use canfield_engine::core::{CardId, Column, Rank, Suit};
/// use canfield_engine::rules::Layout;
///
/// let layout = Layout::new()
///     .stock([CardId::new(Suit::Clubs, Rank::Two)])
///     .tableau(Column::One, [], [CardId::new(Suit::Hearts, Rank::King)])
///     .foundation(Suit::Spades, [CardId::new(Suit::Spades, Rank::Ace)]);
///
/// assert_eq!(layout.card_count(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub stock: Vec<CardId>,
    pub waste: Vec<CardId>,
    pub foundations: Vec<(Suit, Vec<CardId>)>,
    pub tableau: Vec<(Column, ColumnLayout)>,
}

impl Layout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stock cards, bottom first. All face down.
    #[must_use]
    pub fn stock(mut self, cards: impl IntoIterator<Item = CardId>) -> Self {
        self.stock = cards.into_iter().collect();
        self
    }

    /// Waste cards, bottom first. All face up.
    #[must_use]
    pub fn waste(mut self, cards: impl IntoIterator<Item = CardId>) -> Self {
        self.waste = cards.into_iter().collect();
        self
    }

    /// Foundation cards for `suit`, bottom first.
    #[must_use]
    pub fn foundation(mut self, suit: Suit, cards: impl IntoIterator<Item = CardId>) -> Self {
        self.foundations.retain(|(s, _)| *s != suit);
        self.foundations.push((suit, cards.into_iter().collect()));
        self
    }

    /// A tableau column: `hidden` face-down cards under `visible` face-up cards.
    #[must_use]
    pub fn tableau(
        mut self,
        column: Column,
        hidden: impl IntoIterator<Item = CardId>,
        visible: impl IntoIterator<Item = CardId>,
    ) -> Self {
        self.tableau.retain(|(c, _)| *c != column);
        self.tableau.push((
            column,
            ColumnLayout {
                hidden: hidden.into_iter().collect(),
                visible: visible.into_iter().collect(),
            },
        ));
        self
    }

    /// Number of card slots listed, duplicates included.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.stock.len()
            + self.waste.len()
            + self.foundations.iter().map(|(_, c)| c.len()).sum::<usize>()
            + self
                .tableau
                .iter()
                .map(|(_, c)| c.hidden.len() + c.visible.len())
                .sum::<usize>()
    }
}
