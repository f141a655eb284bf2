//! Render-facing state.
//!
//! `Snapshot` is what a rendering layer reads: every card's zone, order,
//! face, availability and links, plus the status counters and lifecycle
//! state. It serializes with serde; `encode`/`decode` use bincode.

use serde::{Deserialize, Serialize};

use crate::core::{Card, CardId, Face, GameState, Placement, Rank, SnapshotError, Status, Suit};

/// Published state of one card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,
    pub placement: Placement,
    pub order: u32,
    pub face: Face,
    pub available: bool,
    pub revealed: bool,
    pub parent: Option<CardId>,
    pub child: Option<CardId>,
    pub moving: bool,
    pub matched: bool,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            suit: card.suit,
            rank: card.rank,
            placement: card.placement,
            order: card.order,
            face: card.face,
            available: card.available,
            revealed: card.revealed,
            parent: card.parent,
            child: card.child,
            moving: card.moving,
            matched: card.matched,
        }
    }
}

/// Full published engine state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: GameState,
    pub status: Status,

    /// All 52 cards, in identity order.
    pub cards: Vec<CardView>,
}

impl Snapshot {
    #[must_use]
    pub fn card(&self, id: CardId) -> &CardView {
        &self.cards[id.index()]
    }

    /// Cards in a placement, bottom first.
    #[must_use]
    pub fn pile(&self, placement: Placement) -> Vec<CardView> {
        let mut pile: Vec<_> = self
            .cards
            .iter()
            .filter(|c| c.placement == placement)
            .copied()
            .collect();
        pile.sort_by_key(|c| c.order);
        pile
    }

    /// Encode with bincode.
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
