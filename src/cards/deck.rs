//! Deck factory.
//!
//! Builds the 52-card set once per engine and produces shuffled orderings
//! of card ids for each new game.

use rustc_hash::FxHashSet;

use crate::core::{Card, CardId, GameRng, Rank, Suit};

/// Builds and shuffles the standard 52-card deck.
pub struct Deck;

impl Deck {
    /// Every `(suit, rank)` pair exactly once, in identity order.
    ///
    /// Cards start outside every zone, face down and unavailable.
    #[must_use]
    pub fn build() -> Vec<Card> {
        let mut seen = FxHashSet::default();
        let mut cards = Vec::with_capacity(CardId::COUNT);

        for suit in Suit::ALL {
            for rank in Rank::ALL {
                let card = Card::new(suit, rank);
                if !seen.insert(card.id) {
                    continue;
                }
                cards.push(card);
            }
        }

        cards
    }

    /// Uniform random permutation of `ids`.
    #[must_use]
    pub fn shuffle(mut ids: Vec<CardId>, rng: &mut GameRng) -> Vec<CardId> {
        rng.shuffle(&mut ids);
        ids
    }

    /// A freshly shuffled ordering of all 52 ids.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Vec<CardId> {
        Self::shuffle(CardId::all().collect(), rng)
    }
}
