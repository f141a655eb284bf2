//! Card arena and stacking links.
//!
//! Cards are stored by stable id. Stacking is expressed as nullable
//! `parent`/`child` ids rather than references, so the links form
//! disjoint chains (one per waste/foundation/tableau pile, bottom to top).
//!
//! `link` and `unlink` update both ends together. They are crate-private:
//! only the rules engine may restructure chains.

use std::ops::Index;

use crate::core::{Card, CardId};

/// All 52 cards, indexed by `CardId`.
#[derive(Clone, Debug)]
pub struct CardArena {
    cards: Vec<Card>,
}

impl CardArena {
    /// Build an arena from a complete deck.
    ///
    /// Panics if the deck does not contain every id exactly once.
    #[must_use]
    pub fn new(mut cards: Vec<Card>) -> Self {
        cards.sort_by_key(|c| c.id);
        assert_eq!(cards.len(), CardId::COUNT, "arena requires a full deck");
        for (i, card) in cards.iter().enumerate() {
            assert_eq!(card.id.index(), i, "duplicate or missing card {}", card.id);
        }
        Self { cards }
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> &Card {
        &self.cards[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: CardId) -> &mut Card {
        &mut self.cards[id.index()]
    }

    /// All cards in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.cards.iter_mut()
    }

    /// Stack `child` on `parent`. The parent stops being available.
    pub(crate) fn link(&mut self, parent: CardId, child: CardId) {
        debug_assert_ne!(parent, child);
        debug_assert!(self.get(parent).child.is_none(), "{} already covered", parent);

        let p = self.get_mut(parent);
        p.child = Some(child);
        p.available = false;

        self.get_mut(child).parent = Some(parent);
    }

    /// Lift `child` off its parent. The former parent becomes available.
    ///
    /// Returns the former parent, if any.
    pub(crate) fn unlink(&mut self, child: CardId) -> Option<CardId> {
        let parent = self.get_mut(child).parent.take()?;

        let p = self.get_mut(parent);
        p.child = None;
        p.available = true;

        Some(parent)
    }

    /// Reset every card's mutable state.
    pub(crate) fn reset(&mut self) {
        for card in &mut self.cards {
            card.reset();
        }
    }

    /// Cards that have been face-up at least once.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.cards.iter().filter(|c| c.revealed).count()
    }

    /// Walk a chain upward from `bottom`.
    pub fn chain(&self, bottom: CardId) -> impl Iterator<Item = CardId> + '_ {
        std::iter::successors(Some(bottom), move |&id| self.get(id).child)
    }

    /// Every link agrees with its other end and no chain cycles.
    #[must_use]
    pub fn links_consistent(&self) -> bool {
        for card in &self.cards {
            if let Some(child) = card.child {
                if self.get(child).parent != Some(card.id) {
                    return false;
                }
            }
            if let Some(parent) = card.parent {
                if self.get(parent).child != Some(card.id) {
                    return false;
                }
            }
            // A chain can never be longer than the deck.
            if self.chain(card.id).take(CardId::COUNT + 1).count() > CardId::COUNT {
                return false;
            }
        }
        true
    }
}

impl Index<CardId> for CardArena {
    type Output = Card;

    fn index(&self, id: CardId) -> &Self::Output {
        self.get(id)
    }
}
