//! Foundation-only finish.
//!
//! Once every card has been revealed, the game can be finished by sending
//! cards to foundations in rank order. Each tick rotates through the suits
//! promoting whatever is next, and draws from stock when no suit can move.

use tracing::trace;

use crate::core::{CardId, Suit};
use crate::rules::{Destination, GameEngine};

use super::DrawCycle;

/// Autocomplete state carried between ticks.
#[derive(Clone, Debug)]
pub struct Autocomplete {
    /// Suit tried first on the next promotion.
    suit: Suit,
    cycle: DrawCycle,
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self {
            suit: Suit::Diamonds,
            cycle: DrawCycle::default(),
        }
    }
}

impl Autocomplete {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Run one tick. Returns `false` when the game is over, not yet
    /// autocompletable, or stuck.
    pub fn step(&mut self, engine: &mut GameEngine) -> bool {
        if !engine.state().is_playing() || engine.completed() || !engine.autocompletable() {
            return false;
        }
        self.cycle.observe(engine);
        let progressed = self.tick(engine);
        self.cycle.settle(engine);
        progressed
    }

    fn tick(&mut self, engine: &mut GameEngine) -> bool {
        let batch = engine.config().autoplay_batch;
        let mut promoted = 0;
        let mut misses = 0;

        while promoted < batch && misses < Suit::ALL.len() {
            let suit = self.suit;
            self.suit = suit.next();

            match promotable(engine, suit) {
                Some((card, destination)) if engine.place(card, destination) => {
                    promoted += 1;
                    misses = 0;
                }
                _ => misses += 1,
            }
        }

        if promoted > 0 {
            trace!(promoted, "autocomplete tick");
            self.cycle.progressed();
            return true;
        }
        self.cycle.draw(engine)
    }
}

/// The playable card of `suit` that its foundation takes next.
fn promotable(engine: &GameEngine, suit: Suit) -> Option<(CardId, Destination)> {
    engine
        .playable()
        .into_iter()
        .filter(|card| card.suit() == suit)
        .find_map(|card| engine.foundation_destination(card).map(|d| (card, d)))
}
