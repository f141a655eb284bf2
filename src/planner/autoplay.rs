//! Heuristic autoplay.
//!
//! Each tick:
//! 1. turns a stock card if the waste is empty
//! 2. promotes available aces
//! 3. makes up to `autoplay_batch` productive moves, trying for each
//!    playable card a foundation, then an empty column for a king, then a
//!    tableau restack
//! 4. draws from stock only when nothing productive happened
//!
//! Restacks that only shuffle a card between equal-rank parents are
//! skipped, so autoplay cannot oscillate.

use tracing::trace;

use crate::core::{CardId, Placement, Rank};
use crate::rules::{Destination, GameEngine};

use super::DrawCycle;

/// Autoplay state carried between ticks.
#[derive(Clone, Debug, Default)]
pub struct Autoplay {
    cycle: DrawCycle,
}

impl Autoplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Run one tick. Returns `false` when the game is over or a full pass
    /// through the stock produced nothing.
    pub fn step(&mut self, engine: &mut GameEngine) -> bool {
        if !engine.state().is_playing() || engine.completed() {
            return false;
        }
        self.cycle.observe(engine);
        let progressed = self.tick(engine);
        self.cycle.settle(engine);
        progressed
    }

    fn tick(&mut self, engine: &mut GameEngine) -> bool {
        let mut drew = false;
        if engine.zones().is_empty(Placement::Waste) && engine.top(Placement::Stock).is_some() {
            drew = self.cycle.draw(engine);
        }

        let batch = engine.config().autoplay_batch;
        let mut productive = promote_aces(engine);
        while productive < batch {
            let Some((card, destination)) = next_play(engine) else { break };
            if !engine.place(card, destination) {
                break;
            }
            productive += 1;
        }

        if productive > 0 {
            trace!(productive, "autoplay tick");
            self.cycle.progressed();
            return true;
        }
        drew || self.cycle.draw(engine)
    }
}

fn promote_aces(engine: &mut GameEngine) -> usize {
    let aces: Vec<CardId> = engine
        .playable()
        .into_iter()
        .filter(|card| card.rank() == Rank::Ace)
        .collect();

    let mut promoted = 0;
    for ace in aces {
        if let Some(destination) = engine.foundation_destination(ace) {
            if engine.place(ace, destination) {
                promoted += 1;
            }
        }
    }
    promoted
}

/// First productive move among the playable cards.
fn next_play(engine: &GameEngine) -> Option<(CardId, Destination)> {
    for card in engine.playable() {
        if let Some(destination) = engine.foundation_destination(card) {
            return Some((card, destination));
        }
        if card.rank() == Rank::King {
            if let Some(destination) = engine.empty_column_for(card) {
                return Some((card, destination));
            }
        }
        if thrashes(engine, card) {
            continue;
        }
        if let Some(&target) = engine.tableau_targets(card).first() {
            return Some((card, Destination::Card(target)));
        }
    }
    None
}

/// Would stacking `card` uncover nothing?
///
/// True when the card already rests on a face-up tableau card. Moving it
/// sideways onto another card of the same rank and colour gains nothing,
/// and moving it back would undo the move.
fn thrashes(engine: &GameEngine, card: CardId) -> bool {
    let c = engine.card(card);
    c.placement.is_tableau() && c.parent.is_some_and(|parent| engine.card(parent).is_face_up())
}
