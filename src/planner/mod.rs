//! Automatic play.
//!
//! Planners drive the engine through its public operations only, one
//! bounded tick at a time. The shell schedules ticks and stops once a tick
//! returns `false` or the game is completed.
//!
//! ## Key Types
//!
//! - `Autoplay`: heuristic play from any position
//! - `Autocomplete`: foundation-only finish once every card is revealed

pub mod autocomplete;
pub mod autoplay;

pub use autocomplete::Autocomplete;
pub use autoplay::Autoplay;

use tracing::debug;

use crate::core::Placement;
use crate::rules::GameEngine;

/// Stock drawing shared by both planners.
///
/// Counts consecutive draws without a productive move. Once every stock
/// and waste card has been seen since the last productive move, drawing
/// stops. Moves made by anyone else reset the count.
#[derive(Clone, Debug, Default)]
pub(crate) struct DrawCycle {
    idle: usize,
    seen_moves: i64,
}

impl DrawCycle {
    /// Start of a tick.
    pub(crate) fn observe(&mut self, engine: &GameEngine) {
        if engine.status().moves() != self.seen_moves {
            self.idle = 0;
        }
    }

    /// End of a tick.
    pub(crate) fn settle(&mut self, engine: &GameEngine) {
        self.seen_moves = engine.status().moves();
    }

    pub(crate) fn progressed(&mut self) {
        self.idle = 0;
    }

    pub(crate) fn exhausted(&self, engine: &GameEngine) -> bool {
        let cycle = engine.zones().len(Placement::Stock) + engine.zones().len(Placement::Waste);
        self.idle > cycle + 1
    }

    /// Turn a stock card, or restock an exhausted stock.
    pub(crate) fn draw(&mut self, engine: &mut GameEngine) -> bool {
        if self.exhausted(engine) {
            debug!(idle = self.idle, "draw cycle exhausted");
            return false;
        }
        let drew = match engine.top(Placement::Stock) {
            Some(top) => engine.waste(top),
            None => engine.restock(),
        };
        if drew {
            self.idle += 1;
        }
        drew
    }
}
