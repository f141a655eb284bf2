//! Shell-facing events.
//!
//! The engine consumes `Intent`s (already resolved to a card and, for
//! drag/drop, a logical `Placement`) and publishes `EngineEvent`s to every
//! subscribed `Observer` after each successful operation.
//!
//! Any `FnMut(&EngineEvent)` closure is an observer:
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use canfield_engine::core::EngineConfig;
//! use canfield_engine::events::{EngineEvent, LayoutSize};
//! use canfield_engine::rules::GameEngine;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//!
//! let mut engine = GameEngine::new(EngineConfig::new(1));
//! engine.subscribe(move |event: &EngineEvent| sink.borrow_mut().push(event.clone()));
//! engine.relayout(LayoutSize::new(800.0, 600.0));
//!
//! assert!(!seen.borrow().is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{CardId, GameState, Placement};
use crate::ledger::Move;

/// What the user did to a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    Tap,
    Drag,
    Drop,
    Reset,
}

/// A resolved user intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub card: CardId,

    /// Logical drop target. Only meaningful for `Drop`.
    pub target: Option<Placement>,
}

impl Intent {
    #[must_use]
    pub fn tap(card: CardId) -> Self {
        Self { kind: IntentKind::Tap, card, target: None }
    }

    #[must_use]
    pub fn drag(card: CardId) -> Self {
        Self { kind: IntentKind::Drag, card, target: None }
    }

    #[must_use]
    pub fn drop(card: CardId, target: Option<Placement>) -> Self {
        Self { kind: IntentKind::Drop, card, target }
    }

    #[must_use]
    pub fn reset(card: CardId) -> Self {
        Self { kind: IntentKind::Reset, card, target: None }
    }
}

/// Rendering-layer size. The engine never interprets it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSize {
    pub width: f64,
    pub height: f64,
}

impl LayoutSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Something observable changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    StateChanged { from: GameState, to: GameState },

    /// A card placement was recorded.
    Placed(Move),

    /// Waste turned back into stock.
    Restocked { count: usize },

    /// The last ledger entry was reversed.
    Undone { moves: Vec<Move> },

    /// Cards were dealt into the tableau and stock.
    Dealt,

    /// The shell re-measured its layout.
    Relayout(LayoutSize),

    /// A card is being dragged; these cards would accept it.
    Highlighted { card: CardId, targets: Vec<CardId> },

    /// Transient drag/highlight flags were cleared.
    Cleared,
}

/// Receives engine events.
pub trait Observer {
    fn notify(&mut self, event: &EngineEvent);
}

impl<F> Observer for F
where
    F: FnMut(&EngineEvent),
{
    fn notify(&mut self, event: &EngineEvent) {
        self(event)
    }
}
