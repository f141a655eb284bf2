//! Undo ledger.
//!
//! Linear history: entries are appended as moves are accepted and popped by
//! undo. There is no redo stack. Backed by `im::Vector` so cloning an
//! engine's history is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::moves::Move;
use crate::core::CardId;

/// One undoable step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entry {
    /// A single card placement.
    Move(Move),

    /// Waste turned back into stock, one record per card, bottom first.
    Restock(Vec<Move>),
}

impl Entry {
    /// Records in this entry, in the order they were applied.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        match self {
            Entry::Move(mv) => std::slice::from_ref(mv),
            Entry::Restock(moves) => moves,
        }
    }
}

/// Append-only history of reversible moves.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    entries: Vector<Entry>,
    next_id: u32,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next move id.
    pub fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Append an entry.
    pub fn record(&mut self, entry: Entry) {
        self.entries.push_back(entry);
    }

    /// Remove and return the most recent entry.
    pub fn pop(&mut self) -> Option<Entry> {
        self.entries.pop_back()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything, including the id counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_id = 0;
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// The most recent record that moved `card`.
    #[must_use]
    pub fn last_move_of(&self, card: CardId) -> Option<&Move> {
        self.entries
            .iter()
            .rev()
            .flat_map(|entry| entry.moves().iter().rev())
            .find(|mv| mv.card == card)
    }
}
