//! Game lifecycle state and observational counters.
//!
//! ## GameState
//!
//! `None → Ready → Setup → Dealt → Started → Paused/Ended`
//!
//! - `Ready` is entered when the shell reports a first layout and
//!   immediately continues into `Setup`.
//! - `Dealt` is reached only through `deal()` (or an arranged position).
//! - `Started` begins with the first recorded move.
//! - `Paused` is shell-driven; `Ended` follows completion.
//!
//! ## Status
//!
//! Moves, score and elapsed time. These never affect legality.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Engine lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    None,
    Ready,
    Setup,
    Dealt,
    Started,
    Paused,
    Ended,
}

impl GameState {
    /// Moves may be made in this state.
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, GameState::Dealt | GameState::Started)
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameState::None => "none",
            GameState::Ready => "ready",
            GameState::Setup => "setup",
            GameState::Dealt => "dealt",
            GameState::Started => "started",
            GameState::Paused => "paused",
            GameState::Ended => "ended",
        };
        write!(f, "{}", name)
    }
}

/// Key into `Status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Moves,
    Score,
    Time,
}

impl StatusKind {
    pub const ALL: [StatusKind; 3] = [StatusKind::Moves, StatusKind::Score, StatusKind::Time];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            StatusKind::Moves => "moves",
            StatusKind::Score => "score",
            StatusKind::Time => "time",
        }
    }
}

/// Move count, score, and elapsed seconds.
///
/// ```
/// use canfield_engine::core::{Status, StatusKind};
///
/// let mut status = Status::default();
/// status.record_move(50);
/// status.record_undo(10);
///
/// assert_eq!(status[StatusKind::Moves], 2);
/// assert_eq!(status[StatusKind::Score], 40);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    values: [i64; 3],
}

impl Status {
    /// Count a move and apply its score delta.
    pub fn record_move(&mut self, score_delta: i64) {
        self[StatusKind::Moves] += 1;
        self[StatusKind::Score] += score_delta;
    }

    /// Count an undo as a move and deduct the penalty.
    pub fn record_undo(&mut self, penalty: i64) {
        self[StatusKind::Moves] += 1;
        self[StatusKind::Score] -= penalty;
    }

    /// Add elapsed seconds.
    pub fn elapse(&mut self, seconds: u64) {
        let seconds = i64::try_from(seconds).unwrap_or(i64::MAX);
        self[StatusKind::Time] = self[StatusKind::Time].saturating_add(seconds);
    }

    #[must_use]
    pub fn moves(&self) -> i64 {
        self[StatusKind::Moves]
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self[StatusKind::Score]
    }

    #[must_use]
    pub fn time(&self) -> i64 {
        self[StatusKind::Time]
    }

    /// `(kind, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (StatusKind, i64)> + '_ {
        StatusKind::ALL.into_iter().map(move |kind| (kind, self[kind]))
    }
}

impl Index<StatusKind> for Status {
    type Output = i64;

    fn index(&self, kind: StatusKind) -> &Self::Output {
        &self.values[kind as usize]
    }
}

impl IndexMut<StatusKind> for Status {
    fn index_mut(&mut self, kind: StatusKind) -> &mut Self::Output {
        &mut self.values[kind as usize]
    }
}
