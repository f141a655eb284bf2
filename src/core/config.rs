//! Engine configuration.
//!
//! Shells configure the engine at construction by providing an
//! `EngineConfig`: the shuffle seed, the point values used for scoring,
//! and how many moves a planner tick may make.

use serde::{Deserialize, Serialize};

/// Point values awarded or deducted per move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// A card turned face-up for the first time.
    pub reveal: i64,

    /// An ace landing on its foundation.
    pub foundation_ace: i64,

    /// Any other card landing on a foundation.
    pub foundation: i64,

    /// A king starting an empty tableau column.
    pub king_to_empty: i64,

    /// An ace leaving its foundation (deducted).
    pub leave_foundation_ace: i64,

    /// Any other card leaving a foundation (deducted).
    pub leave_foundation: i64,

    /// Every undo (deducted).
    pub undo_penalty: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reveal: 10,
            foundation_ace: 50,
            foundation: 10,
            king_to_empty: 20,
            leave_foundation_ace: 30,
            leave_foundation: 10,
            undo_penalty: 10,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for deck shuffling.
    pub seed: u64,

    /// Score values.
    pub scoring: ScoringConfig,

    /// Maximum productive moves per planner tick.
    pub autoplay_batch: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            scoring: ScoringConfig::default(),
            autoplay_batch: 8,
        }
    }
}

impl EngineConfig {
    /// Default configuration with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the scoring table.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the per-tick move limit for planners. Clamped to at least 1.
    #[must_use]
    pub fn with_autoplay_batch(mut self, batch: usize) -> Self {
        self.autoplay_batch = batch.max(1);
        self
    }
}
