//! # canfield-engine
//!
//! A deterministic rules engine for single-deck Klondike-style solitaire.
//!
//! ## Design Principles
//!
//! 1. **One owner**: `GameEngine` is the only thing that mutates cards.
//!    Zone membership, stacking links and card placement are updated
//!    together or not at all.
//!
//! 2. **Quiet refusals**: illegal operations return `false` and change
//!    nothing. `try_*` variants say why.
//!
//! 3. **Seeded**: every shuffle comes from a ChaCha8 stream, so a seed
//!    reproduces a deal exactly.
//!
//! ## Architecture
//!
//! - **Arena cards**: the 52 cards live in one `CardArena` indexed by
//!   `CardId`; stacks are `parent`/`child` ids, never references.
//!
//! - **Persistent ledger**: move history is an `im::Vector`, so cloning
//!   history for inspection is cheap.
//!
//! - **Cooperative planners**: autoplay and autocomplete run one bounded
//!   tick per call. The embedding shell decides when to tick and when to
//!   stop.
//!
//! ## Modules
//!
//! - `core`: cards, placements, RNG, configuration, state, errors
//! - `cards`: deck factory and card arena
//! - `zones`: which cards are in which pile
//! - `rules`: stacking rules, layouts and the engine
//! - `ledger`: move records and undo history
//! - `scoring`: move scores and completion checks
//! - `planner`: autoplay and autocomplete
//! - `events`: intents in, events out
//! - `view`: serializable snapshots for rendering
//!
//! ```
//! use canfield_engine::{EngineConfig, GameEngine, GameState, Placement};
//!
//! let mut engine = GameEngine::new(EngineConfig::new(7));
//! engine.restart();
//! assert_eq!(engine.state(), GameState::Dealt);
//!
//! let top = engine.top(Placement::Stock).unwrap();
//! assert!(engine.waste(top));
//! assert_eq!(engine.state(), GameState::Started);
//! ```

pub mod core;
pub mod cards;
pub mod zones;
pub mod rules;
pub mod ledger;
pub mod scoring;
pub mod planner;
pub mod events;
pub mod view;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, Face, Pair, Rank, Suit,
    Column, Placement,
    GameRng, GameRngState,
    EngineConfig, ScoringConfig,
    GameState, Status, StatusKind,
    Rejection, SnapshotError,
};

pub use crate::cards::{CardArena, Deck};

pub use crate::zones::ZoneManager;

pub use crate::rules::{Destination, GameEngine, Layout, valid_for_placement, valid_for_target};

pub use crate::ledger::{Entry, Ledger, Move};

pub use crate::scoring::Progress;

pub use crate::planner::{Autocomplete, Autoplay};

pub use crate::events::{EngineEvent, Intent, IntentKind, LayoutSize, Observer};

pub use crate::view::{CardView, Snapshot};
