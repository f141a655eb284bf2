//! Autoplay and autocomplete integration tests.
//!
//! Planners run as repeated ticks. These tests check that ticking always
//! stops, never breaks the table, and finishes games that can be finished.

use canfield_engine::core::{CardId, Column, EngineConfig, GameState, Placement, Rank, Suit};
use canfield_engine::rules::{GameEngine, Layout};

/// Upper bound on ticks for a full game; far above anything a real game needs.
const MAX_TICKS: usize = 2_000;

fn id(suit: Suit, rank: Rank) -> CardId {
    CardId::new(suit, rank)
}

/// Foundations hold ace to five; four alternating runs king to six.
fn nearly_won() -> Layout {
    let mut layout = Layout::new();
    for suit in Suit::ALL {
        layout = layout.foundation(suit, Rank::ALL[..5].iter().map(|&r| id(suit, r)));
    }
    let runs = [
        (Column::One, [Suit::Spades, Suit::Hearts]),
        (Column::Two, [Suit::Hearts, Suit::Spades]),
        (Column::Three, [Suit::Clubs, Suit::Diamonds]),
        (Column::Four, [Suit::Diamonds, Suit::Clubs]),
    ];
    for (column, [even, odd]) in runs {
        let run: Vec<CardId> = Rank::ALL[5..]
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &rank)| id(if i % 2 == 0 { even } else { odd }, rank))
            .collect();
        layout = layout.tableau(column, [], run);
    }
    layout
}

fn run_autoplay(engine: &mut GameEngine) -> usize {
    let mut ticks = 0;
    while engine.autoplay() {
        ticks += 1;
        assert!(ticks < MAX_TICKS, "autoplay did not stop");
        assert!(engine.audit().is_empty(), "{:?}", engine.audit());
    }
    ticks
}

#[test]
fn test_autoplay_finishes_nearly_won() {
    let mut engine = GameEngine::new(EngineConfig::new(1));
    engine.arrange(&nearly_won());

    let ticks = run_autoplay(&mut engine);
    assert!(engine.completed());
    assert_eq!(engine.state(), GameState::Ended);
    // 32 promotions in batches of 8.
    assert_eq!(ticks, 4);
}

#[test]
fn test_autoplay_batch_size() {
    let mut engine = GameEngine::new(EngineConfig::new(1).with_autoplay_batch(3));
    engine.arrange(&nearly_won());

    assert!(engine.autoplay());
    assert_eq!(engine.ledger().len(), 3);
}

#[test]
fn test_autocomplete_finishes_nearly_won() {
    let mut engine = GameEngine::new(EngineConfig::new(1));
    engine.arrange(&nearly_won());

    let mut ticks = 0;
    while engine.autocomplete() {
        ticks += 1;
        assert!(ticks < MAX_TICKS);
    }
    assert!(engine.completed());
    assert_eq!(engine.status().moves(), 32);
    assert_eq!(engine.status().score(), 320);
}

/// Autoplay on real deals always stops, leaves a consistent table, and
/// never loses a card.
#[test]
fn test_autoplay_terminates_on_deals() {
    for seed in 0..25 {
        let mut engine = GameEngine::new(EngineConfig::new(seed));
        engine.restart();

        run_autoplay(&mut engine);

        let total: usize = Placement::all().into_iter().map(|p| engine.pile(p).len()).sum();
        assert_eq!(total, 52, "seed {seed}");
        assert!(engine.completed() || !engine.autoplay(), "seed {seed}");
    }
}

/// Autoplay then autocomplete on real deals: any finished game has ended,
/// and across many deals some cards always reach the foundations.
#[test]
fn test_autoplay_makes_progress_on_deals() {
    let mut founded = 0;
    for seed in 0..60 {
        let mut engine = GameEngine::new(EngineConfig::new(seed));
        engine.restart();
        run_autoplay(&mut engine);
        while engine.autocomplete() {}

        if engine.completed() {
            assert_eq!(engine.state(), GameState::Ended);
        }
        founded += engine.progress().founded;
    }
    assert!(founded > 0);
}

/// A manual move after autoplay stalls lets autoplay try again.
#[test]
fn test_manual_move_resets_stall() {
    let eight = id(Suit::Hearts, Rank::Eight);
    let other_nine = id(Suit::Spades, Rank::Nine);
    let mut engine = GameEngine::new(EngineConfig::new(1));
    engine.arrange(
        &Layout::new()
            .tableau(Column::One, [], [id(Suit::Clubs, Rank::Nine), eight])
            .tableau(Column::Two, [], [other_nine])
            .stock([id(Suit::Diamonds, Rank::Two)]),
    );

    run_autoplay(&mut engine);
    assert!(!engine.autoplay());

    // Autoplay never makes this sideways move; a player may.
    assert!(engine.place(eight, other_nine));
    assert!(engine.autoplay());
}

#[test]
fn test_planners_idle_when_paused() {
    let mut engine = GameEngine::new(EngineConfig::new(1));
    engine.arrange(&nearly_won());
    assert!(engine.autoplay());
    assert!(engine.pause());

    let moves = engine.status().moves();
    assert!(!engine.autoplay());
    assert!(!engine.autocomplete());
    assert_eq!(engine.status().moves(), moves);
}
