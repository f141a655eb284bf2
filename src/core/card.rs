//! Card identity and per-card mutable state.
//!
//! ## Identity
//!
//! A card is identified by its `(suit, rank)` pair. The identity key is
//! `(suit - 1) * 13 + rank`, giving 52 unique values in `1..=52`:
//!
//! ```
//! use canfield_engine::core::{CardId, Rank, Suit};
//!
//! let ace = CardId::new(Suit::Diamonds, Rank::Ace);
//! let king = CardId::new(Suit::Clubs, Rank::King);
//!
//! assert_eq!(ace.raw(), 1);
//! assert_eq!(king.raw(), 52);
//! assert_eq!(king.suit(), Suit::Clubs);
//! assert_eq!(king.rank(), Rank::King);
//! ```
//!
//! ## Mutable state
//!
//! `Card` carries the zone, order, face and stacking links. Only the rules
//! engine mutates `placement`, `parent` and `child`.

use serde::{Deserialize, Serialize};

use super::error::InvalidCardId;
use super::placement::Placement;

/// Color group of a suit. Tableau piles alternate pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pair {
    Red,
    Black,
}

impl Pair {
    /// The other color group.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Pair::Red => Pair::Black,
            Pair::Black => Pair::Red,
        }
    }
}

/// Card suit. Discriminants are 1-based and fix the identity key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Diamonds = 1,
    Spades = 2,
    Hearts = 3,
    Clubs = 4,
}

impl Suit {
    /// All suits in identity order.
    pub const ALL: [Suit; 4] = [Suit::Diamonds, Suit::Spades, Suit::Hearts, Suit::Clubs];

    /// 1-based suit value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Look up a suit by its 1-based value.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Suit::Diamonds),
            2 => Some(Suit::Spades),
            3 => Some(Suit::Hearts),
            4 => Some(Suit::Clubs),
            _ => None,
        }
    }

    /// Color group of this suit.
    #[must_use]
    pub const fn pair(self) -> Pair {
        match self {
            Suit::Diamonds | Suit::Hearts => Pair::Red,
            Suit::Spades | Suit::Clubs => Pair::Black,
        }
    }

    /// Next suit, wrapping from clubs back to diamonds.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Suit::Diamonds => Suit::Spades,
            Suit::Spades => Suit::Hearts,
            Suit::Hearts => Suit::Clubs,
            Suit::Clubs => Suit::Diamonds,
        }
    }

    /// Previous suit, wrapping from diamonds back to clubs.
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Suit::Diamonds => Suit::Clubs,
            Suit::Spades => Suit::Diamonds,
            Suit::Hearts => Suit::Spades,
            Suit::Clubs => Suit::Hearts,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Suit::Diamonds => '♦',
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Clubs => '♣',
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Card rank, ace (1) through king (13).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Ace = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
}

impl Rank {
    /// Number of ranks per suit.
    pub const COUNT: u8 = 13;

    /// All ranks, ace first.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// 1-based rank value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Look up a rank by its 1-based value.
    #[must_use]
    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value).checked_sub(1)?).copied()
    }

    /// The rank above this one. Kings have no successor.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_value(self.value() + 1)
    }

    /// The rank below this one. Aces have no predecessor.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        Self::from_value(self.value() - 1)
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Card orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Up,
    #[default]
    Down,
}

/// Stable card identifier: `(suit - 1) * 13 + rank`.
///
/// Deserializes through `from_raw`, so an out-of-range key is a decode
/// error rather than a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CardId(u8);

impl CardId {
    /// Total number of distinct cards.
    pub const COUNT: usize = 52;

    /// Identity key for a suit and rank.
    #[must_use]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self((suit.value() - 1) * Rank::COUNT + rank.value())
    }

    /// Build from a raw key, rejecting values outside `1..=52`.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        if raw >= 1 && raw as usize <= Self::COUNT {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Raw key in `1..=52`.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Zero-based arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    #[must_use]
    pub fn suit(self) -> Suit {
        match Suit::from_value((self.0 - 1) / Rank::COUNT + 1) {
            Some(suit) => suit,
            None => unreachable!("card id {} out of range", self.0),
        }
    }

    #[must_use]
    pub fn rank(self) -> Rank {
        match Rank::from_value((self.0 - 1) % Rank::COUNT + 1) {
            Some(rank) => rank,
            None => unreachable!("card id {} out of range", self.0),
        }
    }

    /// Iterate over all 52 ids in identity order.
    pub fn all() -> impl Iterator<Item = CardId> {
        (1..=Self::COUNT as u8).map(CardId)
    }
}

impl TryFrom<u8> for CardId {
    type Error = InvalidCardId;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::from_raw(raw).ok_or(InvalidCardId(raw))
    }
}

impl From<CardId> for u8 {
    fn from(id: CardId) -> u8 {
        id.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

/// A card and its mutable table state.
///
/// Created once per engine by the deck factory. Restarting a game resets
/// the mutable fields instead of recreating cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,

    /// Current zone.
    pub placement: Placement,

    /// Position within the zone, 1-based. Bottom card has the lowest order.
    pub order: u32,

    pub face: Face,

    /// Nothing is stacked on this card, so it may move or receive a card.
    pub available: bool,

    /// Has been face-up at least once this game.
    pub revealed: bool,

    /// Transient drag state.
    pub moving: bool,

    /// Transient highlight state.
    pub matched: bool,

    /// The card this one is stacked on.
    pub parent: Option<CardId>,

    /// The card stacked on this one.
    pub child: Option<CardId>,
}

impl Card {
    /// A fresh face-down card outside every zone.
    #[must_use]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self {
            id: CardId::new(suit, rank),
            suit,
            rank,
            placement: Placement::None,
            order: 0,
            face: Face::Down,
            available: false,
            revealed: false,
            moving: false,
            matched: false,
            parent: None,
            child: None,
        }
    }

    /// Clear all mutable state back to the freshly built values.
    pub fn reset(&mut self) {
        *self = Self::new(self.suit, self.rank);
    }

    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.face == Face::Up
    }

    #[must_use]
    pub fn is_ace(&self) -> bool {
        self.rank == Rank::Ace
    }

    #[must_use]
    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_keys_unique() {
        let mut seen = std::collections::HashSet::new();
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                let id = CardId::new(suit, rank);
                assert!((1..=52).contains(&id.raw()));
                assert!(seen.insert(id));
                assert_eq!(id.suit(), suit);
                assert_eq!(id.rank(), rank);
            }
        }
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn test_identity_key_formula() {
        assert_eq!(CardId::new(Suit::Spades, Rank::Ace).raw(), 14);
        assert_eq!(CardId::new(Suit::Hearts, Rank::Queen).raw(), 38);
    }

    #[test]
    fn test_from_raw_bounds() {
        assert!(CardId::from_raw(0).is_none());
        assert!(CardId::from_raw(53).is_none());
        assert_eq!(CardId::from_raw(1), Some(CardId::new(Suit::Diamonds, Rank::Ace)));
    }

    #[test]
    fn test_id_deserialization_checks_range() {
        let id = CardId::new(Suit::Clubs, Rank::Jack);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.raw().to_string());
        assert_eq!(serde_json::from_str::<CardId>(&json).unwrap(), id);

        assert!(serde_json::from_str::<CardId>("0").is_err());
        assert!(serde_json::from_str::<CardId>("53").is_err());
        assert_eq!(CardId::try_from(0), Err(InvalidCardId(0)));
    }

    #[test]
    fn test_rank_neighbours_are_not_cyclic() {
        assert_eq!(Rank::King.next(), None);
        assert_eq!(Rank::Ace.previous(), None);
        assert_eq!(Rank::Ace.next(), Some(Rank::Two));
        assert_eq!(Rank::King.previous(), Some(Rank::Queen));
    }

    #[test]
    fn test_suit_neighbours_cycle() {
        assert_eq!(Suit::Clubs.next(), Suit::Diamonds);
        assert_eq!(Suit::Diamonds.previous(), Suit::Clubs);

        let mut suit = Suit::Hearts;
        for _ in 0..4 {
            suit = suit.next();
        }
        assert_eq!(suit, Suit::Hearts);
    }

    #[test]
    fn test_pairs() {
        assert_eq!(Suit::Diamonds.pair(), Suit::Hearts.pair());
        assert_eq!(Suit::Spades.pair(), Suit::Clubs.pair());
        assert_ne!(Suit::Hearts.pair(), Suit::Clubs.pair());
        assert_eq!(Pair::Red.toggle(), Pair::Black);
    }

    #[test]
    fn test_card_reset() {
        let mut card = Card::new(Suit::Hearts, Rank::Seven);
        card.placement = Placement::Waste;
        card.face = Face::Up;
        card.revealed = true;
        card.order = 4;

        card.reset();
        assert_eq!(card, Card::new(Suit::Hearts, Rank::Seven));
    }

    #[test]
    fn test_display() {
        assert_eq!(CardId::new(Suit::Hearts, Rank::Queen).to_string(), "Q♥");
    }
}
