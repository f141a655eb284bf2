//! Logical card destinations.
//!
//! The set of placements is closed: staging (`None`, `Ready`), `Stock`,
//! `Waste`, one foundation per suit and seven tableau columns. Each has a
//! fixed ordering key used for display and identity comparisons only.

use serde::{Deserialize, Serialize};

use super::card::Suit;

/// Tableau column, numbered 1 through 7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::One,
        Column::Two,
        Column::Three,
        Column::Four,
        Column::Five,
        Column::Six,
        Column::Seven,
    ];

    /// 1-based column number. Also the number of cards dealt to it.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value).checked_sub(1)?).copied()
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Where a card lives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placement {
    /// Outside the game.
    #[default]
    None,
    /// Staged before the deal.
    Ready,
    Stock,
    Waste,
    Foundation(Suit),
    Tableau(Column),
}

impl Placement {
    /// Every placement, in key order.
    #[must_use]
    pub fn all() -> Vec<Placement> {
        let mut all = vec![Placement::None, Placement::Ready, Placement::Stock, Placement::Waste];
        all.extend(Suit::ALL.iter().map(|&s| Placement::Foundation(s)));
        all.extend(Column::ALL.iter().map(|&c| Placement::Tableau(c)));
        all
    }

    /// The four foundations, in suit order.
    pub fn foundations() -> impl Iterator<Item = Placement> {
        Suit::ALL.into_iter().map(Placement::Foundation)
    }

    /// The seven tableau columns, left to right.
    pub fn tableaus() -> impl Iterator<Item = Placement> {
        Column::ALL.into_iter().map(Placement::Tableau)
    }

    /// Fixed total-order key.
    #[must_use]
    pub const fn key(self) -> u16 {
        match self {
            Placement::None => 0,
            Placement::Ready => 1,
            Placement::Stock => 2,
            Placement::Waste => 3,
            Placement::Foundation(suit) => 100 + suit.value() as u16,
            Placement::Tableau(column) => 200 + column.value() as u16,
        }
    }

    #[must_use]
    pub const fn is_foundation(self) -> bool {
        matches!(self, Placement::Foundation(_))
    }

    #[must_use]
    pub const fn is_tableau(self) -> bool {
        matches!(self, Placement::Tableau(_))
    }

    /// Zones whose cards are face-up and stacked: waste, foundations, tableau.
    #[must_use]
    pub const fn is_in_play(self) -> bool {
        matches!(
            self,
            Placement::Waste | Placement::Foundation(_) | Placement::Tableau(_)
        )
    }

    /// Suit of a foundation placement.
    #[must_use]
    pub const fn suit(self) -> Option<Suit> {
        match self {
            Placement::Foundation(suit) => Some(suit),
            _ => None,
        }
    }

    /// Column of a tableau placement.
    #[must_use]
    pub const fn column(self) -> Option<Column> {
        match self {
            Placement::Tableau(column) => Some(column),
            _ => None,
        }
    }
}

impl PartialOrd for Placement {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Placement {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::None => write!(f, "none"),
            Placement::Ready => write!(f, "ready"),
            Placement::Stock => write!(f, "stock"),
            Placement::Waste => write!(f, "waste"),
            Placement::Foundation(suit) => write!(f, "foundation({})", suit),
            Placement::Tableau(column) => write!(f, "tableau({})", column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_placements() {
        let all = Placement::all();
        assert_eq!(all.len(), 4 + 4 + 7);

        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(sorted, all);
    }

    #[test]
    fn test_keys_unique() {
        let mut keys: Vec<_> = Placement::all().iter().map(|p| p.key()).collect();
        keys.dedup();
        assert_eq!(keys.len(), 15);
    }

    #[test]
    fn test_predicates() {
        assert!(Placement::Foundation(Suit::Hearts).is_foundation());
        assert!(!Placement::Foundation(Suit::Hearts).is_tableau());
        assert!(Placement::Tableau(Column::Three).is_tableau());
        assert!(!Placement::Stock.is_in_play());
        assert!(Placement::Waste.is_in_play());
        assert_eq!(Placement::Foundation(Suit::Clubs).suit(), Some(Suit::Clubs));
        assert_eq!(Placement::Tableau(Column::Seven).column(), Some(Column::Seven));
        assert_eq!(Placement::Waste.column(), None);
    }

    #[test]
    fn test_column_values() {
        assert_eq!(Column::from_value(1), Some(Column::One));
        assert_eq!(Column::from_value(8), None);
        assert_eq!(Column::from_value(0), None);
        assert_eq!(Column::Seven.value(), 7);
    }

    #[test]
    fn test_serialization() {
        let placement = Placement::Tableau(Column::Four);
        let json = serde_json::to_string(&placement).unwrap();
        let deserialized: Placement = serde_json::from_str(&json).unwrap();
        assert_eq!(placement, deserialized);
    }
}
