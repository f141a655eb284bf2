//! Zone occupancy index.
//!
//! The `ZoneManager` tracks which placement each card is in and the
//! bottom-to-top order of every placement. The rules engine keeps it in
//! step with each card's `placement` and `order` fields.

use rustc_hash::FxHashMap;

use crate::cards::CardArena;
use crate::core::{CardId, Placement};

/// Per-placement ordered card lists.
///
/// ```
/// use canfield_engine::zones::ZoneManager;
/// use canfield_engine::core::{CardId, Placement, Rank, Suit};
///
/// let mut zones = ZoneManager::new();
/// let ace = CardId::new(Suit::Hearts, Rank::Ace);
/// let two = CardId::new(Suit::Hearts, Rank::Two);
///
/// zones.push(ace, Placement::Foundation(Suit::Hearts));
/// zones.push(two, Placement::Foundation(Suit::Hearts));
///
/// assert_eq!(zones.top(Placement::Foundation(Suit::Hearts)), Some(two));
/// assert_eq!(zones.bottom(Placement::Foundation(Suit::Hearts)), Some(ace));
/// ```
#[derive(Clone, Debug)]
pub struct ZoneManager {
    /// Card locations: card -> placement
    locations: FxHashMap<CardId, Placement>,

    /// Bottom-to-top card lists for every placement.
    zone_order: FxHashMap<Placement, Vec<CardId>>,
}

impl Default for ZoneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneManager {
    /// Create an index with every placement empty.
    #[must_use]
    pub fn new() -> Self {
        let zone_order = Placement::all().into_iter().map(|p| (p, Vec::new())).collect();
        Self {
            locations: FxHashMap::default(),
            zone_order,
        }
    }

    /// Put a card on top of a placement.
    ///
    /// A card already tracked elsewhere is moved.
    pub fn push(&mut self, card: CardId, placement: Placement) {
        self.remove(card);
        self.locations.insert(card, placement);
        self.zone_order.entry(placement).or_default().push(card);
    }

    /// Stop tracking a card.
    ///
    /// Returns the placement it was in, or `None` if not found.
    pub fn remove(&mut self, card: CardId) -> Option<Placement> {
        let placement = self.locations.remove(&card)?;

        if let Some(order) = self.zone_order.get_mut(&placement) {
            order.retain(|&c| c != card);
        }

        Some(placement)
    }

    /// Drop every card from every placement.
    pub fn clear(&mut self) {
        self.locations.clear();
        for order in self.zone_order.values_mut() {
            order.clear();
        }
    }

    /// The placement a card is in.
    #[must_use]
    pub fn placement_of(&self, card: CardId) -> Option<Placement> {
        self.locations.get(&card).copied()
    }

    /// Cards in a placement, bottom first.
    #[must_use]
    pub fn cards(&self, placement: Placement) -> &[CardId] {
        self.zone_order.get(&placement).map_or(&[], |v| v.as_slice())
    }

    /// The top card of a placement.
    #[must_use]
    pub fn top(&self, placement: Placement) -> Option<CardId> {
        self.zone_order.get(&placement)?.last().copied()
    }

    /// The bottom card of a placement.
    #[must_use]
    pub fn bottom(&self, placement: Placement) -> Option<CardId> {
        self.zone_order.get(&placement)?.first().copied()
    }

    #[must_use]
    pub fn len(&self, placement: Placement) -> usize {
        self.cards(placement).len()
    }

    #[must_use]
    pub fn is_empty(&self, placement: Placement) -> bool {
        self.cards(placement).is_empty()
    }

    /// Order a card pushed onto `placement` should take: one past the top.
    #[must_use]
    pub fn next_order(&self, placement: Placement, arena: &CardArena) -> u32 {
        self.top(placement).map_or(1, |top| arena[top].order + 1)
    }

    /// Get total number of cards tracked.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.locations.len()
    }

    /// Check if the index tracks a card.
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.locations.contains_key(&card)
    }
}
