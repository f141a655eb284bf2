//! The game engine.
//!
//! `GameEngine` owns every card, the zone index, the move ledger, the status
//! counters and the lifecycle state. Every mutation goes through it so that
//! card placement, links and zone membership never disagree.
//!
//! ## Key Types
//!
//! - `GameEngine`: state plus all public operations
//! - `Destination`: where a placement lands (an empty pile or a target card)
//!
//! Each mutating operation comes in two forms. `try_*` returns the reason
//! for a refusal; the plain form returns `false` and logs the reason at
//! debug level. A refused operation never changes state.

use smallvec::SmallVec;
use tracing::{debug, info, trace};

use crate::cards::{CardArena, Deck};
use crate::core::{
    Card, CardId, EngineConfig, Face, GameRng, GameRngState, GameState, Placement, Rejection, Status,
    Suit,
};
use crate::events::{EngineEvent, Intent, IntentKind, LayoutSize, Observer};
use crate::ledger::{Advance, Entry, Exposure, Ledger, Move, Transition};
use crate::planner::{Autocomplete, Autoplay};
use crate::scoring::{self, Progress};
use crate::view::{CardView, Snapshot};
use crate::zones::ZoneManager;

use super::layout::Layout;
use super::validate::{valid_for_placement, valid_for_target};

/// Where a placed card lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Start a new pile on an empty tableau column or foundation.
    Pile(Placement),

    /// Stack onto this card.
    Card(CardId),
}

impl From<Placement> for Destination {
    fn from(placement: Placement) -> Self {
        Destination::Pile(placement)
    }
}

impl From<CardId> for Destination {
    fn from(card: CardId) -> Self {
        Destination::Card(card)
    }
}

/// Cards that can currently leave their pile: the waste top and every
/// face-up tableau top.
pub type Playable = SmallVec<[CardId; 8]>;

/// The solitaire rules engine.
pub struct GameEngine {
    config: EngineConfig,
    rng: GameRng,
    cards: CardArena,
    zones: ZoneManager,
    ledger: Ledger,
    status: Status,
    state: GameState,

    /// Seconds of play while `Started`. Stamped onto every move.
    clock: u64,

    observers: Vec<Box<dyn Observer>>,
    autoplay: Autoplay,
    autocomplete: Autocomplete,
}

impl GameEngine {
    /// A fresh engine in state `None`. Every card sits outside all piles.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let mut zones = ZoneManager::new();
        for id in CardId::all() {
            zones.push(id, Placement::None);
        }

        Self {
            rng: GameRng::new(config.seed),
            config,
            cards: CardArena::new(Deck::build()),
            zones,
            ledger: Ledger::new(),
            status: Status::default(),
            state: GameState::None,
            clock: 0,
            observers: Vec::new(),
            autoplay: Autoplay::new(),
            autocomplete: Autocomplete::new(),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn status(&self) -> &Status {
        &self.status
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> &Card {
        self.cards.get(id)
    }

    #[must_use]
    pub fn cards(&self) -> &CardArena {
        &self.cards
    }

    #[must_use]
    pub fn zones(&self) -> &ZoneManager {
        &self.zones
    }

    /// Topmost card of a pile.
    #[must_use]
    pub fn top(&self, placement: Placement) -> Option<CardId> {
        self.zones.top(placement)
    }

    /// Cards of a pile, bottom first.
    #[must_use]
    pub fn pile(&self, placement: Placement) -> &[CardId] {
        self.zones.cards(placement)
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.ledger.is_empty()
    }

    /// Most recent recorded move of `card`.
    #[must_use]
    pub fn last_move_of(&self, card: CardId) -> Option<&Move> {
        self.ledger.last_move_of(card)
    }

    /// Every foundation holds a complete suit.
    #[must_use]
    pub fn completed(&self) -> bool {
        scoring::completed(&self.zones)
    }

    /// Every card has been seen face-up, so the game can be finished by
    /// foundation promotion alone.
    #[must_use]
    pub fn autocompletable(&self) -> bool {
        scoring::autocompletable(&self.cards)
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress::measure(&self.cards, &self.zones)
    }

    /// Seconds of play so far.
    #[must_use]
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// RNG position, for reproducing the next shuffle.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            status: self.status,
            cards: self.cards.iter().map(CardView::from).collect(),
        }
    }

    /// Waste top plus face-up tableau tops.
    #[must_use]
    pub fn playable(&self) -> Playable {
        let mut playable = Playable::new();
        if let Some(top) = self.zones.top(Placement::Waste) {
            playable.push(top);
        }
        for column in Placement::tableaus() {
            if let Some(top) = self.zones.top(column) {
                let card = self.cards.get(top);
                if card.is_face_up() && card.available {
                    playable.push(top);
                }
            }
        }
        playable
    }

    /// Would placing `card` at `destination` be accepted right now?
    #[must_use]
    pub fn can_place(&self, card: CardId, destination: Destination) -> bool {
        self.check_place(card, destination).is_ok()
    }

    /// The foundation destination for `card`, if it can go there now.
    #[must_use]
    pub fn foundation_destination(&self, card: CardId) -> Option<Destination> {
        let foundation = Placement::Foundation(card.suit());
        let destination = match self.zones.top(foundation) {
            Some(top) => Destination::Card(top),
            None => Destination::Pile(foundation),
        };
        self.can_place(card, destination).then_some(destination)
    }

    /// First empty column that would take `card`. Kings already at the
    /// bottom of a column are not offered another empty one.
    #[must_use]
    pub fn empty_column_for(&self, card: CardId) -> Option<Destination> {
        let c = self.cards.get(card);
        if c.placement.is_tableau() && c.parent.is_none() {
            return None;
        }
        Placement::tableaus()
            .filter(|&column| self.zones.is_empty(column))
            .map(Destination::Pile)
            .find(|&destination| self.can_place(card, destination))
    }

    /// Tableau tops that would accept `card`, leftmost column first.
    #[must_use]
    pub fn tableau_targets(&self, card: CardId) -> Playable {
        Placement::tableaus()
            .filter_map(|column| self.zones.top(column))
            .filter(|&top| self.can_place(card, Destination::Card(top)))
            .collect()
    }

    /// Best destination for a tap: foundation, then an empty column for a
    /// king, then the first tableau pile that takes it.
    #[must_use]
    pub fn best_destination(&self, card: CardId) -> Option<Destination> {
        self.foundation_destination(card)
            .or_else(|| self.empty_column_for(card))
            .or_else(|| self.tableau_targets(card).first().copied().map(Destination::Card))
    }

    /// Some waste or tableau card has a tableau destination.
    ///
    /// Foundation moves are not counted; this answers whether the tableau
    /// can still be rearranged.
    #[must_use]
    pub fn moves_available(&self) -> bool {
        self.playable().into_iter().any(|card| {
            !self.tableau_targets(card).is_empty()
                || (self.cards.get(card).is_king() && self.empty_column_for(card).is_some())
        })
    }

    /// Structural problems in the current position. Empty when every
    /// card, pile and link agrees.
    #[must_use]
    pub fn audit(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.zones.total_cards() != CardId::COUNT {
            problems.push(format!("zones hold {} cards", self.zones.total_cards()));
        }
        if !self.cards.links_consistent() {
            problems.push("links disagree".to_string());
        }

        for card in self.cards.iter() {
            if self.zones.placement_of(card.id) != Some(card.placement) {
                problems.push(format!("{} is not indexed under {}", card.id, card.placement));
            }
            if card.placement.is_in_play() && card.is_face_up() && card.available != card.child.is_none() {
                problems.push(format!("{} availability disagrees with its child", card.id));
            }
            if card.is_face_up() && !card.revealed {
                problems.push(format!("{} is face up but not revealed", card.id));
            }
        }

        // Cards outside every pile have no order.
        for placement in Placement::all().into_iter().filter(|&p| p != Placement::None) {
            let pile = self.zones.cards(placement);
            for pair in pile.windows(2) {
                let (below, above) = (self.cards.get(pair[0]), self.cards.get(pair[1]));
                if below.order >= above.order {
                    problems.push(format!("{} orders out of sequence at {}", placement, above.id));
                }
                if placement.is_in_play() && above.parent != Some(below.id) {
                    problems.push(format!("{} is not stacked on {}", above.id, below.id));
                }
                if placement.is_tableau() && above.is_face_up() && below.is_face_up()
                    && !valid_for_target(above, below)
                {
                    problems.push(format!("{} illegally on {}", above.id, below.id));
                }
                if placement.is_tableau() && !above.is_face_up() && below.is_face_up() {
                    problems.push(format!("face-down {} above face-up {}", above.id, below.id));
                }
            }

            if let Placement::Foundation(suit) = placement {
                for (i, &id) in pile.iter().enumerate() {
                    if id.suit() != suit || usize::from(id.rank().value()) != i + 1 {
                        problems.push(format!("{} out of place on {}", id, placement));
                    }
                }
            }
            if placement == Placement::Stock {
                for &id in pile {
                    let card = self.cards.get(id);
                    if card.is_face_up() || card.available || card.parent.is_some() {
                        problems.push(format!("{} is exposed in stock", id));
                    }
                }
            }
        }

        problems
    }

    // === Observers ===

    /// Receive every event published after a successful operation.
    pub fn subscribe<O: Observer + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: EngineEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }

    fn set_state(&mut self, to: GameState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        info!(%from, %to, "state changed");
        self.emit(EngineEvent::StateChanged { from, to });
    }

    fn expect_state(&self, expected: GameState) -> Result<(), Rejection> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Rejection::WrongState { expected, actual: self.state })
        }
    }

    fn expect_playing(&self) -> Result<(), Rejection> {
        if self.state.is_playing() {
            Ok(())
        } else {
            Err(Rejection::NotPlaying(self.state))
        }
    }

    // === Lifecycle ===

    /// The shell measured its layout. The first call readies the engine
    /// and sets up a game; later calls only republish the size.
    pub fn relayout(&mut self, size: LayoutSize) {
        if self.state == GameState::None {
            self.setup();
        }
        self.emit(EngineEvent::Relayout(size));
    }

    /// Clear everything and stage a freshly shuffled deck in `Ready`.
    /// A fresh engine passes through the `Ready` state first.
    pub fn setup(&mut self) {
        if self.state == GameState::None {
            self.set_state(GameState::Ready);
        }
        self.clear_table();

        let order = Deck::shuffled(&mut self.rng);
        for (i, &id) in order.iter().enumerate() {
            self.put(id, Placement::Ready, i as u32 + 1, Face::Down);
        }

        info!(shuffles = self.rng.shuffles(), "deck staged");
        self.set_state(GameState::Setup);
    }

    /// Deal the staged deck: column n receives n cards with only the last
    /// face up; the remaining cards form the stock.
    pub fn deal(&mut self) -> bool {
        accepted("deal", self.try_deal())
    }

    pub fn try_deal(&mut self) -> Result<(), Rejection> {
        self.expect_state(GameState::Setup)?;

        let mut staged = self.zones.cards(Placement::Ready).to_vec().into_iter();

        'columns: for column in Placement::tableaus() {
            let height = column.column().map_or(0, |c| u32::from(c.value()));
            let mut below: Option<CardId> = None;
            for order in 1..=height {
                let Some(id) = staged.next() else { break 'columns };
                let face = if order == height { Face::Up } else { Face::Down };
                self.put(id, column, order, face);
                if let Some(parent) = below {
                    self.cards.link(parent, id);
                }
                below = Some(id);
            }
        }

        for (i, id) in staged.enumerate() {
            self.put(id, Placement::Stock, i as u32 + 1, Face::Down);
        }

        info!(stock = self.zones.len(Placement::Stock), "dealt");
        self.set_state(GameState::Dealt);
        self.emit(EngineEvent::Dealt);
        Ok(())
    }

    /// Set up and deal a new game.
    pub fn restart(&mut self) {
        self.setup();
        self.deal();
    }

    pub fn pause(&mut self) -> bool {
        if self.state != GameState::Started {
            return false;
        }
        self.set_state(GameState::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != GameState::Paused {
            return false;
        }
        self.set_state(GameState::Started);
        true
    }

    /// Advance the game clock. Only runs while `Started`.
    pub fn elapse(&mut self, seconds: u64) {
        if self.state == GameState::Started {
            self.clock = self.clock.saturating_add(seconds);
            self.status.elapse(seconds);
        }
    }

    /// Replace the table with an explicit position and enter `Dealt`.
    ///
    /// Cards not named by the layout stay outside every pile. A card named
    /// twice keeps its first position.
    pub fn arrange(&mut self, layout: &Layout) {
        self.clear_table();
        for id in CardId::all() {
            self.zones.push(id, Placement::None);
        }

        let mut placed = rustc_hash::FxHashSet::default();
        let mut fresh = |id: CardId| {
            let first = placed.insert(id);
            if !first {
                debug!(card = %id, "card listed twice in layout");
            }
            first
        };

        let stock: Vec<_> = layout.stock.iter().copied().filter(|&id| fresh(id)).collect();
        let waste: Vec<_> = layout.waste.iter().copied().filter(|&id| fresh(id)).collect();
        let foundations: Vec<(Suit, Vec<CardId>)> = layout
            .foundations
            .iter()
            .map(|(suit, ids)| (*suit, ids.iter().copied().filter(|&id| fresh(id)).collect()))
            .collect();
        let tableau: Vec<(Placement, Vec<(CardId, Face)>)> = layout
            .tableau
            .iter()
            .map(|(column, pile)| {
                let hidden = pile.hidden.iter().map(|&id| (id, Face::Down));
                let visible = pile.visible.iter().map(|&id| (id, Face::Up));
                let cards = hidden.chain(visible).filter(|&(id, _)| fresh(id)).collect();
                (Placement::Tableau(*column), cards)
            })
            .collect();

        for (i, &id) in stock.iter().enumerate() {
            self.put(id, Placement::Stock, i as u32 + 1, Face::Down);
        }
        self.put_linked(Placement::Waste, waste.into_iter().map(|id| (id, Face::Up)));
        for (suit, ids) in foundations {
            self.put_linked(Placement::Foundation(suit), ids.into_iter().map(|id| (id, Face::Up)));
        }
        for (column, cards) in tableau {
            self.put_linked(column, cards);
        }

        info!(cards = placed.len(), "table arranged");
        self.set_state(GameState::Dealt);
        self.emit(EngineEvent::Dealt);
    }

    fn clear_table(&mut self) {
        self.cards.reset();
        self.zones.clear();
        self.ledger.clear();
        self.status = Status::default();
        self.clock = 0;
        self.autoplay.reset();
        self.autocomplete.reset();
    }

    /// Place a card on top of a pile without recording anything. Face-up
    /// cards count as revealed.
    fn put(&mut self, id: CardId, placement: Placement, order: u32, face: Face) {
        let card = self.cards.get_mut(id);
        card.placement = placement;
        card.order = order;
        card.face = face;
        card.revealed = face == Face::Up;
        card.available = face == Face::Up;
        self.zones.push(id, placement);
    }

    /// Place a bottom-first run, each card stacked on the one before.
    fn put_linked(&mut self, placement: Placement, cards: impl IntoIterator<Item = (CardId, Face)>) {
        let mut below: Option<CardId> = None;
        for (i, (id, face)) in cards.into_iter().enumerate() {
            self.put(id, placement, i as u32 + 1, face);
            if let Some(parent) = below {
                self.cards.link(parent, id);
            }
            below = Some(id);
        }
    }

    // === Moves ===

    /// Flip the top stock card onto the waste.
    pub fn waste(&mut self, card: CardId) -> bool {
        accepted("waste", self.try_waste(card))
    }

    pub fn try_waste(&mut self, card: CardId) -> Result<Move, Rejection> {
        self.expect_playing()?;
        if self.zones.top(Placement::Stock) != Some(card) {
            return Err(Rejection::NotStockTop(card));
        }

        let onto = self.zones.top(Placement::Waste);
        let mv = self.transfer(card, Placement::Waste, onto);
        self.record(mv.clone());
        Ok(mv)
    }

    /// Move a single available, face-up card to `destination`.
    pub fn place(&mut self, card: CardId, destination: impl Into<Destination>) -> bool {
        accepted("place", self.try_place(card, destination.into()))
    }

    pub fn try_place(&mut self, card: CardId, destination: Destination) -> Result<Move, Rejection> {
        let (to, onto) = self.check_place(card, destination)?;
        let mv = self.transfer(card, to, onto);
        self.record(mv.clone());
        Ok(mv)
    }

    /// Drop `card` on a pile: onto its top card, or as the first card of
    /// an empty pile.
    pub fn drop(&mut self, card: CardId, placement: Placement) -> bool {
        accepted("drop", self.try_drop(card, placement))
    }

    pub fn try_drop(&mut self, card: CardId, placement: Placement) -> Result<Move, Rejection> {
        let destination = match self.zones.top(placement) {
            Some(top) => Destination::Card(top),
            None => Destination::Pile(placement),
        };
        self.try_place(card, destination)
    }

    /// Send `card` to its best destination.
    pub fn play(&mut self, card: CardId) -> bool {
        accepted("play", self.try_play(card))
    }

    pub fn try_play(&mut self, card: CardId) -> Result<Move, Rejection> {
        self.expect_playing()?;
        self.check_movable(card)?;
        let destination = self.best_destination(card).ok_or(Rejection::NoDestination(card))?;
        self.try_place(card, destination)
    }

    /// Turn the whole waste back into stock. Recorded as one ledger entry.
    pub fn restock(&mut self) -> bool {
        accepted("restock", self.try_restock())
    }

    pub fn try_restock(&mut self) -> Result<Vec<Move>, Rejection> {
        self.expect_playing()?;
        let waste = self.zones.cards(Placement::Waste).to_vec();
        if waste.is_empty() {
            return Err(Rejection::EmptyWaste);
        }

        // Every waste card is leaving, so links are cleared on both ends
        // rather than through unlink, which would re-expose parents.
        let mut moves = Vec::with_capacity(waste.len());
        for &id in &waste {
            let parent = self.cards.get(id).parent;
            let revealed = self.cards.get(id).revealed;
            let order = self.zones.next_order(Placement::Stock, &self.cards);

            let card = self.cards.get_mut(id);
            card.parent = None;
            card.child = None;
            card.placement = Placement::Stock;
            card.order = order;
            card.face = Face::Down;
            card.available = false;
            self.zones.push(id, Placement::Stock);

            moves.push(Move {
                id: self.ledger.next_id(),
                card: id,
                placement: Transition::new(Placement::Waste, Placement::Stock),
                parent: Transition::new(parent, None),
                revealed: Transition::new(revealed, revealed),
                exposed: None,
                advanced: None,
                at: self.clock,
            });
        }

        self.status.record_move(0);
        trace!(count = moves.len(), "restocked");
        self.ledger.record(Entry::Restock(moves.clone()));
        self.emit(EngineEvent::Restocked { count: moves.len() });
        self.mark_started();
        Ok(moves)
    }

    /// Reverse the last ledger entry.
    pub fn undo(&mut self) -> bool {
        accepted("undo", self.try_undo())
    }

    pub fn try_undo(&mut self) -> Result<Vec<Move>, Rejection> {
        if !(self.state.is_playing() || self.state == GameState::Ended) {
            return Err(Rejection::NotPlaying(self.state));
        }
        let entry = self.ledger.pop().ok_or(Rejection::EmptyLedger)?;

        match &entry {
            Entry::Move(mv) => self.revert(mv),
            Entry::Restock(moves) => self.revert_restock(moves),
        }

        self.status.record_undo(self.config.scoring.undo_penalty);
        let moves = entry.moves().to_vec();
        trace!(count = moves.len(), "undone");
        self.emit(EngineEvent::Undone { moves: moves.clone() });

        if self.state == GameState::Ended && !self.completed() {
            self.set_state(GameState::Started);
        }
        Ok(moves)
    }

    /// Move `card` and apply every side effect: re-expose the former
    /// parent, or refill an emptied waste from stock.
    fn transfer(&mut self, card: CardId, to: Placement, onto: Option<CardId>) -> Move {
        let before = self.cards.get(card);
        let from = before.placement;
        let parent_from = before.parent;
        let revealed_from = before.revealed;

        self.zones.remove(card);
        self.cards.unlink(card);

        let order = match onto {
            Some(target) => self.cards.get(target).order + 1,
            None => self.zones.next_order(to, &self.cards),
        };
        if let Some(target) = onto {
            self.cards.link(target, card);
        }

        let moved = self.cards.get_mut(card);
        moved.placement = to;
        moved.order = order;
        moved.face = Face::Up;
        moved.revealed = true;
        moved.available = moved.child.is_none();
        moved.moving = false;
        moved.matched = false;
        self.zones.push(card, to);

        let mut exposed = None;
        let mut advanced = None;
        if from == Placement::Waste {
            if self.zones.is_empty(Placement::Waste) {
                advanced = self.advance_stock();
            }
        } else if let Some(parent) = parent_from {
            exposed = self.expose(parent);
        }

        Move {
            id: self.ledger.next_id(),
            card,
            placement: Transition::new(from, to),
            parent: Transition::new(parent_from, onto),
            revealed: Transition::new(revealed_from, true),
            exposed,
            advanced,
            at: self.clock,
        }
    }

    /// Turn a newly uncovered card face up.
    fn expose(&mut self, id: CardId) -> Option<Exposure> {
        let card = self.cards.get_mut(id);
        if card.is_face_up() {
            return None;
        }

        let exposure = Exposure {
            card: id,
            face: Transition::new(card.face, Face::Up),
            revealed: Transition::new(card.revealed, true),
        };
        card.face = Face::Up;
        card.revealed = true;
        card.available = card.child.is_none();
        Some(exposure)
    }

    /// Flip the stock top onto an empty waste.
    fn advance_stock(&mut self) -> Option<Advance> {
        let id = self.zones.top(Placement::Stock)?;
        let order = self.zones.next_order(Placement::Waste, &self.cards);

        let card = self.cards.get_mut(id);
        let advance = Advance {
            card: id,
            revealed: Transition::new(card.revealed, true),
        };
        card.placement = Placement::Waste;
        card.order = order;
        card.face = Face::Up;
        card.revealed = true;
        card.available = true;
        self.zones.push(id, Placement::Waste);
        Some(advance)
    }

    fn record(&mut self, mv: Move) {
        let delta = scoring::score_move(&self.config.scoring, &mv);
        self.status.record_move(delta);
        trace!(%mv, delta, "recorded");

        self.ledger.record(Entry::Move(mv.clone()));
        self.emit(EngineEvent::Placed(mv));
        self.mark_started();

        if self.completed() {
            info!(score = self.status.score(), moves = self.status.moves(), "game completed");
            self.set_state(GameState::Ended);
        }
    }

    fn mark_started(&mut self) {
        if self.state == GameState::Dealt {
            self.set_state(GameState::Started);
        }
    }

    fn revert(&mut self, mv: &Move) {
        if let Some(advance) = mv.advanced {
            let order = self.zones.next_order(Placement::Stock, &self.cards);
            let card = self.cards.get_mut(advance.card);
            card.placement = Placement::Stock;
            card.order = order;
            card.face = Face::Down;
            card.available = false;
            card.revealed = advance.revealed.from;
            self.zones.push(advance.card, Placement::Stock);
        }

        if let Some(exposure) = mv.exposed {
            let card = self.cards.get_mut(exposure.card);
            card.face = exposure.face.from;
            card.revealed = exposure.revealed.from;
        }

        self.zones.remove(mv.card);
        self.cards.unlink(mv.card);

        let to = mv.placement.from;
        let order = self.zones.next_order(to, &self.cards);
        if let Some(parent) = mv.parent.from {
            self.cards.link(parent, mv.card);
        }

        let card = self.cards.get_mut(mv.card);
        card.placement = to;
        card.order = order;
        card.revealed = mv.revealed.from;
        if to == Placement::Stock {
            card.face = Face::Down;
            card.available = false;
        } else {
            card.face = Face::Up;
            card.available = card.child.is_none();
        }
        self.zones.push(mv.card, to);
    }

    /// Put restocked cards back on the waste, bottom first.
    fn revert_restock(&mut self, moves: &[Move]) {
        for mv in moves {
            self.zones.remove(mv.card);
            let order = self.zones.next_order(Placement::Waste, &self.cards);
            if let Some(parent) = mv.parent.from {
                self.cards.link(parent, mv.card);
            }

            let card = self.cards.get_mut(mv.card);
            card.placement = Placement::Waste;
            card.order = order;
            card.face = Face::Up;
            card.revealed = mv.revealed.from;
            card.available = card.child.is_none();
            self.zones.push(mv.card, Placement::Waste);
        }
    }

    fn check_movable(&self, id: CardId) -> Result<(), Rejection> {
        let card = self.cards.get(id);
        if !card.placement.is_in_play() {
            return Err(Rejection::NotMovable { card: id, placement: card.placement });
        }
        if !card.is_face_up() {
            return Err(Rejection::FaceDown(id));
        }
        if !card.available {
            return Err(Rejection::Unavailable(id));
        }
        Ok(())
    }

    /// Resolve a destination to the pile and the card stacked onto.
    fn check_place(
        &self,
        id: CardId,
        destination: Destination,
    ) -> Result<(Placement, Option<CardId>), Rejection> {
        self.expect_playing()?;
        self.check_movable(id)?;
        let card = self.cards.get(id);

        match destination {
            Destination::Pile(placement) => {
                if !self.zones.is_empty(placement) || !valid_for_placement(card, placement) {
                    return Err(Rejection::IllegalPlacement { card: id, placement });
                }
                Ok((placement, None))
            }
            Destination::Card(target_id) => {
                if target_id == id {
                    return Err(Rejection::SamePile(id));
                }
                let target = self.cards.get(target_id);
                if target.placement == card.placement {
                    return Err(Rejection::SamePile(id));
                }
                if !target.is_face_up() {
                    return Err(Rejection::FaceDown(target_id));
                }
                if !target.available {
                    return Err(Rejection::Unavailable(target_id));
                }
                if !valid_for_target(card, target) {
                    return Err(Rejection::IllegalTarget { card: id, target: target_id });
                }
                Ok((target.placement, Some(target_id)))
            }
        }
    }

    // === Intents ===

    /// Apply a resolved user intent.
    ///
    /// - tap: the stock top goes to waste, any other card to its best
    ///   destination
    /// - drag: mark the card moving and highlight accepting tops
    /// - drop: clear highlights, then drop on the target pile
    /// - reset: clear highlights
    pub fn handle(&mut self, intent: Intent) -> bool {
        match intent.kind {
            IntentKind::Tap => {
                if self.cards.get(intent.card).placement == Placement::Stock {
                    self.waste(intent.card)
                } else {
                    self.play(intent.card)
                }
            }
            IntentKind::Drag => self.begin_drag(intent.card),
            IntentKind::Drop => {
                self.clear_transient();
                match intent.target {
                    Some(target) => self.drop(intent.card, target),
                    None => false,
                }
            }
            IntentKind::Reset => {
                self.clear_transient();
                true
            }
        }
    }

    fn begin_drag(&mut self, id: CardId) -> bool {
        if let Err(reason) = self.expect_playing().and_then(|()| self.check_movable(id)) {
            debug!(card = %id, %reason, "drag declined");
            return false;
        }

        let targets: Vec<CardId> = Placement::tableaus()
            .chain(Placement::foundations())
            .filter_map(|p| self.zones.top(p))
            .filter(|&top| self.can_place(id, Destination::Card(top)))
            .collect();

        self.cards.get_mut(id).moving = true;
        for &target in &targets {
            self.cards.get_mut(target).matched = true;
        }
        self.emit(EngineEvent::Highlighted { card: id, targets });
        true
    }

    fn clear_transient(&mut self) {
        for card in self.cards.iter_mut() {
            card.moving = false;
            card.matched = false;
        }
        self.emit(EngineEvent::Cleared);
    }

    // === Planners ===

    /// One autoplay tick. `false` once nothing productive remains.
    pub fn autoplay(&mut self) -> bool {
        let mut planner = std::mem::take(&mut self.autoplay);
        let progressed = planner.step(self);
        self.autoplay = planner;
        progressed
    }

    /// One autocomplete tick. `false` when finished or not yet possible.
    pub fn autocomplete(&mut self) -> bool {
        let mut planner = std::mem::take(&mut self.autocomplete);
        let progressed = planner.step(self);
        self.autocomplete = planner;
        progressed
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("state", &self.state)
            .field("status", &self.status)
            .field("ledger", &self.ledger.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

fn accepted<T>(operation: &'static str, result: Result<T, Rejection>) -> bool {
    match result {
        Ok(_) => true,
        Err(reason) => {
            debug!(operation, %reason, "declined");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, Rank};

    fn id(suit: Suit, rank: Rank) -> CardId {
        CardId::new(suit, rank)
    }

    fn dealt(seed: u64) -> GameEngine {
        let mut engine = GameEngine::new(EngineConfig::new(seed));
        engine.relayout(LayoutSize::new(100.0, 100.0));
        assert!(engine.deal());
        engine
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = GameEngine::new(EngineConfig::default());
        assert_eq!(engine.state(), GameState::None);
        assert_eq!(engine.pile(Placement::None).len(), 52);
        assert!(engine.audit().is_empty());
    }

    #[test]
    fn test_relayout_sets_up_once() {
        let mut engine = GameEngine::new(EngineConfig::new(3));
        engine.relayout(LayoutSize::new(10.0, 10.0));
        assert_eq!(engine.state(), GameState::Setup);
        assert_eq!(engine.pile(Placement::Ready).len(), 52);

        assert!(engine.deal());
        engine.relayout(LayoutSize::new(20.0, 20.0));
        assert_eq!(engine.state(), GameState::Dealt);
    }

    #[test]
    fn test_deal_requires_setup() {
        let mut engine = GameEngine::new(EngineConfig::new(3));
        assert_eq!(
            engine.try_deal(),
            Err(Rejection::WrongState { expected: GameState::Setup, actual: GameState::None })
        );
    }

    #[test]
    fn test_deal_layout() {
        let engine = dealt(11);
        for (n, column) in Placement::tableaus().enumerate() {
            let pile = engine.pile(column);
            assert_eq!(pile.len(), n + 1);
            for (i, &id) in pile.iter().enumerate() {
                let card = engine.card(id);
                assert_eq!(card.order, i as u32 + 1);
                assert_eq!(card.is_face_up(), i == n);
                assert_eq!(card.available, i == n);
            }
        }
        assert_eq!(engine.pile(Placement::Stock).len(), 24);
        assert!(engine.pile(Placement::Waste).is_empty());
        assert!(engine.audit().is_empty(), "{:?}", engine.audit());
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = dealt(42);
        let b = dealt(42);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_waste_only_stock_top() {
        let mut engine = dealt(5);
        let stock = engine.pile(Placement::Stock).to_vec();
        let bottom = stock[0];
        let top = *stock.last().unwrap();

        assert_eq!(engine.try_waste(bottom), Err(Rejection::NotStockTop(bottom)));
        assert!(engine.waste(top));

        let card = engine.card(top);
        assert_eq!(card.placement, Placement::Waste);
        assert!(card.is_face_up());
        assert!(card.available);
        assert_eq!(engine.state(), GameState::Started);
        assert_eq!(engine.status().moves(), 1);
    }

    #[test]
    fn test_waste_chain_links() {
        let mut engine = dealt(5);
        let first = engine.top(Placement::Stock).unwrap();
        assert!(engine.waste(first));
        let second = engine.top(Placement::Stock).unwrap();
        assert!(engine.waste(second));

        assert_eq!(engine.card(second).parent, Some(first));
        assert!(!engine.card(first).available);
        assert!(engine.audit().is_empty(), "{:?}", engine.audit());
    }

    #[test]
    fn test_moves_rejected_before_deal() {
        let mut engine = GameEngine::new(EngineConfig::new(1));
        engine.relayout(LayoutSize::default());
        let card = engine.pile(Placement::Ready)[0];
        assert_eq!(
            engine.try_place(card, Destination::Pile(Placement::Tableau(Column::One))),
            Err(Rejection::NotPlaying(GameState::Setup))
        );
        assert!(!engine.restock());
        assert!(!engine.undo());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut engine = dealt(1);
        assert!(!engine.pause());

        let top = engine.top(Placement::Stock).unwrap();
        engine.waste(top);
        engine.elapse(5);
        assert!(engine.pause());
        engine.elapse(5);
        assert_eq!(engine.status().time(), 5);

        let next = engine.top(Placement::Stock).unwrap();
        assert!(!engine.waste(next));

        assert!(engine.resume());
        assert!(!engine.resume());
        assert!(engine.waste(next));
    }

    #[test]
    fn test_move_timestamped_with_clock() {
        let mut engine = dealt(1);
        let top = engine.top(Placement::Stock).unwrap();
        engine.waste(top);
        engine.elapse(12);
        let next = engine.top(Placement::Stock).unwrap();
        let mv = engine.try_waste(next).unwrap();
        assert_eq!(mv.at, 12);
    }

    #[test]
    fn test_restock_reverses_waste() {
        let mut engine = dealt(8);
        let mut stock = engine.pile(Placement::Stock).to_vec();
        while let Some(top) = engine.top(Placement::Stock) {
            assert!(engine.waste(top));
        }
        assert!(engine.restock());

        // The last card wasted is back on top.
        stock.reverse();
        assert_eq!(engine.pile(Placement::Stock), stock.as_slice());
        assert_eq!(engine.top(Placement::Stock), stock.last().copied());
        assert!(engine.pile(Placement::Waste).is_empty());
        assert!(engine.audit().is_empty(), "{:?}", engine.audit());

        assert!(engine.undo());
        assert_eq!(engine.pile(Placement::Waste).len(), 24);
        assert!(engine.pile(Placement::Stock).is_empty());
        assert!(engine.audit().is_empty(), "{:?}", engine.audit());
    }

    #[test]
    fn test_restock_empty_waste_rejected() {
        let mut engine = dealt(8);
        assert_eq!(engine.try_restock(), Err(Rejection::EmptyWaste));
    }

    #[test]
    fn test_king_to_empty_column_and_undo() {
        let king = id(Suit::Spades, Rank::King);
        let hidden = id(Suit::Hearts, Rank::Four);
        let layout = Layout::new()
            .tableau(Column::One, [hidden], [king])
            .stock([id(Suit::Clubs, Rank::Two)]);
        let mut engine = GameEngine::new(EngineConfig::new(1));
        engine.arrange(&layout);

        let target = Placement::Tableau(Column::Two);
        let mv = engine.try_place(king, Destination::Pile(target)).unwrap();
        assert_eq!(mv.exposed.map(|e| e.card), Some(hidden));
        assert!(engine.card(hidden).is_face_up());
        assert_eq!(engine.status().score(), 30);

        assert!(engine.undo());
        assert!(!engine.card(hidden).is_face_up());
        assert!(!engine.card(hidden).revealed);
        assert_eq!(engine.card(king).parent, Some(hidden));
        assert_eq!(engine.status().score(), 20);
        assert_eq!(engine.status().moves(), 2);
        assert!(engine.audit().is_empty(), "{:?}", engine.audit());
    }

    #[test]
    fn test_drop_on_occupied_column_uses_top() {
        let eight = id(Suit::Spades, Rank::Eight);
        let seven = id(Suit::Hearts, Rank::Seven);
        let layout = Layout::new()
            .tableau(Column::One, [], [eight])
            .tableau(Column::Two, [], [seven]);
        let mut engine = GameEngine::new(EngineConfig::new(1));
        engine.arrange(&layout);

        assert!(engine.drop(seven, Placement::Tableau(Column::One)));
        assert_eq!(engine.card(seven).parent, Some(eight));
        assert!(engine.pile(Placement::Tableau(Column::Two)).is_empty());
    }

    #[test]
    fn test_illegal_drop_changes_nothing() {
        let eight = id(Suit::Spades, Rank::Eight);
        let seven = id(Suit::Clubs, Rank::Seven);
        let layout = Layout::new()
            .tableau(Column::One, [], [eight])
            .tableau(Column::Two, [], [seven]);
        let mut engine = GameEngine::new(EngineConfig::new(1));
        engine.arrange(&layout);

        let before = engine.snapshot();
        assert!(!engine.drop(seven, Placement::Tableau(Column::One)));
        assert_eq!(engine.snapshot(), before);
        assert!(engine.ledger().is_empty());
    }

    #[test]
    fn test_face_down_card_cannot_move() {
        let hidden = id(Suit::Spades, Rank::King);
        let layout = Layout::new().tableau(Column::One, [hidden], [id(Suit::Hearts, Rank::Two)]);
        let mut engine = GameEngine::new(EngineConfig::new(1));
        engine.arrange(&layout);

        assert_eq!(
            engine.try_place(hidden, Destination::Pile(Placement::Tableau(Column::Two))),
            Err(Rejection::FaceDown(hidden))
        );
    }

    #[test]
    fn test_tap_prefers_foundation() {
        let ace = id(Suit::Hearts, Rank::Ace);
        let two = id(Suit::Spades, Rank::Two);
        let layout = Layout::new()
            .tableau(Column::One, [], [two])
            .tableau(Column::Two, [], [ace]);
        let mut engine = GameEngine::new(EngineConfig::new(1));
        engine.arrange(&layout);

        assert!(engine.handle(Intent::tap(ace)));
        assert_eq!(engine.card(ace).placement, Placement::Foundation(Suit::Hearts));
        assert_eq!(engine.status().score(), 50);
    }

    #[test]
    fn test_tap_without_destination() {
        let layout = Layout::new().tableau(Column::One, [], [id(Suit::Hearts, Rank::Five)]);
        let mut engine = GameEngine::new(EngineConfig::new(1));
        engine.arrange(&layout);

        let five = id(Suit::Hearts, Rank::Five);
        assert_eq!(engine.try_play(five), Err(Rejection::NoDestination(five)));
    }

    #[test]
    fn test_drag_highlights_targets() {
        let seven = id(Suit::Hearts, Rank::Seven);
        let black_eight = id(Suit::Spades, Rank::Eight);
        let red_eight = id(Suit::Diamonds, Rank::Eight);
        let layout = Layout::new()
            .tableau(Column::One, [], [black_eight])
            .tableau(Column::Two, [], [red_eight])
            .tableau(Column::Three, [], [seven]);
        let mut engine = GameEngine::new(EngineConfig::new(1));
        engine.arrange(&layout);

        assert!(engine.handle(Intent::drag(seven)));
        assert!(engine.card(seven).moving);
        assert!(engine.card(black_eight).matched);
        assert!(!engine.card(red_eight).matched);

        assert!(engine.handle(Intent::reset(seven)));
        assert!(!engine.card(seven).moving);
        assert!(!engine.card(black_eight).matched);
    }

    #[test]
    fn test_completion_ends_game_and_undo_reopens() {
        let mut layout = Layout::new();
        for suit in Suit::ALL {
            layout = layout.foundation(
                suit,
                Rank::ALL[..12].iter().map(|&rank| CardId::new(suit, rank)),
            );
        }
        let kings: Vec<_> = Suit::ALL.iter().map(|&s| id(s, Rank::King)).collect();
        for (column, &king) in [Column::One, Column::Two, Column::Three, Column::Four]
            .into_iter()
            .zip(&kings)
        {
            layout = layout.tableau(column, [], [king]);
        }

        let mut engine = GameEngine::new(EngineConfig::new(1));
        engine.arrange(&layout);
        for &king in &kings {
            assert!(engine.play(king));
        }
        assert!(engine.completed());
        assert_eq!(engine.state(), GameState::Ended);

        assert!(engine.undo());
        assert!(!engine.completed());
        assert_eq!(engine.state(), GameState::Started);
    }

    #[test]
    fn test_restart_clears_history() {
        let mut engine = dealt(2);
        let top = engine.top(Placement::Stock).unwrap();
        engine.waste(top);
        engine.restart();

        assert_eq!(engine.state(), GameState::Dealt);
        assert!(engine.ledger().is_empty());
        assert_eq!(*engine.status(), Status::default());
        assert!(engine.audit().is_empty());
    }

    #[test]
    fn test_arrange_skips_duplicates() {
        let king = id(Suit::Spades, Rank::King);
        let layout = Layout::new()
            .tableau(Column::One, [], [king])
            .stock([king]);
        let mut engine = GameEngine::new(EngineConfig::new(1));
        engine.arrange(&layout);

        // Stock is laid out before the tableau.
        assert_eq!(engine.card(king).placement, Placement::Stock);
        assert!(engine.pile(Placement::Tableau(Column::One)).is_empty());
        assert_eq!(engine.pile(Placement::None).len(), 51);
        assert!(engine.audit().is_empty(), "{:?}", engine.audit());
    }
}
