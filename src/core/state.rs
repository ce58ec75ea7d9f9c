//! Game state: the aggregate root.
//!
//! ## GameState
//!
//! Everything the engine owns:
//! - Registered players and their number rows
//! - The card pool (index-stable, shared by all players)
//! - Per-player done flags and the pending move queue
//! - Turn counter and the per-turn dice flag
//!
//! `GameState` is a plain value. Cloning it yields a fully independent
//! snapshot; the card pool is an `im::Vector`, so the clone is cheap and
//! copy-on-write underneath.

use bigdecimal::BigDecimal;
use im::Vector;
use serde::{Deserialize, Serialize};

use super::number::{empty_row, limit_precision, Mark, NumberRow, NumberSlot};
use super::player::{Player, PlayerId, PlayerMap};
use crate::cards::{Card, CardIndex, CardOwner};

/// Complete game state.
///
/// Invariant: `players`, `numbers` and `done` always have the same length.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Opaque identifier chosen by the host.
    pub game_id: String,

    players: PlayerMap<Player>,

    /// Card pool; a card's index never changes.
    cards: Vector<Card>,

    numbers: PlayerMap<NumberRow>,

    done: PlayerMap<bool>,

    /// Staged cards awaiting turn-end resolution, in FIFO order.
    queue: Vec<CardIndex>,

    /// Turns elapsed; `turn % player_count` is the current player.
    turn: u64,

    /// Whether the current player has rolled this turn.
    dice_rolled: bool,
}

impl GameState {
    /// Create an empty game with no players and no cards.
    #[must_use]
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            players: PlayerMap::default(),
            cards: Vector::new(),
            numbers: PlayerMap::default(),
            done: PlayerMap::default(),
            queue: Vec::new(),
            turn: 0,
            dice_rolled: false,
        }
    }

    // === Players ===

    /// Seat a player with an empty row. Callers check `MAX_PLAYERS`.
    pub fn add_player(&mut self, player: Player) -> PlayerId {
        let id = self.players.push(player);
        self.numbers.push(empty_row());
        self.done.push(false);
        id
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    /// Find a player by display name.
    #[must_use]
    pub fn find_player(&self, name: &str) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|(_, p)| p.name == name)
            .map(|(id, _)| id)
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        self.players.player_ids()
    }

    /// The player whose turn it is; `None` with no players.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        let count = self.player_count() as u64;
        if count == 0 {
            return None;
        }
        u8::try_from(self.turn % count).ok().map(PlayerId::new)
    }

    // === Turn ===

    #[must_use]
    pub fn turn(&self) -> u64 {
        self.turn
    }

    #[must_use]
    pub fn dice_rolled(&self) -> bool {
        self.dice_rolled
    }

    pub fn set_dice_rolled(&mut self) {
        self.dice_rolled = true;
    }

    /// Move to the next turn: bump the counter, clear the dice flag and
    /// every done flag.
    pub fn advance_turn(&mut self) {
        self.turn += 1;
        self.dice_rolled = false;
        self.reset_done();
    }

    // === Done flags ===

    /// Whether `player` has ended their turn. Unknown players are not done.
    #[must_use]
    pub fn is_done(&self, player: PlayerId) -> bool {
        self.done.get(player).copied().unwrap_or(false)
    }

    pub fn set_done(&mut self, player: PlayerId) {
        if let Some(flag) = self.done.get_mut(player) {
            *flag = true;
        }
    }

    /// Whether every player has ended their turn.
    #[must_use]
    pub fn all_done(&self) -> bool {
        self.done.values().all(|d| *d)
    }

    pub fn reset_done(&mut self) {
        for (_, flag) in self.done.iter_mut() {
            *flag = false;
        }
    }

    // === Numbers ===

    #[must_use]
    pub fn row(&self, player: PlayerId) -> Option<&NumberRow> {
        self.numbers.get(player)
    }

    pub fn row_mut(&mut self, player: PlayerId) -> Option<&mut NumberRow> {
        self.numbers.get_mut(player)
    }

    /// Iterate over every row mutably.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut NumberRow)> {
        self.numbers.iter_mut()
    }

    #[must_use]
    pub fn slot(&self, player: PlayerId, index: usize) -> Option<&NumberSlot> {
        self.numbers.get(player)?.get(index)
    }

    pub fn slot_mut(&mut self, player: PlayerId, index: usize) -> Option<&mut NumberSlot> {
        self.numbers.get_mut(player)?.get_mut(index)
    }

    /// First empty slot in `player`'s row.
    #[must_use]
    pub fn first_null_slot(&self, player: PlayerId) -> Option<usize> {
        self.row(player)?.iter().position(NumberSlot::is_null)
    }

    /// Place a constant in `player`'s row and return the slot used.
    ///
    /// Takes the first empty slot; with none, overwrites the smallest value
    /// (lowest index on ties). Returns `None` only for an unknown player.
    pub fn add_constant(&mut self, player: PlayerId, value: BigDecimal, mark: Mark) -> Option<usize> {
        let row = self.numbers.get_mut(player)?;

        let index = match row.iter().position(NumberSlot::is_null) {
            Some(empty) => empty,
            None => {
                let mut min = 0;
                for (i, slot) in row.iter().enumerate().skip(1) {
                    if slot.value < row[min].value {
                        min = i;
                    }
                }
                min
            }
        };

        row[index].set(limit_precision(value), mark);
        Some(index)
    }

    // === Cards ===

    #[must_use]
    pub fn cards(&self) -> &Vector<Card> {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, index: CardIndex) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn card_mut(&mut self, index: CardIndex) -> Option<&mut Card> {
        self.cards.get_mut(index)
    }

    /// Append a card to the pool and return its index.
    pub fn push_card(&mut self, card: Card) -> CardIndex {
        self.cards.push_back(card);
        self.cards.len() - 1
    }

    /// Append several cards to the pool.
    pub fn extend_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    /// Indices of the cards `player` holds, in pool order.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> Vec<CardIndex> {
        self.indices_where(CardOwner::Player(player))
    }

    /// Number of cards `player` holds.
    #[must_use]
    pub fn hand_count(&self, player: PlayerId) -> usize {
        self.cards.iter().filter(|c| c.is_owned_by(player)).count()
    }

    /// Indices of every card with the given owner, in pool order.
    #[must_use]
    pub fn indices_where(&self, owner: CardOwner) -> Vec<CardIndex> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.owner == owner)
            .map(|(i, _)| i)
            .collect()
    }

    /// Move every discarded card back into the draw pool.
    ///
    /// Returns how many cards were recycled.
    pub fn recycle_discards(&mut self) -> usize {
        let mut recycled = 0;
        for card in self.cards.iter_mut() {
            if card.owner == CardOwner::Discarded {
                card.owner = CardOwner::InDeck;
                recycled += 1;
            }
        }
        recycled
    }

    // === Queue ===

    #[must_use]
    pub fn queue(&self) -> &[CardIndex] {
        &self.queue
    }

    #[must_use]
    pub fn is_queued(&self, card: CardIndex) -> bool {
        self.queue.contains(&card)
    }

    pub fn enqueue(&mut self, card: CardIndex) {
        self.queue.push(card);
    }

    /// Remove and return the whole queue.
    pub fn take_queue(&mut self) -> Vec<CardIndex> {
        std::mem::take(&mut self.queue)
    }

    // === Serialization ===

    /// Compact binary encoding of the whole state.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode a state produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{InputShape, Operation};

    fn state_with_players(n: usize) -> GameState {
        let mut state = GameState::new("test");
        for i in 0..n {
            state.add_player(Player::new(format!("p{i}"), "hash"));
        }
        state
    }

    fn pi_card() -> Card {
        Card::new("Pi", "", Operation::Pi, InputShape::default())
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new("g1");

        assert_eq!(state.player_count(), 0);
        assert_eq!(state.current_player(), None);
        assert_eq!(state.turn(), 0);
        assert!(state.queue().is_empty());
    }

    #[test]
    fn test_add_player_keeps_maps_aligned() {
        let state = state_with_players(3);

        assert_eq!(state.player_count(), 3);
        assert!(state.row(PlayerId::new(2)).is_some());
        assert!(!state.is_done(PlayerId::new(2)));
        assert_eq!(state.first_null_slot(PlayerId::new(0)), Some(0));
        assert_eq!(state.find_player("p1"), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_current_player_rotates() {
        let mut state = state_with_players(3);

        assert_eq!(state.current_player(), Some(PlayerId::new(0)));
        state.advance_turn();
        state.advance_turn();
        assert_eq!(state.current_player(), Some(PlayerId::new(2)));
        state.advance_turn();
        assert_eq!(state.current_player(), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_advance_turn_resets_flags() {
        let mut state = state_with_players(2);
        state.set_done(PlayerId::new(0));
        state.set_done(PlayerId::new(1));
        state.set_dice_rolled();
        assert!(state.all_done());

        state.advance_turn();

        assert!(!state.all_done());
        assert!(!state.dice_rolled());
        assert_eq!(state.turn(), 1);
    }

    #[test]
    fn test_add_constant_prefers_empty_slot() {
        let mut state = state_with_players(1);
        let p = PlayerId::new(0);
        state.row_mut(p).unwrap()[0] = NumberSlot::new(4);

        let index = state.add_constant(p, BigDecimal::from(9), Mark::None);

        assert_eq!(index, Some(1));
        assert_eq!(state.slot(p, 1).unwrap().value, BigDecimal::from(9));
    }

    #[test]
    fn test_add_constant_replaces_minimum_lowest_index() {
        let mut state = state_with_players(1);
        let p = PlayerId::new(0);
        let values = [5, 2, 8, 2, 7];
        for (slot, v) in state.row_mut(p).unwrap().iter_mut().zip(values) {
            *slot = NumberSlot::new(v);
        }

        let index = state.add_constant(p, BigDecimal::from(1), Mark::Fibonacci);

        assert_eq!(index, Some(1));
        assert_eq!(state.slot(p, 1).unwrap().mark, Mark::Fibonacci);
        assert_eq!(state.slot(p, 3).unwrap().value, BigDecimal::from(2));
    }

    #[test]
    fn test_add_constant_unknown_player() {
        let mut state = state_with_players(1);
        assert_eq!(
            state.add_constant(PlayerId::new(4), BigDecimal::from(1), Mark::None),
            None
        );
    }

    #[test]
    fn test_hands_and_recycling() {
        let mut state = state_with_players(2);
        let a = state.push_card(pi_card().owned_by(PlayerId::new(0)));
        let b = state.push_card(pi_card());
        let c = state.push_card(pi_card());
        state.card_mut(c).unwrap().discard();

        assert_eq!(state.hand(PlayerId::new(0)), vec![a]);
        assert_eq!(state.hand_count(PlayerId::new(1)), 0);
        assert_eq!(state.indices_where(CardOwner::InDeck), vec![b]);

        assert_eq!(state.recycle_discards(), 1);
        assert_eq!(state.indices_where(CardOwner::InDeck), vec![b, c]);
    }

    #[test]
    fn test_queue() {
        let mut state = state_with_players(1);
        state.enqueue(3);
        state.enqueue(1);

        assert!(state.is_queued(1));
        assert_eq!(state.take_queue(), vec![3, 1]);
        assert!(state.queue().is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut state = state_with_players(1);
        state.push_card(pi_card());
        let snapshot = state.clone();

        state.card_mut(0).unwrap().owner = CardOwner::Player(PlayerId::new(0));
        state.add_constant(PlayerId::new(0), BigDecimal::from(3), Mark::None);

        assert_eq!(snapshot.card(0).unwrap().owner, CardOwner::InDeck);
        assert!(snapshot.slot(PlayerId::new(0), 0).unwrap().is_null());
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut state = state_with_players(2);
        state.push_card(pi_card());
        state.add_constant(PlayerId::new(1), "3.25".parse().unwrap(), Mark::Immune);

        let bytes = state.to_bytes().unwrap();
        let back = GameState::from_bytes(&bytes).unwrap();

        assert_eq!(state, back);
    }

    #[test]
    fn test_json_round_trip() {
        let mut state = state_with_players(2);
        state.push_card(pi_card().owned_by(PlayerId::new(1)));
        state.enqueue(0);

        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, back);
    }
}
