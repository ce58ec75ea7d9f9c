//! The shared game: one canonical `GameState` behind a reader-writer lock.
//!
//! ## Locking
//!
//! Mutations (committing a move, ending a turn, rolling dice, registering,
//! restocking) take the state write lock. Reads take the read lock and hand
//! out owned snapshots. Previews clone the state under the read lock and
//! resolve on the clone with no lock held.
//!
//! The RNG has its own mutex and is always locked after the state lock.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bigdecimal::BigDecimal;

use super::turn;
use crate::cards::{standard_deck, Card, CardIndex, Operands};
use crate::core::{
    Dice, EngineConfig, GameRng, GameState, Mark, Player, PlayerId, TurnResolution, MAX_PLAYERS,
};
use crate::effects::{validate_operands, EffectResolver, QueueFailure};
use crate::error::{EffectError, GameError, ValidationError};

/// A running game shared by every connected player.
///
/// `Game` is `Send + Sync`; wrap it in an `Arc` to share it between
/// connection handlers.
///
/// ## Example
///
/// ```
/// use matetra_engine::core::{hash_credential, EngineConfig};
/// use matetra_engine::engine::Game;
///
/// let game = Game::standard("table-1", EngineConfig::new().with_seed(1));
/// let ada = game.register_player("ada", &hash_credential("secret")).unwrap();
///
/// assert_eq!(game.hand_count(ada), 6);
/// assert_eq!(game.current_player(), Some(ada));
///
/// let state = game.roll_dice(ada).unwrap();
/// assert!(!state.slot(ada, 0).unwrap().is_null());
/// ```
#[derive(Debug)]
pub struct Game {
    state: RwLock<GameState>,
    rng: Mutex<GameRng>,
    resolver: EffectResolver,
    config: EngineConfig,
}

impl Game {
    /// Create a game with no players and an empty card pool.
    #[must_use]
    pub fn new(game_id: impl Into<String>, config: EngineConfig) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self {
            state: RwLock::new(GameState::new(game_id)),
            rng: Mutex::new(rng),
            resolver: EffectResolver::standard(),
            config,
        }
    }

    /// Resume from a snapshot, e.g. one produced by `GameState::from_bytes`.
    #[must_use]
    pub fn from_state(state: GameState, config: EngineConfig) -> Self {
        let game = Self::new(state.game_id.clone(), config);
        *game.write() = state;
        game
    }

    /// Create a game whose pool holds `cards`.
    #[must_use]
    pub fn with_deck(
        game_id: impl Into<String>,
        config: EngineConfig,
        cards: impl IntoIterator<Item = Card>,
    ) -> Self {
        let game = Self::new(game_id, config);
        game.load_cards(cards);
        game
    }

    /// Create a game with the built-in deck.
    #[must_use]
    pub fn standard(game_id: impl Into<String>, config: EngineConfig) -> Self {
        Self::with_deck(game_id, config, standard_deck())
    }

    /// Replace the effect dispatch table.
    #[must_use]
    pub fn with_resolver(mut self, resolver: EffectResolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, GameState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GameState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn rng(&self) -> MutexGuard<'_, GameRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // === Setup ===

    /// Append cards to the pool.
    pub fn load_cards(&self, cards: impl IntoIterator<Item = Card>) {
        let mut state = self.write();
        let before = state.cards().len();
        state.extend_cards(cards);
        log::info!("loaded {} cards", state.cards().len() - before);
    }

    /// Seat a player and deal them a hand.
    ///
    /// Names must be unique and non-empty; the hash must be non-empty.
    pub fn register_player(&self, name: &str, credential_hash: &str) -> Result<PlayerId, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid_player("name is empty"));
        }
        if credential_hash.is_empty() {
            return Err(invalid_player("credential hash is empty"));
        }

        let mut state = self.write();
        if state.find_player(name).is_some() {
            return Err(invalid_player(format!("{name:?} is already registered")));
        }
        if state.player_count() >= MAX_PLAYERS {
            return Err(invalid_player("the table is full"));
        }

        let id = state.add_player(Player::new(name, credential_hash));
        let mut rng = self.rng();
        turn::restock_player(&mut state, id, self.config.hand_size, &mut *rng);

        log::info!("{name} joined as {id}");
        Ok(id)
    }

    /// The player registered as `name`, if `credential_hash` matches.
    #[must_use]
    pub fn authenticate(&self, name: &str, credential_hash: &str) -> Option<PlayerId> {
        let state = self.read();
        let id = state.find_player(name)?;
        let player = state.player(id)?;
        (player.credential_hash == credential_hash).then_some(id)
    }

    /// Deal every player back up to the configured hand size.
    pub fn restock(&self) {
        let mut state = self.write();
        let mut rng = self.rng();
        turn::restock(&mut state, self.config.hand_size, &mut *rng);
    }

    // === Reads ===

    /// An independent copy of the canonical state.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.read().clone()
    }

    /// The player whose turn it is; `None` before anyone registers.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        self.read().current_player()
    }

    /// Whether `player` holds `card`.
    #[must_use]
    pub fn can_play(&self, player: PlayerId, card: CardIndex) -> bool {
        self.read()
            .card(card)
            .is_some_and(|c| c.is_owned_by(player))
    }

    #[must_use]
    pub fn hand_count(&self, player: PlayerId) -> usize {
        self.read().hand_count(player)
    }

    /// Whether every player has ended the current turn.
    #[must_use]
    pub fn turns_finished(&self) -> bool {
        self.read().all_done()
    }

    // === Moves ===

    /// Preview a move and, if `permanent`, queue it for turn end.
    ///
    /// The preview resolves every already-queued card plus this one on a
    /// private copy, with dice forked from the game RNG, and returns that
    /// copy. Canonical numbers never change here: a committed move only
    /// joins the queue, after being re-validated against canonical state.
    pub fn stage_move(
        &self,
        player: PlayerId,
        card: CardIndex,
        operands: &[i64],
        permanent: bool,
    ) -> Result<GameState, GameError> {
        let mut preview = {
            let state = self.read();
            check_stageable(&state, player, card, operands)?;
            state.clone()
        };

        if let Some(staged) = preview.card_mut(card) {
            staged.operands = Operands::from_slice(operands);
        }
        preview.enqueue(card);
        let queue = preview.take_queue();

        let mut dice = self.rng().fork();
        self.resolver
            .resolve_queue(&mut preview, &queue, &mut dice)
            .map_err(|failure| preview_error(failure, card))?;

        if !permanent {
            log::debug!("{player} previewed card {card}");
            return Ok(preview);
        }

        let mut state = self.write();
        if state.is_done(player) {
            return Err(EffectError::TurnAlreadyEnded.into());
        }
        // The canonical state may have moved on since the preview was taken.
        check_stageable(&state, player, card, operands)?;
        let (shape, owner) = state
            .card(card)
            .map(|c| (c.shape.clone(), c.owner))
            .ok_or(GameError::UnknownCard(card))?;
        validate_operands(&state, &shape, owner, operands)?;

        if let Some(staged) = state.card_mut(card) {
            staged.operands = Operands::from_slice(operands);
        }
        state.enqueue(card);

        log::debug!(
            "{player} committed card {card} with {operands:?} ({} queued)",
            state.queue().len()
        );
        Ok(preview)
    }

    /// Mark `player` done; once everyone is, resolve the queue and advance.
    ///
    /// If a queued card fails, the turn is reopened instead of advancing:
    /// unresolved cards go back to their owners' hands, the queue is
    /// cleared and every done flag is reset. What happens to the effects of
    /// cards ahead of the failure depends on `EngineConfig::turn_resolution`.
    pub fn end_turn(&self, player: PlayerId) -> Result<GameState, GameError> {
        let mut state = self.write();
        check_player(&state, player)?;
        if state.is_done(player) {
            return Err(EffectError::TurnAlreadyEnded.into());
        }
        state.set_done(player);
        log::debug!("{player} ended turn {}", state.turn());

        if state.all_done() {
            let mut rng = self.rng();
            self.resolve_turn(&mut state, &mut *rng)?;
        }
        Ok(state.clone())
    }

    fn resolve_turn(&self, state: &mut GameState, dice: &mut dyn Dice) -> Result<(), GameError> {
        let queue = state.take_queue();
        log::debug!("resolving {} queued cards", queue.len());

        match self.config.turn_resolution {
            TurnResolution::Atomic => {
                let mut working = state.clone();
                match self.resolver.resolve_queue(&mut working, &queue, dice) {
                    Ok(()) => *state = working,
                    Err(failure) => return Err(reopen_turn(state, &queue, failure)),
                }
            }
            TurnResolution::InPlace => {
                if let Err(failure) = self.resolver.resolve_queue(state, &queue, dice) {
                    let unresolved = &queue[failure.position..];
                    return Err(reopen_turn(state, unresolved, failure));
                }
            }
        }

        turn::advance(state, self.config.hand_size, dice);
        Ok(())
    }

    /// Roll a die straight into the current player's first empty slot.
    ///
    /// Only allowed once per turn, and only while nothing is queued.
    pub fn roll_dice(&self, player: PlayerId) -> Result<GameState, GameError> {
        let mut state = self.write();
        check_player(&state, player)?;
        if !state.queue().is_empty() {
            return Err(EffectError::QueueNotEmpty.into());
        }
        if state.current_player() != Some(player) {
            return Err(EffectError::NotCurrentPlayer.into());
        }
        if state.dice_rolled() {
            return Err(EffectError::AlreadyRolled.into());
        }
        let index = state
            .first_null_slot(player)
            .ok_or(EffectError::NoEmptySlot { player })?;

        let roll = self.rng().roll_die();
        if let Some(slot) = state.slot_mut(player, index) {
            slot.set(BigDecimal::from(roll), Mark::None);
        }
        state.set_dice_rolled();

        log::debug!("{player} rolled {roll} into slot {index}");
        Ok(state.clone())
    }
}

fn invalid_player(reason: impl Into<String>) -> GameError {
    GameError::DuplicateOrInvalidPlayer(reason.into())
}

fn check_player(state: &GameState, player: PlayerId) -> Result<(), GameError> {
    if state.player(player).is_none() {
        return Err(GameError::UnknownPlayer(player));
    }
    Ok(())
}

/// Checks that do not depend on operand values.
fn check_stageable(
    state: &GameState,
    player: PlayerId,
    card: CardIndex,
    operands: &[i64],
) -> Result<(), GameError> {
    check_player(state, player)?;
    let staged = state.card(card).ok_or(GameError::UnknownCard(card))?;
    if !staged.is_owned_by(player) {
        return Err(EffectError::NotOwner.into());
    }
    if operands.len() != staged.shape.len() {
        return Err(ValidationError::ArityMismatch {
            expected: staged.shape.len(),
            got: operands.len(),
        }
        .into());
    }
    if state.is_queued(card) {
        return Err(EffectError::AlreadyQueued(card).into());
    }
    Ok(())
}

/// A failure of the staged card is reported as-is; a failure of an
/// earlier queued card is reported against that card.
fn preview_error(failure: QueueFailure, staged: CardIndex) -> GameError {
    if failure.card == staged {
        failure.error.into()
    } else {
        GameError::Resolution {
            card: failure.card,
            source: failure.error,
        }
    }
}

fn reopen_turn(state: &mut GameState, unresolved: &[CardIndex], failure: QueueFailure) -> GameError {
    for &index in unresolved {
        if let Some(card) = state.card_mut(index) {
            card.operands.clear();
        }
    }
    state.reset_done();

    log::warn!(
        "card {} failed at turn end ({}); {} cards returned to hand",
        failure.card,
        failure.error,
        unresolved.len()
    );
    GameError::Resolution {
        card: failure.card,
        source: failure.error,
    }
}
