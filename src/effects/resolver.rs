//! Effect resolution - executing cards on game state.
//!
//! The `EffectResolver` is a dispatch table from `Operation` to a plain
//! function. Each handler receives a `ResolverContext` holding the state,
//! the card's owner and operands, and the injected dice.
//!
//! Resolving a card always re-validates it against the state it is about
//! to mutate, then runs the handler, then discards the card.

use bigdecimal::BigDecimal;
use rustc_hash::FxHashMap;

use super::validator::validate;
use super::{constants, functions, theorems};
use crate::cards::{CardIndex, Operands, Operation, ShapeSlot};
use crate::core::number::limit_precision;
use crate::core::{Dice, GameState, Mark, NumberSlot, PlayerId};
use crate::error::{EffectError, ValidationError};

/// Signature of every effect handler.
pub type EffectHandler = fn(&mut ResolverContext<'_>) -> Result<(), EffectError>;

/// A `(player, slot)` pair named by two consecutive operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRef {
    pub player: PlayerId,
    pub index: usize,
}

/// Everything a handler may touch while resolving one card.
pub struct ResolverContext<'a> {
    pub state: &'a mut GameState,
    /// Player holding the card.
    pub owner: PlayerId,
    /// The card's validated operands.
    pub operands: Operands,
    pub dice: &'a mut dyn Dice,
}

impl<'a> ResolverContext<'a> {
    /// Operand at `position`, as a player.
    pub fn player(&self, position: usize) -> Result<PlayerId, EffectError> {
        let value = self.operand(position)?;
        PlayerId::from_operand(value, self.state.player_count())
            .ok_or_else(|| out_of_range(position, value, ShapeSlot::Player))
    }

    /// The slot named by the operands at `position` (player) and `position + 1` (index).
    pub fn slot_ref(&self, position: usize) -> Result<SlotRef, EffectError> {
        let player = self.player(position)?;
        let value = self.operand(position + 1)?;
        let expected = ShapeSlot::Slot { player: position };
        let index = usize::try_from(value).map_err(|_| out_of_range(position + 1, value, expected))?;
        if self.state.slot(player, index).is_none() {
            return Err(out_of_range(position + 1, value, expected));
        }
        Ok(SlotRef { player, index })
    }

    /// Read a slot used as an input; empty slots are rejected.
    pub fn read(&self, at: SlotRef) -> Result<BigDecimal, EffectError> {
        let slot = self.slot(at)?;
        if slot.is_null() {
            return Err(EffectError::NullOperand {
                player: at.player,
                slot: at.index,
            });
        }
        Ok(slot.value.clone())
    }

    pub fn slot(&self, at: SlotRef) -> Result<&NumberSlot, EffectError> {
        self.state
            .slot(at.player, at.index)
            .ok_or(EffectError::NullOperand {
                player: at.player,
                slot: at.index,
            })
    }

    pub fn slot_mut(&mut self, at: SlotRef) -> Result<&mut NumberSlot, EffectError> {
        self.state
            .slot_mut(at.player, at.index)
            .ok_or(EffectError::NullOperand {
                player: at.player,
                slot: at.index,
            })
    }

    /// Store a result, keeping the slot's mark.
    pub fn write(&mut self, at: SlotRef, value: BigDecimal) -> Result<(), EffectError> {
        self.slot_mut(at)?.value = limit_precision(value);
        Ok(())
    }

    /// Zero a slot and mark it empty.
    pub fn consume(&mut self, at: SlotRef) -> Result<(), EffectError> {
        self.slot_mut(at)?.clear();
        Ok(())
    }

    /// Place a constant in `player`'s row; see `GameState::add_constant`.
    pub fn add_constant(
        &mut self,
        player: PlayerId,
        value: BigDecimal,
        mark: Mark,
    ) -> Result<usize, EffectError> {
        self.state
            .add_constant(player, value, mark)
            .ok_or(EffectError::NoEmptySlot { player })
    }

    /// Roll a six-sided die.
    pub fn roll(&mut self) -> u32 {
        self.dice.roll_die()
    }

    fn operand(&self, position: usize) -> Result<i64, EffectError> {
        self.operands.get(position).copied().ok_or_else(|| {
            ValidationError::ArityMismatch {
                expected: position + 1,
                got: self.operands.len(),
            }
            .into()
        })
    }
}

fn out_of_range(position: usize, value: i64, expected: ShapeSlot) -> EffectError {
    ValidationError::OutOfRangeOperand {
        position,
        value,
        expected,
    }
    .into()
}

/// A queued card that failed during `resolve_queue`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueFailure {
    /// Position of the failing card in the queue.
    pub position: usize,
    pub card: CardIndex,
    pub error: EffectError,
}

/// Dispatch table from operation to handler.
///
/// ## Example
///
/// ```
/// use matetra_engine::cards::Operation;
/// use matetra_engine::effects::EffectResolver;
///
/// let resolver = EffectResolver::standard();
/// assert!(Operation::ALL.iter().all(|op| resolver.handles(*op)));
/// ```
#[derive(Clone, Default)]
pub struct EffectResolver {
    handlers: FxHashMap<Operation, EffectHandler>,
}

impl std::fmt::Debug for EffectResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectResolver")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl EffectResolver {
    /// Create a resolver with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with every built-in operation registered.
    #[must_use]
    pub fn standard() -> Self {
        let mut resolver = Self::new();
        functions::register(&mut resolver);
        theorems::register(&mut resolver);
        constants::register(&mut resolver);
        resolver
    }

    /// Register a handler, returning the one it replaced.
    pub fn register(&mut self, operation: Operation, handler: EffectHandler) -> Option<EffectHandler> {
        self.handlers.insert(operation, handler)
    }

    /// Whether a handler is registered for `operation`.
    #[must_use]
    pub fn handles(&self, operation: Operation) -> bool {
        self.handlers.contains_key(&operation)
    }

    /// Resolve one card: validate, run its effect, then discard it.
    ///
    /// On error the card stays where it was. Handlers check their inputs
    /// before writing, so a failing card leaves the state untouched.
    pub fn resolve(
        &self,
        state: &mut GameState,
        index: CardIndex,
        dice: &mut dyn Dice,
    ) -> Result<(), EffectError> {
        let card = state.card(index).ok_or(EffectError::UnknownCard(index))?;
        validate(state, card)?;

        let owner = card.owner.player().ok_or(EffectError::NotOwner)?;
        let operation = card.operation;
        let operands = card.operands.clone();
        let handler = *self
            .handlers
            .get(&operation)
            .ok_or(EffectError::Unhandled(operation))?;

        log::trace!("resolving card {index} ({operation}) for {owner} with {operands:?}");

        let mut ctx = ResolverContext {
            state: &mut *state,
            owner,
            operands,
            dice,
        };
        handler(&mut ctx)?;

        if let Some(card) = state.card_mut(index) {
            card.discard();
        }
        Ok(())
    }

    /// Resolve cards in FIFO order, stopping at the first failure.
    ///
    /// Cards before the failing one stay resolved.
    pub fn resolve_queue(
        &self,
        state: &mut GameState,
        queue: &[CardIndex],
        dice: &mut dyn Dice,
    ) -> Result<(), QueueFailure> {
        for (position, &card) in queue.iter().enumerate() {
            self.resolve(state, card, dice)
                .map_err(|error| QueueFailure {
                    position,
                    card,
                    error,
                })?;
        }
        Ok(())
    }
}
