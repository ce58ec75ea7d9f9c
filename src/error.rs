//! Error taxonomy.
//!
//! Every failure the engine can report is local and recoverable:
//!
//! - `ValidationError`: operands rejected before any mutation
//! - `EffectError`: a card could not be staged or resolved
//! - `GameError`: what the five public operations return
//! - `ShapeError` / `CatalogError`: malformed card data at load time

use thiserror::Error;

use crate::cards::{CardIndex, Operation, ShapeSlot};
use crate::core::PlayerId;

/// Operands do not fit a card's input shape.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Operand count differs from the shape length.
    #[error("expected {expected} inputs but got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// An operand is outside the range its shape symbol allows.
    #[error("input {position} must be {expected}, got {value}")]
    OutOfRangeOperand {
        position: usize,
        value: i64,
        expected: ShapeSlot,
    },

    /// A targeted slot is immune this turn.
    #[error("number {slot} of {player} is immune this turn")]
    ImmuneTarget { player: PlayerId, slot: usize },
}

/// A card could not be staged or its effect could not be applied.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("invalid inputs: {0}")]
    Validation(#[from] ValidationError),

    /// An input slot is empty.
    #[error("number {slot} of {player} is empty")]
    NullOperand { player: PlayerId, slot: usize },

    #[error("cannot divide by zero")]
    DivideByZero,

    #[error("cannot take a root of a negative number")]
    NegativeRoot,

    #[error("cannot take the logarithm of a non-positive number")]
    NonPositiveLog,

    /// Prime factorisation needs an exact integer greater than one.
    #[error("number must be an integer greater than 1")]
    NotFactorable,

    /// A floating point evaluation overflowed or was undefined.
    #[error("{operation} produced a non-finite result")]
    NotFinite { operation: &'static str },

    /// A row-wide fold found nothing to fold.
    #[error("{player} has no numbers to combine")]
    EmptyRow { player: PlayerId },

    #[error("{player} has no empty slot")]
    NoEmptySlot { player: PlayerId },

    #[error("you do not own this card")]
    NotOwner,

    #[error("you have already finished your turn")]
    TurnAlreadyEnded,

    #[error("it is not your turn")]
    NotCurrentPlayer,

    #[error("cannot roll dice after playing cards")]
    QueueNotEmpty,

    #[error("dice were already rolled this turn")]
    AlreadyRolled,

    #[error("card {0} is already queued")]
    AlreadyQueued(CardIndex),

    #[error("unknown card {0}")]
    UnknownCard(CardIndex),

    /// No handler is registered for the card's operation.
    #[error("no effect registered for {0}")]
    Unhandled(Operation),
}

/// Errors returned by the public engine operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Effect(EffectError),

    /// Registration rejected (empty or duplicate name, empty hash, full table).
    #[error("cannot register player: {0}")]
    DuplicateOrInvalidPlayer(String),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("unknown card {0}")]
    UnknownCard(CardIndex),

    /// A queued card failed while the queue was being resolved.
    #[error("card {card} failed to resolve: {source}")]
    Resolution {
        card: CardIndex,
        #[source]
        source: EffectError,
    },
}

impl From<EffectError> for GameError {
    fn from(err: EffectError) -> Self {
        match err {
            EffectError::Validation(inner) => GameError::Validation(inner),
            EffectError::UnknownCard(card) => GameError::UnknownCard(card),
            other => GameError::Effect(other),
        }
    }
}

/// Malformed input-shape grammar.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("unknown input symbol {symbol:?} at position {position}")]
    UnknownSymbol { position: usize, symbol: char },

    /// `n` must directly follow a player symbol (`p`, `U` or `A`).
    #[error("slot symbol at position {position} is not preceded by a player symbol")]
    UnboundSlot { position: usize },

    /// `i` reads the two preceding operands as its bounds.
    #[error("bounded input at position {position} needs two preceding operands")]
    MissingBounds { position: usize },
}

/// Card data that cannot be turned into a playable card.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("card {name:?}: {source}")]
    Shape {
        name: String,
        #[source]
        source: ShapeError,
    },

    #[error("unknown card method {0:?}")]
    UnknownOperation(String),

    #[error("unknown card category {0:?}")]
    UnknownCategory(String),

    #[error("card {0:?} is already in the catalog")]
    DuplicateEntry(String),
}
