//! # matetra-engine
//!
//! Authoritative engine for a turn-based multiplayer numeric card game.
//!
//! Every player owns a row of five arbitrary-precision number slots and a
//! hand of cards. Cards transform slots through arithmetic, identities and
//! constants. Moves are previewed on a private copy, committed to a queue,
//! and resolved together once every player has ended the turn.
//!
//! ## Design Principles
//!
//! 1. **One canonical state**: a single `GameState` behind a reader-writer
//!    lock. Callers only ever receive owned snapshots.
//!
//! 2. **Validate before mutating**: operands are checked against the card's
//!    input shape at preview and again at commit.
//!
//! 3. **Injected randomness**: dice come from a `Dice` implementation, so
//!    seeded games and scripted tests are reproducible.
//!
//! ## Modules
//!
//! - `core`: players, number slots, state, RNG, configuration
//! - `cards`: operations, input shapes, card instances, the standard deck
//! - `effects`: validator and effect resolver
//! - `engine`: the `Game` facade and end-of-turn cleanup
//! - `error`: error taxonomy

pub mod cards;
pub mod core;
pub mod effects;
pub mod engine;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    hash_credential, Dice, EngineConfig, GameRng, GameState, Mark, NumberSlot, Player, PlayerId,
    ScriptedDice, TurnResolution,
};

pub use crate::cards::{standard_deck, Card, CardIndex, CardOwner, DeckRow, InputShape, Operation};

pub use crate::effects::{validate, EffectResolver};

pub use crate::engine::Game;

pub use crate::error::{CatalogError, EffectError, GameError, ShapeError, ValidationError};
