//! Core engine types: players, number slots, state, RNG, configuration.
//!
//! These are the building blocks the validator, resolver and `Game` facade
//! operate on. None of them lock or log.

pub mod config;
pub mod number;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{EngineConfig, TurnResolution, DEFAULT_HAND_SIZE};
pub use number::{Mark, NumberRow, NumberSlot, SLOT_COUNT};
pub use player::{hash_credential, Player, PlayerId, PlayerMap, MAX_PLAYERS};
pub use rng::{Dice, GameRng, ScriptedDice, DIE_SIDES};
pub use state::GameState;
