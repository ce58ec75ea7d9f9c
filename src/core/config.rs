//! Engine configuration.
//!
//! A game is configured once at creation. Everything has a default so a
//! transport can deserialize a partial config (`#[serde(default)]`).

use serde::{Deserialize, Serialize};

/// Cards each player holds after a restock.
pub const DEFAULT_HAND_SIZE: usize = 6;

/// What happens to canonical state when a queued card fails at turn end.
///
/// In both modes the turn is reopened: unresolved cards go back to their
/// owners' hands, the queue is cleared and every done flag is reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnResolution {
    /// Resolve on a copy and swap it in only if every card succeeds.
    #[default]
    Atomic,
    /// Resolve directly on canonical state; cards before the failure stick.
    InPlace,
}

/// Engine configuration.
///
/// ## Example
///
/// ```
/// use matetra_engine::core::{EngineConfig, TurnResolution};
///
/// let config = EngineConfig::new()
///     .with_seed(7)
///     .with_hand_size(4)
///     .with_turn_resolution(TurnResolution::InPlace);
///
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.hand_size, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hand size restocked to at the end of every turn.
    pub hand_size: usize,

    /// RNG seed. `None` seeds from system entropy.
    pub seed: Option<u64>,

    /// Failure policy for turn-end queue resolution.
    pub turn_resolution: TurnResolution,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hand_size: DEFAULT_HAND_SIZE,
            seed: None,
            turn_resolution: TurnResolution::default(),
        }
    }
}

impl EngineConfig {
    /// Create a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the RNG seed for reproducible games.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the restock hand size.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Set the turn-end failure policy.
    #[must_use]
    pub fn with_turn_resolution(mut self, mode: TurnResolution) -> Self {
        self.turn_resolution = mode;
        self
    }
}
