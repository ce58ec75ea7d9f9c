//! Randomness for dice rolls and card draws.
//!
//! ## Key Features
//!
//! - **Injected**: effects and restocking take a `&mut dyn Dice`, never a
//!   process-wide generator
//! - **Deterministic**: `GameRng` with the same seed produces the same game
//! - **Forkable**: previews roll on a fork so they never consume canonical dice
//! - **Scriptable**: `ScriptedDice` replays fixed rolls in tests
//!
//! ```
//! use matetra_engine::core::{Dice, GameRng};
//!
//! let mut rng = GameRng::new(42);
//! let roll = rng.roll_die();
//! assert!((1..=6).contains(&roll));
//!
//! // A fork is independent of its parent but reproducible from the same seed.
//! let mut a = GameRng::new(7).fork();
//! let mut b = GameRng::new(7).fork();
//! assert_eq!(a.roll_die(), b.roll_die());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Faces on every die the game rolls.
pub const DIE_SIDES: u32 = 6;

/// Source of randomness threaded through effect resolution and restocking.
pub trait Dice {
    /// Roll a die with `sides` faces: uniform in `1..=sides`.
    fn roll(&mut self, sides: u32) -> u32;

    /// Pick an index uniformly from `0..len`. `len` is never zero.
    fn choose_index(&mut self, len: usize) -> usize;

    /// Roll a standard six-sided die.
    fn roll_die(&mut self) -> u32 {
        self.roll(DIE_SIDES)
    }
}

/// Deterministic RNG with forking for previews.
///
/// Uses ChaCha8 for speed while maintaining good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this generator was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self::new(fork_seed)
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }
}

impl Dice for GameRng {
    fn roll(&mut self, sides: u32) -> u32 {
        self.inner.gen_range(1..=sides.max(1))
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.gen_range_usize(0..len.max(1))
    }
}

/// Replays a fixed list of rolls, cycling when exhausted.
///
/// `choose_index` always picks the first candidate, so draws take the
/// lowest-indexed card available.
///
/// ```
/// use matetra_engine::core::{Dice, ScriptedDice};
///
/// let mut dice = ScriptedDice::new([3, 5]);
/// assert_eq!(dice.roll_die(), 3);
/// assert_eq!(dice.roll_die(), 5);
/// assert_eq!(dice.roll_die(), 3);
/// assert_eq!(dice.choose_index(10), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    rolls: Vec<u32>,
    next: usize,
}

impl ScriptedDice {
    /// Create a script. An empty script always rolls 1.
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            next: 0,
        }
    }

    /// How many rolls have been taken so far.
    #[must_use]
    pub fn rolls_taken(&self) -> usize {
        self.next
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, sides: u32) -> u32 {
        let value = if self.rolls.is_empty() {
            1
        } else {
            self.rolls[self.next % self.rolls.len()]
        };
        self.next += 1;
        value.clamp(1, sides.max(1))
    }

    fn choose_index(&mut self, _len: usize) -> usize {
        0
    }
}
