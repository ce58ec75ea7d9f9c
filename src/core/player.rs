//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Type-safe player identifier supporting up to 255 players, assigned in
//! registration order.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by a `Vec` for O(1) access. Unlike a fixed
//! table it grows as players register; entries are never removed.
//!
//! ## Player
//!
//! Registration record: display name plus a credential hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Most players a single game can seat.
pub const MAX_PLAYERS: usize = u8::MAX as usize;

/// Player identifier.
///
/// Player indices are 0-based: the first registered player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Interpret a card operand as a player index.
    ///
    /// Returns `None` if the operand does not name one of `player_count` players.
    ///
    /// ```
    /// use matetra_engine::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::from_operand(1, 3), Some(PlayerId::new(1)));
    /// assert_eq!(PlayerId::from_operand(3, 3), None);
    /// assert_eq!(PlayerId::from_operand(-1, 3), None);
    /// ```
    #[must_use]
    pub fn from_operand(value: i64, player_count: usize) -> Option<Self> {
        if value < 0 || value >= player_count as i64 {
            return None;
        }
        u8::try_from(value).ok().map(PlayerId)
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(MAX_PLAYERS) as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A registered player.
///
/// Only used for identity: the engine never sees the raw credential.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Display name, unique within a game.
    pub name: String,

    /// Hex digest of the player's credential.
    pub credential_hash: String,
}

impl Player {
    /// Create a player record.
    #[must_use]
    pub fn new(name: impl Into<String>, credential_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credential_hash: credential_hash.into(),
        }
    }
}

/// Hash a raw credential into the lower-hex SHA-256 form stored on `Player`.
///
/// Transports call this before registering so the engine only ever stores
/// digests.
#[must_use]
pub fn hash_credential(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Per-player data storage with O(1) access.
///
/// Backed by a `Vec<T>` with one entry per player, indexed by `PlayerId`.
///
/// ## Example
///
/// ```
/// use matetra_engine::core::{PlayerId, PlayerMap};
///
/// let mut done: PlayerMap<bool> = PlayerMap::default();
/// done.push(false);
/// let second = done.push(true);
///
/// assert_eq!(second, PlayerId::new(1));
/// assert_eq!(done.get(PlayerId::new(0)), Some(&false));
/// assert_eq!(done.get(second), Some(&true));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> Default for PlayerMap<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T> PlayerMap<T> {
    /// Append an entry for the next player and return its ID.
    ///
    /// Callers must check against `MAX_PLAYERS` first.
    pub fn push(&mut self, value: T) -> PlayerId {
        let id = PlayerId(self.data.len() as u8);
        self.data.push(value);
        id
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Check whether no player has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a reference to a player's data, if the player exists.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Get a mutable reference to a player's data, if the player exists.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over the stored values in player order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.data.len())
    }
}
