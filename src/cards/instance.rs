//! Card instances - one physical copy of a card.
//!
//! A card never changes identity once created: it lives at a stable index
//! in the game's card pool. Only `owner` and `operands` change over its
//! lifetime:
//!
//! ```text
//! InDeck --restock--> Owned(p) --resolved--> Discarded --deck empty--> InDeck
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardCategory, Operation};
use super::shape::InputShape;
use crate::core::PlayerId;

/// Stable index of a card in the game's card pool.
pub type CardIndex = usize;

/// Operand values supplied with a move.
///
/// SmallVec covers the longest built-in shape (6 operands) without heap allocation.
pub type Operands = SmallVec<[i64; 6]>;

/// Where a card currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardOwner {
    /// In the shared draw pool.
    InDeck,
    /// Resolved; waiting to be recycled.
    Discarded,
    /// In a player's hand (or queued by that player).
    Player(PlayerId),
}

impl CardOwner {
    /// The owning player, if the card is in a hand.
    #[must_use]
    pub fn player(self) -> Option<PlayerId> {
        match self {
            CardOwner::Player(p) => Some(p),
            _ => None,
        }
    }
}

/// A card in the game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Display name; duplicates share it.
    pub name: String,

    /// Rules text.
    pub description: String,

    pub category: CardCategory,

    /// Effect run when the card resolves.
    pub operation: Operation,

    /// Operand grammar.
    pub shape: InputShape,

    /// Current location.
    pub owner: CardOwner,

    /// Operands attached when the card is staged; empty otherwise.
    #[serde(default)]
    pub operands: Operands,
}

impl Card {
    /// Create a card in the draw pool.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        operation: Operation,
        shape: InputShape,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: operation.category(),
            operation,
            shape,
            owner: CardOwner::InDeck,
            operands: Operands::new(),
        }
    }

    /// Set the owner (builder pattern).
    #[must_use]
    pub fn owned_by(mut self, owner: PlayerId) -> Self {
        self.owner = CardOwner::Player(owner);
        self
    }

    /// Attach operands (builder pattern).
    #[must_use]
    pub fn with_operands(mut self, operands: &[i64]) -> Self {
        self.operands = Operands::from_slice(operands);
        self
    }

    /// Whether `player` holds this card.
    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == CardOwner::Player(player)
    }

    /// Mark the card as resolved and drop its operands.
    pub fn discard(&mut self) {
        self.owner = CardOwner::Discarded;
        self.operands.clear();
    }
}
