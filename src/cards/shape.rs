//! Input-shape grammar.
//!
//! A card declares its operands with a compact string, one symbol per
//! operand:
//!
//! | symbol | operand |
//! |---|---|
//! | `d` | die value, 1..=6 |
//! | `p` | any player index |
//! | `U` | the card owner's index |
//! | `A` | the current-turn (defending) player's index |
//! | `n` | slot index of the player named by the previous operand |
//! | `i` | free input bounded by the two previous operands |
//! | `c` | card reference, accepted as-is |
//!
//! The string is parsed once into `ShapeSlot`s when the card is created;
//! validation never looks at characters again.

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// One typed operand position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeSlot {
    /// `d`
    Die,
    /// `p`
    Player,
    /// `U`
    OwnPlayer,
    /// `A`
    Defender,
    /// `n`; `player` is the operand position naming the row.
    Slot { player: usize },
    /// `i`; bounds are read from operand positions `min` and `max`.
    Bounded { min: usize, max: usize },
    /// `c`
    CardRef,
}

impl ShapeSlot {
    /// Whether this symbol names a player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(
            self,
            ShapeSlot::Player | ShapeSlot::OwnPlayer | ShapeSlot::Defender
        )
    }

    /// Grammar symbol for this slot.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            ShapeSlot::Die => 'd',
            ShapeSlot::Player => 'p',
            ShapeSlot::OwnPlayer => 'U',
            ShapeSlot::Defender => 'A',
            ShapeSlot::Slot { .. } => 'n',
            ShapeSlot::Bounded { .. } => 'i',
            ShapeSlot::CardRef => 'c',
        }
    }
}

impl std::fmt::Display for ShapeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeSlot::Die => write!(f, "a die value (1..6)"),
            ShapeSlot::Player => write!(f, "a player index"),
            ShapeSlot::OwnPlayer => write!(f, "your own player index"),
            ShapeSlot::Defender => write!(f, "the defending player's index"),
            ShapeSlot::Slot { .. } => write!(f, "a number index (0..4)"),
            ShapeSlot::Bounded { min, max } => {
                write!(f, "within inputs {min}..{max}")
            }
            ShapeSlot::CardRef => write!(f, "a card reference"),
        }
    }
}

/// Parsed input shape.
///
/// Serializes back to its compact string form.
///
/// ```
/// use matetra_engine::cards::{InputShape, ShapeSlot};
///
/// let shape = InputShape::parse("AnUn").unwrap();
/// assert_eq!(shape.len(), 4);
/// assert_eq!(shape.slots()[1], ShapeSlot::Slot { player: 0 });
/// assert_eq!(shape.as_str(), "AnUn");
///
/// assert!(InputShape::parse("nA").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InputShape {
    source: String,
    slots: Vec<ShapeSlot>,
}

impl InputShape {
    /// Parse the compact grammar.
    pub fn parse(source: &str) -> Result<Self, ShapeError> {
        let mut slots: Vec<ShapeSlot> = Vec::with_capacity(source.len());

        for (position, symbol) in source.chars().enumerate() {
            let slot = match symbol {
                'd' => ShapeSlot::Die,
                'p' => ShapeSlot::Player,
                'U' => ShapeSlot::OwnPlayer,
                'A' => ShapeSlot::Defender,
                'c' => ShapeSlot::CardRef,
                'n' => match slots.last() {
                    Some(prev) if prev.is_player() => ShapeSlot::Slot {
                        player: position - 1,
                    },
                    _ => return Err(ShapeError::UnboundSlot { position }),
                },
                'i' => {
                    if position < 2 {
                        return Err(ShapeError::MissingBounds { position });
                    }
                    ShapeSlot::Bounded {
                        min: position - 2,
                        max: position - 1,
                    }
                }
                other => {
                    return Err(ShapeError::UnknownSymbol {
                        position,
                        symbol: other,
                    })
                }
            };
            slots.push(slot);
        }

        Ok(Self {
            source: source.to_string(),
            slots,
        })
    }

    /// Number of operands a card with this shape takes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn slots(&self) -> &[ShapeSlot] {
        &self.slots
    }

    /// The compact grammar string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl TryFrom<String> for InputShape {
    type Error = ShapeError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::parse(&source)
    }
}

impl From<InputShape> for String {
    fn from(shape: InputShape) -> Self {
        shape.source
    }
}

impl std::fmt::Display for InputShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
