//! Input validation.
//!
//! Checks a card's operands against its parsed `InputShape` and the current
//! state. Validation is pure: it never mutates, so the engine runs it both
//! when a move is previewed and again against canonical state at commit.

use crate::cards::{Card, CardOwner, InputShape, ShapeSlot};
use crate::core::number::SLOT_COUNT;
use crate::core::rng::DIE_SIDES;
use crate::core::{GameState, NumberSlot, PlayerId};
use crate::error::ValidationError;

/// Validate a card's staged operands.
pub fn validate(state: &GameState, card: &Card) -> Result<(), ValidationError> {
    validate_operands(state, &card.shape, card.owner, &card.operands)
}

/// Validate `operands` for a card with `shape` held by `owner`.
///
/// Positional checks run first; the immunity check only runs once every
/// operand is known to be in range.
pub fn validate_operands(
    state: &GameState,
    shape: &InputShape,
    owner: CardOwner,
    operands: &[i64],
) -> Result<(), ValidationError> {
    if operands.len() != shape.len() {
        return Err(ValidationError::ArityMismatch {
            expected: shape.len(),
            got: operands.len(),
        });
    }

    let player_count = state.player_count();
    let defender = state.current_player();

    for (position, (&slot, &value)) in shape.slots().iter().zip(operands).enumerate() {
        let ok = match slot {
            ShapeSlot::Die => (1..=i64::from(DIE_SIDES)).contains(&value),
            ShapeSlot::Player => PlayerId::from_operand(value, player_count).is_some(),
            ShapeSlot::OwnPlayer => {
                let named = PlayerId::from_operand(value, player_count);
                named.is_some() && named == owner.player()
            }
            ShapeSlot::Defender => {
                let named = PlayerId::from_operand(value, player_count);
                named.is_some() && named == defender
            }
            ShapeSlot::Slot { .. } => (0..SLOT_COUNT as i64).contains(&value),
            ShapeSlot::Bounded { min, max } => operands[min] <= value && value <= operands[max],
            ShapeSlot::CardRef => true,
        };

        if !ok {
            return Err(ValidationError::OutOfRangeOperand {
                position,
                value,
                expected: slot,
            });
        }
    }

    for (position, slot) in shape.slots().iter().enumerate() {
        if let ShapeSlot::Slot { player } = *slot {
            let Some(target) = PlayerId::from_operand(operands[player], player_count) else {
                continue;
            };
            let index = operands[position] as usize;
            if state.slot(target, index).is_some_and(NumberSlot::is_immune) {
                return Err(ValidationError::ImmuneTarget {
                    player: target,
                    slot: index,
                });
            }
        }
    }

    Ok(())
}
