//! Shared fixtures for effect unit tests.

use bigdecimal::BigDecimal;
use std::str::FromStr;

use super::EffectResolver;
use crate::cards::{Card, CardIndex, InputShape, Operation};
use crate::core::{GameState, Mark, NumberSlot, Player, PlayerId, ScriptedDice};
use crate::error::EffectError;

pub(crate) const P0: PlayerId = PlayerId::new(0);
pub(crate) const P1: PlayerId = PlayerId::new(1);

/// A table of `players` with empty rows; player 0 is current.
pub(crate) fn table(players: usize) -> GameState {
    let mut state = GameState::new("effects");
    for i in 0..players {
        state.add_player(Player::new(format!("p{i}"), "hash"));
    }
    state
}

pub(crate) fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

/// Fill `player`'s row from the left; `None` leaves a slot empty.
pub(crate) fn fill(state: &mut GameState, player: PlayerId, values: &[Option<&str>]) {
    let row = state.row_mut(player).unwrap();
    for (slot, value) in row.iter_mut().zip(values) {
        *slot = match value {
            Some(v) => NumberSlot::new(dec(v)),
            None => NumberSlot::empty(),
        };
    }
}

pub(crate) fn set(state: &mut GameState, player: PlayerId, index: usize, value: &str) {
    *state.slot_mut(player, index).unwrap() = NumberSlot::new(dec(value));
}

pub(crate) fn set_marked(state: &mut GameState, player: PlayerId, index: usize, value: &str, mark: Mark) {
    *state.slot_mut(player, index).unwrap() = NumberSlot::with_mark(dec(value), mark);
}

pub(crate) fn value(state: &GameState, player: PlayerId, index: usize) -> BigDecimal {
    state.slot(player, index).unwrap().value.clone()
}

pub(crate) fn is_null(state: &GameState, player: PlayerId, index: usize) -> bool {
    state.slot(player, index).unwrap().is_null()
}

/// Hand `owner` a card and resolve it with scripted rolls.
pub(crate) fn play(
    state: &mut GameState,
    operation: Operation,
    shape: &str,
    owner: PlayerId,
    operands: &[i64],
    rolls: &[u32],
) -> Result<CardIndex, EffectError> {
    let card = Card::new(operation.id(), "", operation, InputShape::parse(shape).unwrap())
        .owned_by(owner)
        .with_operands(operands);
    let index = state.push_card(card);
    let mut dice = ScriptedDice::new(rolls.iter().copied());
    EffectResolver::standard().resolve(state, index, &mut dice)?;
    Ok(index)
}
