//! End-of-turn cleanup.
//!
//! Once every player is done and the queue has resolved, the turn moves on:
//! hands are restocked, slot marks age, and the counter advances.

use crate::cards::{CardIndex, CardOwner};
use crate::core::number::next_fibonacci;
use crate::core::{Dice, GameState, Mark, PlayerId};

/// Expire immunity and grow Fibonacci slots.
pub fn age_marks(state: &mut GameState) {
    for (_, row) in state.rows_mut() {
        for slot in row.iter_mut() {
            match slot.mark {
                Mark::Immune => slot.mark = Mark::None,
                Mark::Fibonacci => {
                    if let Some(next) = next_fibonacci(&slot.value) {
                        slot.value = next;
                    }
                }
                Mark::None | Mark::Null => {}
            }
        }
    }
}

/// Deal `player` random cards from the draw pool until they hold `hand_size`.
///
/// When the pool runs dry mid-deal, discarded cards are recycled into it.
/// Stops early if there is nothing left to draw. Returns the number dealt.
pub fn restock_player(
    state: &mut GameState,
    player: PlayerId,
    hand_size: usize,
    dice: &mut dyn Dice,
) -> usize {
    let mut held = state.hand_count(player);
    let mut pool: Vec<CardIndex> = state.indices_where(CardOwner::InDeck);
    let mut dealt = 0;

    while held < hand_size {
        if pool.is_empty() {
            let recycled = state.recycle_discards();
            if recycled == 0 {
                log::warn!("draw pool exhausted while dealing to {player}");
                break;
            }
            log::debug!("recycled {recycled} discarded cards");
            pool = state.indices_where(CardOwner::InDeck);
        }

        let pick = pool.remove(dice.choose_index(pool.len()));
        if let Some(card) = state.card_mut(pick) {
            card.owner = CardOwner::Player(player);
        }
        held += 1;
        dealt += 1;
    }
    dealt
}

/// Restock every player in seat order.
pub fn restock(state: &mut GameState, hand_size: usize, dice: &mut dyn Dice) -> usize {
    let players: Vec<PlayerId> = state.player_ids().collect();
    players
        .into_iter()
        .map(|p| restock_player(state, p, hand_size, dice))
        .sum()
}

/// Finish a resolved turn: clear the queue, restock, age marks, advance.
pub fn advance(state: &mut GameState, hand_size: usize, dice: &mut dyn Dice) {
    state.take_queue();
    let dealt = restock(state, hand_size, dice);
    age_marks(state);
    state.advance_turn();
    log::info!("turn {} begins ({dealt} cards dealt)", state.turn());
}
