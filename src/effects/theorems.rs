//! Theorem cards: identities and structural moves on number rows.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::One;

use super::resolver::{EffectResolver, ResolverContext};
use crate::cards::Operation;
use crate::core::number::{prime_factors, to_exact_integer, SLOT_COUNT};
use crate::core::Mark;
use crate::error::EffectError;

type EffectResult = Result<(), EffectError>;

pub(super) fn register(resolver: &mut EffectResolver) {
    resolver.register(Operation::ElementIdentity, identity);
    resolver.register(Operation::ElementClosure, closure);
    resolver.register(Operation::ElementDistributive, distributive);
    resolver.register(Operation::ElementCommutative, commutative);
    resolver.register(Operation::PythagoreanTheorem, pythagorean);
    resolver.register(Operation::PascalTriangle, pascal);
    resolver.register(Operation::FundamentalTheoremOfArithmetic, factorize);
}

/// No effect beyond requiring the target to exist.
fn identity(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let target = ctx.slot_ref(0)?;
    ctx.read(target).map(|_| ())
}

/// Mark a slot immune until the end of the turn.
fn closure(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let target = ctx.slot_ref(0)?;
    ctx.read(target)?;
    ctx.slot_mut(target)?.mark = Mark::Immune;
    Ok(())
}

/// Give every other player a copy of the target value.
fn distributive(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let source = ctx.slot_ref(0)?;
    let value = ctx.read(source)?;

    let others: Vec<_> = ctx
        .state
        .player_ids()
        .filter(|p| *p != source.player)
        .collect();
    for player in others {
        ctx.add_constant(player, value.clone(), Mark::None)?;
    }
    Ok(())
}

/// Swap value and mark between two slots.
fn commutative(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let a_ref = ctx.slot_ref(0)?;
    let b_ref = ctx.slot_ref(2)?;
    ctx.read(a_ref)?;
    ctx.read(b_ref)?;

    let a = ctx.slot(a_ref)?.clone();
    let b = std::mem::replace(ctx.slot_mut(b_ref)?, a);
    *ctx.slot_mut(a_ref)? = b;
    Ok(())
}

/// a := sqrt(a^2 + b^2); b is consumed.
fn pythagorean(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let a_ref = ctx.slot_ref(0)?;
    let b_ref = ctx.slot_ref(2)?;
    let a = ctx.read(a_ref)?;
    let b = ctx.read(b_ref)?;

    let hypotenuse = (&a * &a + &b * &b)
        .sqrt()
        .ok_or(EffectError::NegativeRoot)?;
    ctx.write(a_ref, hypotenuse)?;
    ctx.consume(b_ref)
}

/// Bounds `(left, right)` of the run of non-empty slots containing `index`.
fn find_island(occupied: &[bool; SLOT_COUNT], index: usize) -> (usize, usize) {
    let mut left = index;
    while left > 0 && occupied[left - 1] {
        left -= 1;
    }
    let mut right = index;
    while right + 1 < SLOT_COUNT && occupied[right + 1] {
        right += 1;
    }
    (left, right)
}

/// Collapse the island around the target into its leftmost slot.
fn pascal(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let target = ctx.slot_ref(0)?;
    ctx.read(target)?;

    let row = ctx
        .state
        .row_mut(target.player)
        .ok_or(EffectError::EmptyRow {
            player: target.player,
        })?;
    let occupied: [bool; SLOT_COUNT] = std::array::from_fn(|i| !row[i].is_null());
    let (left, right) = find_island(&occupied, target.index);

    let mut sum = row[left].value.clone();
    for slot in &mut row[left + 1..=right] {
        sum += &slot.value;
        slot.clear();
    }
    row[left].value = crate::core::number::limit_precision(sum);
    Ok(())
}

/// Replace an integer greater than one with its prime factors.
///
/// Factors are placed like constants in the target's row. The source is
/// emptied afterwards unless a factor landed in it.
fn factorize(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let target = ctx.slot_ref(0)?;
    let value = ctx.read(target)?;

    let n = to_exact_integer(&value)
        .filter(|n| *n > BigInt::one())
        .ok_or(EffectError::NotFactorable)?;

    let mut source_reused = false;
    for factor in prime_factors(&n) {
        let index = ctx.add_constant(target.player, BigDecimal::new(factor, 0), Mark::None)?;
        source_reused |= index == target.index;
    }

    if !source_reused {
        ctx.consume(target)?;
    }
    Ok(())
}
