//! Constant cards: each places a number in the owner's row.
//!
//! Placement always goes through `GameState::add_constant` (first empty
//! slot, else the smallest value).

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Zero};

use super::resolver::{EffectResolver, ResolverContext};
use crate::cards::Operation;
use crate::core::number::literal;
use crate::core::Mark;
use crate::error::EffectError;

type EffectResult = Result<(), EffectError>;

/// 38 significant digits of each constant.
const PI_DIGITS: u128 = 31415926535897932384626433832795028842;
const E_DIGITS: u128 = 27182818284590452353602874713526624978;
const PHI_DIGITS: u128 = 16180339887498948482045868343656381177;
const TAU_DIGITS: u128 = 62831853071795864769252867665590057684;
const LITERAL_SCALE: i64 = 37;

pub(super) fn register(resolver: &mut EffectResolver) {
    resolver.register(Operation::Pi, pi);
    resolver.register(Operation::E, e);
    resolver.register(Operation::Phi, phi);
    resolver.register(Operation::Tau, tau);
    resolver.register(Operation::NegativeOne, negative_one);
    resolver.register(Operation::Zero, zero);
    resolver.register(Operation::FortyTwo, forty_two);
    resolver.register(Operation::TwentySix, twenty_six);
    resolver.register(Operation::Six, six);
    resolver.register(Operation::SixtyNine, sixty_nine);
    resolver.register(Operation::Graham, graham);
    resolver.register(Operation::Seventy3, seventy_three);
    resolver.register(Operation::Google, googol);
    resolver.register(Operation::Seven, seven);
    resolver.register(Operation::Fibonacci, fibonacci);
    resolver.register(Operation::TenPower, ten_power);
    resolver.register(Operation::Cupid, cupid);
    resolver.register(Operation::Factorial, factorial);
}

fn gain(ctx: &mut ResolverContext<'_>, value: BigDecimal) -> EffectResult {
    let owner = ctx.owner;
    ctx.add_constant(owner, value, Mark::None).map(|_| ())
}

fn gain_int(ctx: &mut ResolverContext<'_>, value: i64) -> EffectResult {
    gain(ctx, BigDecimal::from(value))
}

fn pi(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain(ctx, literal(PI_DIGITS, LITERAL_SCALE))
}

fn e(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain(ctx, literal(E_DIGITS, LITERAL_SCALE))
}

fn phi(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain(ctx, literal(PHI_DIGITS, LITERAL_SCALE))
}

fn tau(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain(ctx, literal(TAU_DIGITS, LITERAL_SCALE))
}

fn negative_one(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain_int(ctx, -1)
}

fn zero(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain(ctx, BigDecimal::zero())
}

fn forty_two(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain_int(ctx, 42)
}

fn twenty_six(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain_int(ctx, 26)
}

fn six(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain_int(ctx, 6)
}

fn sixty_nine(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain_int(ctx, 69)
}

fn graham(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain_int(ctx, 9)
}

/// 73 if the owner already holds a 73, otherwise 12.
fn seventy_three(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let target = BigDecimal::from(73);
    let holds_73 = ctx
        .state
        .row(ctx.owner)
        .is_some_and(|row| row.iter().any(|s| !s.is_null() && s.value == target));

    gain_int(ctx, if holds_73 { 73 } else { 12 })
}

/// Steal the target if it divides by ten, otherwise gain 10.
fn googol(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let target = ctx.slot_ref(0)?;
    let slot = ctx.slot(target)?;
    let ten = BigDecimal::from(10);

    if !slot.is_null() && (&slot.value / &ten).is_integer() {
        let stolen = slot.value.clone();
        ctx.consume(target)?;
        return gain(ctx, stolen);
    }
    gain(ctx, ten)
}

/// 7, plus another 7 if two dice sum to seven.
fn seven(ctx: &mut ResolverContext<'_>) -> EffectResult {
    gain_int(ctx, 7)?;
    let (a, b) = (ctx.roll(), ctx.roll());
    if a + b == 7 {
        gain_int(ctx, 7)?;
    }
    Ok(())
}

fn fibonacci(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let owner = ctx.owner;
    ctx.add_constant(owner, BigDecimal::one(), Mark::Fibonacci)
        .map(|_| ())
}

fn ten_power(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let exponent = ctx.roll();
    gain(ctx, BigDecimal::new(BigInt::one(), -i64::from(exponent)))
}

/// 29 if both dice are at most 3, otherwise 14.
fn cupid(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let (a, b) = (ctx.roll(), ctx.roll());
    gain_int(ctx, if a <= 3 && b <= 3 { 29 } else { 14 })
}

fn factorial(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let n = ctx.roll();
    let value = (2..=n).fold(BigInt::one(), |acc, k| acc * BigInt::from(k));
    gain(ctx, BigDecimal::new(value, 0))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::cards::Operation;
    use crate::core::Mark;

    #[test]
    fn test_literal_constants() {
        let cases = [
            (Operation::NegativeOne, "-1"),
            (Operation::Zero, "0"),
            (Operation::FortyTwo, "42"),
            (Operation::TwentySix, "26"),
            (Operation::Six, "6"),
            (Operation::SixtyNine, "69"),
            (Operation::Graham, "9"),
        ];
        for (op, expected) in cases {
            let mut state = table(1);
            play(&mut state, op, "", P0, &[], &[]).unwrap();

            assert_eq!(value(&state, P0, 0), dec(expected), "{op}");
            assert!(!is_null(&state, P0, 0));
        }
    }

    #[test]
    fn test_transcendental_literals() {
        let mut state = table(1);
        play(&mut state, Operation::Pi, "", P0, &[], &[]).unwrap();
        play(&mut state, Operation::E, "", P0, &[], &[]).unwrap();
        play(&mut state, Operation::Phi, "", P0, &[], &[]).unwrap();
        play(&mut state, Operation::Tau, "", P0, &[], &[]).unwrap();

        assert_eq!(value(&state, P0, 0), dec("3.1415926535897932384626433832795028842"));
        assert_eq!(value(&state, P0, 1), dec("2.7182818284590452353602874713526624978"));
        assert_eq!(value(&state, P0, 2), dec("1.6180339887498948482045868343656381177"));
        assert_eq!(value(&state, P0, 3), dec("6.2831853071795864769252867665590057684"));
    }

    #[test]
    fn test_constant_replaces_minimum_when_full() {
        let mut state = table(1);
        fill(&mut state, P0, &[Some("5"), Some("-2"), Some("8"), Some("-2"), Some("1")]);

        play(&mut state, Operation::FortyTwo, "", P0, &[], &[]).unwrap();

        assert_eq!(value(&state, P0, 1), dec("42"));
        assert_eq!(value(&state, P0, 3), dec("-2"));
    }

    #[test]
    fn test_seventy_three() {
        let mut state = table(1);
        play(&mut state, Operation::Seventy3, "", P0, &[], &[]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("12"));

        set(&mut state, P0, 0, "73");
        play(&mut state, Operation::Seventy3, "", P0, &[], &[]).unwrap();
        assert_eq!(value(&state, P0, 1), dec("73"));
    }

    #[test]
    fn test_googol_steals_multiples_of_ten() {
        let mut state = table(2);
        set(&mut state, P0, 2, "120");

        play(&mut state, Operation::Google, "An", P1, &[0, 2], &[]).unwrap();

        assert!(is_null(&state, P0, 2));
        assert_eq!(value(&state, P1, 0), dec("120"));
    }

    #[test]
    fn test_googol_falls_back_to_ten() {
        let mut state = table(2);
        set(&mut state, P0, 2, "12.5");

        play(&mut state, Operation::Google, "An", P1, &[0, 2], &[]).unwrap();

        assert_eq!(value(&state, P0, 2), dec("12.5"));
        assert_eq!(value(&state, P1, 0), dec("10"));

        // Empty slots are never stolen.
        play(&mut state, Operation::Google, "An", P1, &[0, 4], &[]).unwrap();
        assert_eq!(value(&state, P1, 1), dec("10"));
    }

    #[test]
    fn test_googol_on_own_row_reuses_slot() {
        let mut state = table(1);
        fill(&mut state, P0, &[Some("1"), Some("30"), Some("2"), Some("3"), Some("4")]);

        play(&mut state, Operation::Google, "An", P0, &[0, 1], &[]).unwrap();

        assert_eq!(value(&state, P0, 1), dec("30"));
        assert!(!is_null(&state, P0, 1));
    }

    #[test]
    fn test_seven() {
        let mut state = table(1);
        play(&mut state, Operation::Seven, "", P0, &[], &[3, 4]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("7"));
        assert_eq!(value(&state, P0, 1), dec("7"));

        let mut state = table(1);
        play(&mut state, Operation::Seven, "", P0, &[], &[3, 3]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("7"));
        assert!(is_null(&state, P0, 1));
    }

    #[test]
    fn test_cupid() {
        let mut state = table(1);
        play(&mut state, Operation::Cupid, "", P0, &[], &[3, 1]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("29"));

        play(&mut state, Operation::Cupid, "", P0, &[], &[2, 4]).unwrap();
        assert_eq!(value(&state, P0, 1), dec("14"));
    }

    #[test]
    fn test_fibonacci_is_marked() {
        let mut state = table(1);
        play(&mut state, Operation::Fibonacci, "", P0, &[], &[]).unwrap();

        let slot = state.slot(P0, 0).unwrap();
        assert_eq!(slot.value, dec("1"));
        assert_eq!(slot.mark, Mark::Fibonacci);
    }

    #[test]
    fn test_dice_constants() {
        let mut state = table(1);
        play(&mut state, Operation::TenPower, "", P0, &[], &[4]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("10000"));

        play(&mut state, Operation::Factorial, "", P0, &[], &[5]).unwrap();
        assert_eq!(value(&state, P0, 1), dec("120"));

        play(&mut state, Operation::Factorial, "", P0, &[], &[1]).unwrap();
        assert_eq!(value(&state, P0, 2), dec("1"));
    }
}
