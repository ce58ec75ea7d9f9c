//! Function cards: arithmetic, unary transforms, dice-modulated
//! transforms, logarithms, polynomials and row folds.
//!
//! Operand conventions (shapes from the standard catalog):
//! - `AnUn`: positions 0-1 are the destination, 2-3 the consumed operand
//! - `An`: positions 0-1 are the slot transformed in place
//! - `A`: position 0 is the player whose row is folded

use bigdecimal::BigDecimal;
use num_traits::{One, Zero};

use super::resolver::{EffectResolver, ResolverContext, SlotRef};
use crate::cards::Operation;
use crate::core::number::{from_f64, limit_precision, to_f64};
use crate::error::EffectError;

type EffectResult = Result<(), EffectError>;

pub(super) fn register(resolver: &mut EffectResolver) {
    resolver.register(Operation::Add, add);
    resolver.register(Operation::Subtract, subtract);
    resolver.register(Operation::Multiply, multiply);
    resolver.register(Operation::Divide, divide);
    resolver.register(Operation::AbsoluteValue, absolute_value);
    resolver.register(Operation::Inverse, inverse);
    resolver.register(Operation::Negate, negate);
    resolver.register(Operation::Positive, positive);
    resolver.register(Operation::Sqrt, sqrt);
    resolver.register(Operation::Square, square);
    resolver.register(Operation::CosMod, cos_mod);
    resolver.register(Operation::SinMod, sin_mod);
    resolver.register(Operation::TanMod, tan_mod);
    resolver.register(Operation::Log10, log10);
    resolver.register(Operation::Exponential, exponential);
    resolver.register(Operation::NaturalLog, natural_log);
    resolver.register(Operation::LogorhythmWithDiceBase, log_dice_base);
    resolver.register(Operation::RootBase, root_base);
    resolver.register(Operation::ExponentBase, exponent_base);
    resolver.register(Operation::SigmaNotation, sigma);
    resolver.register(Operation::ProductNotation, product);
    resolver.register(Operation::Polynomial1, polynomial1);
    resolver.register(Operation::Polynomial2, polynomial2);
}

/// Evaluate `f` through `f64`; NaN and infinities are errors.
fn via_f64(value: &BigDecimal, operation: &'static str, f: impl FnOnce(f64) -> f64) -> Result<BigDecimal, EffectError> {
    let x = to_f64(value).ok_or(EffectError::NotFinite { operation })?;
    from_f64(f(x)).ok_or(EffectError::NotFinite { operation })
}

// === Binary ===

/// destination := op(destination, operand); the operand slot is consumed.
fn binary(
    ctx: &mut ResolverContext<'_>,
    op: impl FnOnce(BigDecimal, BigDecimal) -> Result<BigDecimal, EffectError>,
) -> EffectResult {
    let dest = ctx.slot_ref(0)?;
    let src = ctx.slot_ref(2)?;
    let a = ctx.read(dest)?;
    let b = ctx.read(src)?;

    let result = op(a, b)?;
    ctx.write(dest, result)?;
    ctx.consume(src)
}

fn add(ctx: &mut ResolverContext<'_>) -> EffectResult {
    binary(ctx, |a, b| Ok(a + b))
}

fn subtract(ctx: &mut ResolverContext<'_>) -> EffectResult {
    binary(ctx, |a, b| Ok(a - b))
}

fn multiply(ctx: &mut ResolverContext<'_>) -> EffectResult {
    binary(ctx, |a, b| Ok(a * b))
}

fn divide(ctx: &mut ResolverContext<'_>) -> EffectResult {
    binary(ctx, |a, b| {
        if b.is_zero() {
            return Err(EffectError::DivideByZero);
        }
        Ok(a / b)
    })
}

// === Unary ===

/// value := op(value), in place.
fn unary(
    ctx: &mut ResolverContext<'_>,
    op: impl FnOnce(BigDecimal) -> Result<BigDecimal, EffectError>,
) -> EffectResult {
    let target = ctx.slot_ref(0)?;
    let value = ctx.read(target)?;
    let result = op(value)?;
    ctx.write(target, result)
}

fn absolute_value(ctx: &mut ResolverContext<'_>) -> EffectResult {
    unary(ctx, |v| Ok(v.abs()))
}

fn inverse(ctx: &mut ResolverContext<'_>) -> EffectResult {
    unary(ctx, |v| {
        if v.is_zero() {
            return Err(EffectError::DivideByZero);
        }
        Ok(v.inverse())
    })
}

fn negate(ctx: &mut ResolverContext<'_>) -> EffectResult {
    unary(ctx, |v| Ok(-v))
}

fn positive(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let target = ctx.slot_ref(0)?;
    ctx.read(target).map(|_| ())
}

fn sqrt(ctx: &mut ResolverContext<'_>) -> EffectResult {
    unary(ctx, |v| v.sqrt().ok_or(EffectError::NegativeRoot))
}

fn square(ctx: &mut ResolverContext<'_>) -> EffectResult {
    unary(ctx, |v| Ok(&v * &v))
}

// === Dice-modulated ===

/// Roll a die and multiply the target by `f(roll)`.
fn trig_mod(ctx: &mut ResolverContext<'_>, operation: &'static str, f: fn(f64) -> f64) -> EffectResult {
    let target = ctx.slot_ref(0)?;
    let value = ctx.read(target)?;
    let roll = f64::from(ctx.roll());
    let factor = from_f64(f(roll)).ok_or(EffectError::NotFinite { operation })?;
    ctx.write(target, value * factor)
}

fn cos_mod(ctx: &mut ResolverContext<'_>) -> EffectResult {
    trig_mod(ctx, "cos", f64::cos)
}

fn sin_mod(ctx: &mut ResolverContext<'_>) -> EffectResult {
    trig_mod(ctx, "sin", f64::sin)
}

fn tan_mod(ctx: &mut ResolverContext<'_>) -> EffectResult {
    trig_mod(ctx, "tan", f64::tan)
}

fn root_base(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let target = ctx.slot_ref(0)?;
    let value = ctx.read(target)?;
    if value < BigDecimal::zero() {
        return Err(EffectError::NegativeRoot);
    }

    let degree = ctx.roll();
    let result = match degree {
        1 => value,
        2 => value.sqrt().ok_or(EffectError::NegativeRoot)?,
        d => via_f64(&value, "root", |x| x.powf(1.0 / f64::from(d)))?,
    };
    ctx.write(target, result)
}

/// Exact integer power by repeated multiplication.
fn exponent_base(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let target = ctx.slot_ref(0)?;
    let value = ctx.read(target)?;
    let power = ctx.roll();

    let result = (1..power).fold(value.clone(), |acc, _| limit_precision(acc * &value));
    ctx.write(target, result)
}

// === Logarithms ===

fn positive_input(ctx: &ResolverContext<'_>) -> Result<(SlotRef, BigDecimal), EffectError> {
    let target = ctx.slot_ref(0)?;
    let value = ctx.read(target)?;
    if value <= BigDecimal::zero() {
        return Err(EffectError::NonPositiveLog);
    }
    Ok((target, value))
}

fn log10(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let (target, value) = positive_input(ctx)?;
    let result = via_f64(&value, "log10", f64::log10)?;
    ctx.write(target, result)
}

fn natural_log(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let (target, value) = positive_input(ctx)?;
    let result = via_f64(&value, "ln", f64::ln)?;
    ctx.write(target, result)
}

fn log_dice_base(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let (target, value) = positive_input(ctx)?;
    let base = f64::from(ctx.roll());
    let result = via_f64(&value, "logarithm", |x| x.ln() / base.ln())?;
    ctx.write(target, result)
}

fn exponential(ctx: &mut ResolverContext<'_>) -> EffectResult {
    unary(ctx, |v| via_f64(&v, "exp", f64::exp))
}

// === Polynomials ===

/// a := a*x + b for a rolled x; b is consumed.
fn polynomial1(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let a_ref = ctx.slot_ref(0)?;
    let b_ref = ctx.slot_ref(2)?;
    let a = ctx.read(a_ref)?;
    let b = ctx.read(b_ref)?;
    let x = BigDecimal::from(ctx.roll());

    ctx.write(a_ref, a * x + b)?;
    ctx.consume(b_ref)
}

/// a := a*x^2 + b*x + c for a rolled x; b and c are consumed.
fn polynomial2(ctx: &mut ResolverContext<'_>) -> EffectResult {
    let a_ref = ctx.slot_ref(0)?;
    let b_ref = ctx.slot_ref(2)?;
    let c_ref = ctx.slot_ref(4)?;
    let a = ctx.read(a_ref)?;
    let b = ctx.read(b_ref)?;
    let c = ctx.read(c_ref)?;
    let x = BigDecimal::from(ctx.roll());

    let result = a * &x * &x + b * &x + c;
    ctx.write(a_ref, result)?;
    ctx.consume(b_ref)?;
    ctx.consume(c_ref)
}

// === Row folds ===

/// Fold every non-empty slot of one row into the first non-empty slot.
fn fold_row(
    ctx: &mut ResolverContext<'_>,
    identity: BigDecimal,
    combine: fn(BigDecimal, &BigDecimal) -> BigDecimal,
) -> EffectResult {
    let player = ctx.player(0)?;
    let row = ctx
        .state
        .row_mut(player)
        .ok_or(EffectError::EmptyRow { player })?;

    let dest = row
        .iter()
        .position(|s| !s.is_null())
        .ok_or(EffectError::EmptyRow { player })?;

    let mut acc = identity;
    for (i, slot) in row.iter_mut().enumerate() {
        if slot.is_null() {
            continue;
        }
        acc = combine(acc, &slot.value);
        if i != dest {
            slot.clear();
        }
    }
    row[dest].value = limit_precision(acc);
    Ok(())
}

fn sigma(ctx: &mut ResolverContext<'_>) -> EffectResult {
    fold_row(ctx, BigDecimal::zero(), |acc, v| acc + v)
}

fn product(ctx: &mut ResolverContext<'_>) -> EffectResult {
    fold_row(ctx, BigDecimal::one(), |acc, v| acc * v)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::cards::Operation;
    use crate::core::Mark;
    use crate::error::{EffectError, ValidationError};

    #[test]
    fn test_divide_consumes_operand() {
        let mut state = table(2);
        set(&mut state, P0, 4, "8");
        set(&mut state, P1, 0, "2");

        play(&mut state, Operation::Divide, "AnUn", P1, &[0, 4, 1, 0], &[]).unwrap();

        assert_eq!(value(&state, P0, 4), dec("4"));
        assert!(is_null(&state, P1, 0));
        assert_eq!(value(&state, P1, 0), dec("0"));
    }

    #[test]
    fn test_divide_by_zero_leaves_state() {
        let mut state = table(2);
        set(&mut state, P0, 0, "8");
        set(&mut state, P1, 0, "0");
        let before = state.clone();

        let err = play(&mut state, Operation::Divide, "AnUn", P1, &[0, 0, 1, 0], &[]).unwrap_err();

        assert_eq!(err, EffectError::DivideByZero);
        assert_eq!(state.row(P0), before.row(P0));
        assert_eq!(state.row(P1), before.row(P1));
    }

    #[test]
    fn test_binary_arithmetic() {
        for (op, expected) in [
            (Operation::Add, "13"),
            (Operation::Subtract, "7"),
            (Operation::Multiply, "30"),
        ] {
            let mut state = table(2);
            set(&mut state, P0, 0, "10");
            set(&mut state, P1, 2, "3");

            play(&mut state, op, "AnUn", P1, &[0, 0, 1, 2], &[]).unwrap();

            assert_eq!(value(&state, P0, 0), dec(expected), "{op}");
            assert!(is_null(&state, P1, 2));
        }
    }

    #[test]
    fn test_divide_keeps_precision() {
        let mut state = table(2);
        set(&mut state, P0, 0, "1");
        set(&mut state, P1, 0, "3");

        play(&mut state, Operation::Divide, "AnUn", P1, &[0, 0, 1, 0], &[]).unwrap();

        let third = value(&state, P0, 0);
        assert!(third.digits() >= 30);
        assert!(third.to_string().starts_with("0.3333333333"));
    }

    #[test]
    fn test_null_guard_on_destination_and_operand() {
        let mut state = table(2);
        set(&mut state, P1, 0, "3");

        let err = play(&mut state, Operation::Add, "AnUn", P1, &[0, 0, 1, 0], &[]).unwrap_err();
        assert_eq!(err, EffectError::NullOperand { player: P0, slot: 0 });

        set(&mut state, P0, 0, "3");
        let err = play(&mut state, Operation::Add, "AnUn", P1, &[0, 0, 1, 1], &[]).unwrap_err();
        assert_eq!(err, EffectError::NullOperand { player: P1, slot: 1 });
    }

    #[test]
    fn test_sqrt() {
        let mut state = table(1);
        set(&mut state, P0, 0, "-1");
        let err = play(&mut state, Operation::Sqrt, "An", P0, &[0, 0], &[]).unwrap_err();
        assert_eq!(err, EffectError::NegativeRoot);
        assert_eq!(value(&state, P0, 0), dec("-1"));

        set(&mut state, P0, 0, "16");
        play(&mut state, Operation::Sqrt, "An", P0, &[0, 0], &[]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("4"));
    }

    #[test]
    fn test_unary_transforms() {
        let cases = [
            (Operation::AbsoluteValue, "-2.5", "2.5"),
            (Operation::Negate, "7", "-7"),
            (Operation::Square, "-3", "9"),
            (Operation::Inverse, "4", "0.25"),
            (Operation::Positive, "-6", "-6"),
        ];
        for (op, input, expected) in cases {
            let mut state = table(1);
            set(&mut state, P0, 1, input);

            play(&mut state, op, "An", P0, &[0, 1], &[]).unwrap();

            assert_eq!(value(&state, P0, 1), dec(expected), "{op}");
        }
    }

    #[test]
    fn test_inverse_of_zero() {
        let mut state = table(1);
        set(&mut state, P0, 0, "0");
        let err = play(&mut state, Operation::Inverse, "An", P0, &[0, 0], &[]).unwrap_err();
        assert_eq!(err, EffectError::DivideByZero);
    }

    #[test]
    fn test_positive_still_guards_null() {
        let mut state = table(1);
        let err = play(&mut state, Operation::Positive, "An", P0, &[0, 3], &[]).unwrap_err();
        assert_eq!(err, EffectError::NullOperand { player: P0, slot: 3 });
    }

    #[test]
    fn test_logarithms_reject_non_positive() {
        for op in [
            Operation::Log10,
            Operation::NaturalLog,
            Operation::LogorhythmWithDiceBase,
        ] {
            for input in ["0", "-5"] {
                let mut state = table(1);
                set(&mut state, P0, 0, input);
                let err = play(&mut state, op, "An", P0, &[0, 0], &[2]).unwrap_err();
                assert_eq!(err, EffectError::NonPositiveLog, "{op} on {input}");
            }
        }
    }

    #[test]
    fn test_logarithms() {
        let mut state = table(1);
        set(&mut state, P0, 0, "1000");
        play(&mut state, Operation::Log10, "An", P0, &[0, 0], &[]).unwrap();
        let got: f64 = value(&state, P0, 0).to_string().parse().unwrap();
        assert!((got - 3.0).abs() < 1e-12);

        set(&mut state, P0, 0, "1");
        play(&mut state, Operation::NaturalLog, "An", P0, &[0, 0], &[]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("0"));

        set(&mut state, P0, 0, "1");
        play(&mut state, Operation::LogorhythmWithDiceBase, "An", P0, &[0, 0], &[4]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("0"));
    }

    #[test]
    fn test_log_base_one_is_not_finite() {
        let mut state = table(1);
        set(&mut state, P0, 0, "8");
        let err = play(&mut state, Operation::LogorhythmWithDiceBase, "An", P0, &[0, 0], &[1]).unwrap_err();
        assert!(matches!(err, EffectError::NotFinite { .. }));
        assert_eq!(value(&state, P0, 0), dec("8"));
    }

    #[test]
    fn test_exponential() {
        let mut state = table(1);
        set(&mut state, P0, 0, "0");
        play(&mut state, Operation::Exponential, "An", P0, &[0, 0], &[]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("1"));

        set(&mut state, P0, 0, "100000");
        let err = play(&mut state, Operation::Exponential, "An", P0, &[0, 0], &[]).unwrap_err();
        assert_eq!(err, EffectError::NotFinite { operation: "exp" });
    }

    #[test]
    fn test_trig_uses_roll() {
        let mut state = table(1);
        set(&mut state, P0, 0, "2");

        play(&mut state, Operation::CosMod, "An", P0, &[0, 0], &[3]).unwrap();

        let expected = 2.0 * 3.0_f64.cos();
        let got: f64 = value(&state, P0, 0).to_string().parse().unwrap();
        assert!((got - expected).abs() < 1e-12);
    }

    #[test]
    fn test_root_base() {
        let mut state = table(1);
        set(&mut state, P0, 0, "81");
        play(&mut state, Operation::RootBase, "An", P0, &[0, 0], &[2]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("9"));

        set(&mut state, P0, 0, "5");
        play(&mut state, Operation::RootBase, "An", P0, &[0, 0], &[1]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("5"));

        set(&mut state, P0, 0, "-8");
        let err = play(&mut state, Operation::RootBase, "An", P0, &[0, 0], &[3]).unwrap_err();
        assert_eq!(err, EffectError::NegativeRoot);
    }

    #[test]
    fn test_exponent_base_is_exact() {
        let mut state = table(1);
        set(&mut state, P0, 0, "1.5");
        play(&mut state, Operation::ExponentBase, "An", P0, &[0, 0], &[3]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("3.375"));
    }

    #[test]
    fn test_sigma_and_product() {
        let mut state = table(1);
        fill(&mut state, P0, &[None, Some("2"), Some("3"), None, Some("4")]);
        play(&mut state, Operation::SigmaNotation, "A", P0, &[0], &[]).unwrap();

        assert_eq!(value(&state, P0, 1), dec("9"));
        assert!(is_null(&state, P0, 0));
        assert!(is_null(&state, P0, 2));
        assert!(is_null(&state, P0, 4));

        fill(&mut state, P0, &[Some("2"), Some("3"), None, Some("4"), None]);
        play(&mut state, Operation::ProductNotation, "A", P0, &[0], &[]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("24"));
        assert!(is_null(&state, P0, 1));
        assert!(is_null(&state, P0, 3));
    }

    #[test]
    fn test_fold_empty_row() {
        let mut state = table(1);
        let err = play(&mut state, Operation::SigmaNotation, "A", P0, &[0], &[]).unwrap_err();
        assert_eq!(err, EffectError::EmptyRow { player: P0 });
    }

    #[test]
    fn test_fold_keeps_destination_mark() {
        let mut state = table(1);
        set_marked(&mut state, P0, 0, "1", Mark::Fibonacci);
        set(&mut state, P0, 1, "4");

        play(&mut state, Operation::SigmaNotation, "A", P0, &[0], &[]).unwrap();

        assert_eq!(state.slot(P0, 0).unwrap().mark, Mark::Fibonacci);
        assert_eq!(value(&state, P0, 0), dec("5"));
    }

    #[test]
    fn test_polynomials() {
        let mut state = table(2);
        set(&mut state, P0, 0, "2");
        set(&mut state, P1, 0, "5");
        play(&mut state, Operation::Polynomial1, "AnUn", P1, &[0, 0, 1, 0], &[3]).unwrap();
        assert_eq!(value(&state, P0, 0), dec("11"));
        assert!(is_null(&state, P1, 0));

        set(&mut state, P0, 0, "2");
        set(&mut state, P1, 0, "3");
        set(&mut state, P1, 1, "4");
        play(&mut state, Operation::Polynomial2, "AnUnUn", P1, &[0, 0, 1, 0, 1, 1], &[2]).unwrap();
        // 2*4 + 3*2 + 4
        assert_eq!(value(&state, P0, 0), dec("18"));
        assert!(is_null(&state, P1, 0));
        assert!(is_null(&state, P1, 1));
    }

    #[test]
    fn test_defender_must_be_current() {
        let mut state = table(2);
        set(&mut state, P1, 0, "2");

        let err = play(&mut state, Operation::Square, "An", P0, &[1, 0], &[]).unwrap_err();
        assert!(matches!(
            err,
            EffectError::Validation(ValidationError::OutOfRangeOperand { position: 0, .. })
        ));
    }
}
