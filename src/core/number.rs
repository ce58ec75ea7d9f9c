//! Number slots and arbitrary-precision helpers.
//!
//! Every player owns a fixed row of `SLOT_COUNT` slots. A slot always holds
//! a value; an empty slot is marked `Mark::Null` and holds zero.
//!
//! Values are `BigDecimal`. Exact operations stay exact (bounded to
//! `SIGNIFICANT_DIGITS`); transcendental functions go through `f64` and are
//! converted back via the shortest round-trip decimal.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Slots per player row.
pub const SLOT_COUNT: usize = 5;

/// Significant digits kept after each arithmetic step.
pub const SIGNIFICANT_DIGITS: u64 = 64;

/// Largest trial divisor tried during factorisation.
///
/// Whatever remains above this bound is reported as a single factor.
pub const TRIAL_DIVISION_LIMIT: u64 = 1_000_000;

/// Widest integer part `to_exact_integer` will expand.
///
/// Precision limiting bounds significant digits, not the exponent, so a
/// value like `1E+279936` is still a single short decimal.
pub const MAX_INTEGER_DIGITS: i64 = 2 * SIGNIFICANT_DIGITS as i64;

/// Status tag of a slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// Ordinary number.
    #[default]
    None,
    /// Empty or consumed; the value is zero.
    Null,
    /// Cannot be targeted until the end of the turn.
    Immune,
    /// Advances along the Fibonacci sequence at the end of every turn.
    Fibonacci,
}

/// One numeric storage cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberSlot {
    #[serde(with = "decimal_string")]
    pub value: BigDecimal,
    pub mark: Mark,
}

impl NumberSlot {
    /// An empty slot: zero, marked `Null`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            value: BigDecimal::zero(),
            mark: Mark::Null,
        }
    }

    /// An ordinary slot holding `value`.
    #[must_use]
    pub fn new(value: impl Into<BigDecimal>) -> Self {
        Self::with_mark(value, Mark::None)
    }

    /// A slot holding `value` with an explicit mark.
    #[must_use]
    pub fn with_mark(value: impl Into<BigDecimal>, mark: Mark) -> Self {
        Self {
            value: value.into(),
            mark,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.mark == Mark::Null
    }

    #[must_use]
    pub fn is_immune(&self) -> bool {
        self.mark == Mark::Immune
    }

    /// Zero the slot and mark it `Null`.
    pub fn clear(&mut self) {
        self.value = BigDecimal::zero();
        self.mark = Mark::Null;
    }

    /// Overwrite value and mark.
    pub fn set(&mut self, value: BigDecimal, mark: Mark) {
        self.value = value;
        self.mark = mark;
    }
}

impl Default for NumberSlot {
    fn default() -> Self {
        Self::empty()
    }
}

/// A player's fixed row of slots.
pub type NumberRow = [NumberSlot; SLOT_COUNT];

/// A row of empty slots.
#[must_use]
pub fn empty_row() -> NumberRow {
    std::array::from_fn(|_| NumberSlot::empty())
}

/// Round `value` to `SIGNIFICANT_DIGITS` if it has grown past it.
#[must_use]
pub fn limit_precision(value: BigDecimal) -> BigDecimal {
    if value.digits() > SIGNIFICANT_DIGITS {
        value.with_prec(SIGNIFICANT_DIGITS)
    } else {
        value
    }
}

/// Convert a finite `f64` to its shortest round-trip decimal.
///
/// Returns `None` for NaN and infinities.
#[must_use]
pub fn from_f64(x: f64) -> Option<BigDecimal> {
    if !x.is_finite() {
        return None;
    }
    BigDecimal::from_str(&x.to_string()).ok()
}

/// Lossy conversion for transcendental evaluation.
///
/// Returns `None` when the magnitude does not fit an `f64`.
#[must_use]
pub fn to_f64(value: &BigDecimal) -> Option<f64> {
    value.to_f64().filter(|x| x.is_finite())
}

/// Digits left of the decimal point; zero or negative when `|value| < 1`.
#[must_use]
pub fn integer_digits(value: &BigDecimal) -> i64 {
    let (_, scale) = value.as_bigint_and_exponent();
    i64::try_from(value.digits())
        .unwrap_or(i64::MAX)
        .saturating_sub(scale)
}

/// The exact integer held by `value`, if it has no fractional part.
///
/// Returns `None` past `MAX_INTEGER_DIGITS`.
#[must_use]
pub fn to_exact_integer(value: &BigDecimal) -> Option<BigInt> {
    if value.is_zero() {
        return Some(BigInt::zero());
    }
    let width = integer_digits(value);
    if width <= 0 || width > MAX_INTEGER_DIGITS || !value.is_integer() {
        return None;
    }
    let (digits, _) = value.with_scale(0).into_bigint_and_exponent();
    Some(digits)
}

/// Prime factors of `n` in ascending order, by trial division.
///
/// Returns an empty list for `n <= 1`. A cofactor left once the divisor
/// passes `TRIAL_DIVISION_LIMIT` is appended unfactored.
#[must_use]
pub fn prime_factors(n: &BigInt) -> Vec<BigInt> {
    let mut factors = Vec::new();
    if *n <= BigInt::one() {
        return factors;
    }

    let mut rest = n.clone();
    let two = BigInt::from(2u32);
    while (&rest % &two).is_zero() {
        factors.push(two.clone());
        rest /= &two;
    }

    let mut divisor = BigInt::from(3u32);
    let limit = BigInt::from(TRIAL_DIVISION_LIMIT);
    while &divisor * &divisor <= rest && divisor <= limit {
        while (&rest % &divisor).is_zero() {
            factors.push(divisor.clone());
            rest /= &divisor;
        }
        divisor += &two;
    }

    if rest > BigInt::one() {
        factors.push(rest);
    }
    factors
}

/// The Fibonacci successor of `value`, seeded 1 -> 2.
///
/// Returns `None` if `value` is not a Fibonacci number, not an integer, or
/// wider than `MAX_INTEGER_DIGITS`.
///
/// ```
/// use bigdecimal::BigDecimal;
/// use matetra_engine::core::number::next_fibonacci;
///
/// assert_eq!(next_fibonacci(&BigDecimal::from(1)), Some(BigDecimal::from(2)));
/// assert_eq!(next_fibonacci(&BigDecimal::from(8)), Some(BigDecimal::from(13)));
/// assert_eq!(next_fibonacci(&BigDecimal::from(4)), None);
/// ```
#[must_use]
pub fn next_fibonacci(value: &BigDecimal) -> Option<BigDecimal> {
    let target = to_exact_integer(value)?;
    if target.is_one() {
        return Some(BigDecimal::from(2));
    }

    let (mut a, mut b) = (BigInt::one(), BigInt::from(2u32));
    while b <= target {
        if b == target {
            return Some(BigDecimal::new(a + b, 0));
        }
        let next = &a + &b;
        a = std::mem::replace(&mut b, next);
    }
    None
}

/// Decimals travel as their canonical string, also in bincode.
mod decimal_string {
    use bigdecimal::BigDecimal;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let text = String::deserialize(deserializer)?;
        BigDecimal::from_str(&text).map_err(de::Error::custom)
    }
}

/// Build a decimal from up to 38 digits and a scale.
pub(crate) fn literal(digits: u128, scale: i64) -> BigDecimal {
    BigDecimal::new(BigInt::from(digits), scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_empty_slot() {
        let slot = NumberSlot::empty();
        assert!(slot.is_null());
        assert!(slot.value.is_zero());

        let row = empty_row();
        assert!(row.iter().all(NumberSlot::is_null));
    }

    #[test]
    fn test_clear() {
        let mut slot = NumberSlot::with_mark(5, Mark::Fibonacci);
        slot.clear();

        assert_eq!(slot, NumberSlot::empty());
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(from_f64(0.5), Some(dec("0.5")));
        assert_eq!(from_f64(-2.0), Some(BigDecimal::from(-2)));
        assert_eq!(from_f64(f64::INFINITY), None);
        assert_eq!(from_f64(f64::NAN), None);
    }

    #[test]
    fn test_limit_precision() {
        let third = BigDecimal::one() / BigDecimal::from(3);
        let limited = limit_precision(third);
        assert_eq!(limited.digits(), SIGNIFICANT_DIGITS);

        let small = limit_precision(BigDecimal::from(42));
        assert_eq!(small, BigDecimal::from(42));
    }

    #[test]
    fn test_exact_integer() {
        assert_eq!(to_exact_integer(&dec("12.000")), Some(BigInt::from(12)));
        assert_eq!(to_exact_integer(&dec("7.5")), None);
        assert_eq!(to_exact_integer(&dec("-3")), Some(BigInt::from(-3)));
        assert_eq!(to_exact_integer(&dec("0.000")), Some(BigInt::zero()));
    }

    #[test]
    fn test_exact_integer_width_bound() {
        assert_eq!(integer_digits(&dec("123.45")), 3);
        assert_eq!(integer_digits(&dec("0.05")), -1);
        assert_eq!(integer_digits(&dec("1E+279936")), 279_937);

        let widest = BigDecimal::new(BigInt::one(), -(MAX_INTEGER_DIGITS - 1));
        assert!(to_exact_integer(&widest).is_some());

        let too_wide = BigDecimal::new(BigInt::one(), -MAX_INTEGER_DIGITS);
        assert_eq!(to_exact_integer(&too_wide), None);
        assert_eq!(to_exact_integer(&dec("1E+279936")), None);
        assert_eq!(to_exact_integer(&dec("1E-279936")), None);
    }

    #[test]
    fn test_prime_factors() {
        let factors: Vec<_> = prime_factors(&BigInt::from(12))
            .into_iter()
            .map(|f| f.to_string())
            .collect();
        assert_eq!(factors, vec!["2", "2", "3"]);

        let factors = prime_factors(&BigInt::from(97));
        assert_eq!(factors, vec![BigInt::from(97)]);

        let factors = prime_factors(&BigInt::from(3 * 3 * 5 * 7 * 7));
        assert_eq!(
            factors,
            [3, 3, 5, 7, 7].map(BigInt::from).to_vec()
        );

        assert!(prime_factors(&BigInt::one()).is_empty());
        assert!(prime_factors(&BigInt::from(-6)).is_empty());
    }

    #[test]
    fn test_prime_factors_large_power() {
        let googol = BigInt::from(10u32).pow(100);
        let factors = prime_factors(&googol);

        assert_eq!(factors.len(), 200);
        assert_eq!(factors.iter().filter(|f| **f == BigInt::from(2)).count(), 100);
    }

    #[test]
    fn test_next_fibonacci() {
        let sequence = [1, 2, 3, 5, 8, 13, 21];
        for pair in sequence.windows(2) {
            assert_eq!(
                next_fibonacci(&BigDecimal::from(pair[0])),
                Some(BigDecimal::from(pair[1]))
            );
        }

        assert_eq!(next_fibonacci(&BigDecimal::from(0)), None);
        assert_eq!(next_fibonacci(&BigDecimal::from(7)), None);
        assert_eq!(next_fibonacci(&dec("2.5")), None);
    }

    #[test]
    fn test_next_fibonacci_huge_value() {
        assert_eq!(next_fibonacci(&dec("1E+279936")), None);
    }

    #[test]
    fn test_literal() {
        assert_eq!(literal(314, 2), dec("3.14"));
    }

    #[test]
    fn test_slot_serde() {
        let slot = NumberSlot::with_mark(dec("1.25"), Mark::Immune);

        let json = serde_json::to_string(&slot).unwrap();
        let back: NumberSlot = serde_json::from_str(&json).unwrap();

        assert_eq!(slot, back);
    }
}
