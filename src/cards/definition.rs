//! Card definitions - static card metadata.
//!
//! `Operation` identifies which effect a card runs. Its external form is the
//! upper-case method name used in deck data (`"ADD"`, `"CONSTPI"`, ...).
//! `CardCategory` groups operations the way the deck presents them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CatalogError;

/// Broad grouping of cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    /// Transforms existing numbers.
    Function,
    /// Algebraic identities and structural moves.
    Theorem,
    /// Introduces a new number.
    Constant,
}

impl CardCategory {
    /// External name used in deck data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CardCategory::Function => "function",
            CardCategory::Theorem => "theorem",
            CardCategory::Constant => "constant",
        }
    }
}

impl FromStr for CardCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "function" => Ok(CardCategory::Function),
            "theorem" => Ok(CardCategory::Theorem),
            "constant" => Ok(CardCategory::Constant),
            _ => Err(CatalogError::UnknownCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for CardCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effect identifier carried by every card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    // === Functions ===
    Add,
    Subtract,
    Multiply,
    Divide,
    AbsoluteValue,
    Inverse,
    Negate,
    Positive,
    Sqrt,
    Square,
    Factorial,
    CosMod,
    SinMod,
    TanMod,
    Log10,
    Exponential,
    NaturalLog,
    LogorhythmWithDiceBase,
    RootBase,
    ExponentBase,
    SigmaNotation,
    ProductNotation,
    Polynomial1,
    Polynomial2,

    // === Theorems ===
    ElementIdentity,
    ElementClosure,
    ElementDistributive,
    ElementCommutative,
    PythagoreanTheorem,
    PascalTriangle,
    FundamentalTheoremOfArithmetic,

    // === Constants ===
    Pi,
    E,
    NegativeOne,
    Phi,
    Zero,
    Tau,
    Seventy3,
    Google,
    FortyTwo,
    Seven,
    TwentySix,
    Six,
    Fibonacci,
    SixtyNine,
    TenPower,
    Graham,
    Cupid,
}

impl Operation {
    /// Every operation, in catalog order.
    pub const ALL: [Operation; 48] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::AbsoluteValue,
        Operation::Inverse,
        Operation::Negate,
        Operation::Positive,
        Operation::Sqrt,
        Operation::Square,
        Operation::Factorial,
        Operation::CosMod,
        Operation::SinMod,
        Operation::TanMod,
        Operation::Log10,
        Operation::Exponential,
        Operation::NaturalLog,
        Operation::LogorhythmWithDiceBase,
        Operation::RootBase,
        Operation::ExponentBase,
        Operation::SigmaNotation,
        Operation::ProductNotation,
        Operation::Polynomial1,
        Operation::Polynomial2,
        Operation::ElementIdentity,
        Operation::ElementClosure,
        Operation::ElementDistributive,
        Operation::ElementCommutative,
        Operation::PythagoreanTheorem,
        Operation::PascalTriangle,
        Operation::FundamentalTheoremOfArithmetic,
        Operation::Pi,
        Operation::E,
        Operation::NegativeOne,
        Operation::Phi,
        Operation::Zero,
        Operation::Tau,
        Operation::Seventy3,
        Operation::Google,
        Operation::FortyTwo,
        Operation::Seven,
        Operation::TwentySix,
        Operation::Six,
        Operation::Fibonacci,
        Operation::SixtyNine,
        Operation::TenPower,
        Operation::Graham,
        Operation::Cupid,
    ];

    /// External method name.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Operation::Add => "ADD",
            Operation::Subtract => "SUBTRACT",
            Operation::Multiply => "MULTIPLY",
            Operation::Divide => "DIVIDE",
            Operation::AbsoluteValue => "ABSOLUTEVALUE",
            Operation::Inverse => "INVERSE",
            Operation::Negate => "NEGATIVE",
            Operation::Positive => "POSITIVE",
            Operation::Sqrt => "SQRT",
            Operation::Square => "SQUARE",
            Operation::Factorial => "FACTORIAL",
            Operation::CosMod => "COSMOD",
            Operation::SinMod => "SINMOD",
            Operation::TanMod => "TANMOD",
            Operation::Log10 => "LOG10",
            Operation::Exponential => "EXPONENTIAL",
            Operation::NaturalLog => "NATLOG",
            Operation::LogorhythmWithDiceBase => "LOGORHYTHM",
            Operation::RootBase => "ROOTBASE",
            Operation::ExponentBase => "EXPONENTBASE",
            Operation::SigmaNotation => "SIGMANOTATION",
            Operation::ProductNotation => "PRODUCTNOTATION",
            Operation::Polynomial1 => "POLYNOMIAL1",
            Operation::Polynomial2 => "POLYNOMIAL2",
            Operation::ElementIdentity => "ELEMENTIDENTITY",
            Operation::ElementClosure => "ELEMENTCLOSURE",
            Operation::ElementDistributive => "ELEMENTDISTRIBUTIVE",
            Operation::ElementCommutative => "ELEMENTCOMMUTATIVE",
            Operation::PythagoreanTheorem => "PYTHAGOREANTHEOREM",
            Operation::PascalTriangle => "PASCALTRIANGLE",
            Operation::FundamentalTheoremOfArithmetic => "FUNDAMENTALTHEOREMOFARITHMETIC",
            Operation::Pi => "CONSTPI",
            Operation::E => "CONSTE",
            Operation::NegativeOne => "CONSTN1",
            Operation::Phi => "CONSTPHI",
            Operation::Zero => "CONSTZERO",
            Operation::Tau => "CONSTTAU",
            Operation::Seventy3 => "CONST73",
            Operation::Google => "CONSTGOOGLE",
            Operation::FortyTwo => "CONST42",
            Operation::Seven => "CONST7",
            Operation::TwentySix => "CONST26",
            Operation::Six => "CONST6",
            Operation::Fibonacci => "CONSTFIBONACCI",
            Operation::SixtyNine => "CONST69",
            Operation::TenPower => "CONSTTENPOWER",
            Operation::Graham => "CONSTGRAHAM",
            Operation::Cupid => "CONSTCUPID",
        }
    }

    /// The category a card running this operation belongs to.
    #[must_use]
    pub fn category(self) -> CardCategory {
        use Operation::*;
        match self {
            ElementIdentity
            | ElementClosure
            | ElementDistributive
            | ElementCommutative
            | PythagoreanTheorem
            | PascalTriangle
            | FundamentalTheoremOfArithmetic => CardCategory::Theorem,
            Factorial | Pi | E | NegativeOne | Phi | Zero | Tau | Seventy3 | Google
            | FortyTwo | Seven | TwentySix | Six | Fibonacci | SixtyNine | TenPower
            | Graham | Cupid => CardCategory::Constant,
            _ => CardCategory::Function,
        }
    }
}

impl FromStr for Operation {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Operation::ALL
            .into_iter()
            .find(|op| op.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CatalogError::UnknownOperation(s.to_string()))
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
