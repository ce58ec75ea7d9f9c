//! Effect system: validating and resolving cards.
//!
//! - `validate`: checks staged operands against a card's `InputShape`
//! - `EffectResolver`: dispatch table from `Operation` to handler
//! - `ResolverContext`: what a handler can read and mutate
//!
//! Handlers live in three families registered by `EffectResolver::standard`:
//! functions (arithmetic, transcendental, folds), theorems (structural row
//! moves) and constants (placement into the owner's row).
//!
//! Every handler checks its inputs before its first write, so a card that
//! fails leaves the state it ran against unchanged.

mod constants;
mod functions;
mod resolver;
mod theorems;
mod validator;

#[cfg(test)]
mod test_support;

pub use resolver::{EffectHandler, EffectResolver, QueueFailure, ResolverContext, SlotRef};
pub use validator::{validate, validate_operands};
