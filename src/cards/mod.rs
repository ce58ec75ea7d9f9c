//! Card system: operations, input shapes, instances, and the catalog.
//!
//! ## Key Types
//!
//! - `Operation`: Which effect a card runs
//! - `InputShape`: Parsed operand grammar (`"AnUn"`, `"pn"`, ...)
//! - `Card`: One physical card with owner and staged operands
//! - `CardCatalog`: Deck rows, checked and expanded into cards
//!
//! ## Duplicates
//!
//! Cards sharing a name are independent instances; identity is the index
//! in the game's card pool.

pub mod catalog;
pub mod definition;
pub mod instance;
pub mod shape;

pub use catalog::{expand_rows, standard_deck, standard_rows, CardCatalog, DeckRow};
pub use definition::{CardCategory, Operation};
pub use instance::{Card, CardIndex, CardOwner, Operands};
pub use shape::{InputShape, ShapeSlot};
