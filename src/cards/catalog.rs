//! Card catalog: deck rows and their expansion into card instances.
//!
//! A `DeckRow` is one line of deck data in its external string form. The
//! `CardCatalog` checks rows as they are registered and expands them into
//! independent `InDeck` card instances, `copies` per row.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardCategory, Operation};
use super::instance::Card;
use super::shape::InputShape;
use crate::error::CatalogError;

/// One row of deck data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRow {
    pub name: String,
    pub description: String,
    /// `function`, `theorem` or `constant`.
    pub category: String,
    /// Operation id, e.g. `ADD`.
    pub operation: String,
    /// Input-shape grammar, e.g. `AnUn`.
    pub input_shape: String,
    /// Physical copies of this card in the deck.
    pub copies: usize,
}

impl DeckRow {
    /// Create a row.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        operation: impl Into<String>,
        input_shape: impl Into<String>,
        copies: usize,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: category.into(),
            operation: operation.into(),
            input_shape: input_shape.into(),
            copies,
        }
    }

    /// Parse the row into a template card (owner `InDeck`).
    pub fn to_card(&self) -> Result<Card, CatalogError> {
        let operation: Operation = self.operation.parse()?;
        let category: CardCategory = self.category.parse()?;
        let shape = InputShape::parse(&self.input_shape).map_err(|source| CatalogError::Shape {
            name: self.name.clone(),
            source,
        })?;

        let mut card = Card::new(&self.name, &self.description, operation, shape);
        card.category = category;
        Ok(card)
    }
}

/// Expand rows into physical cards, `copies` per row, in row order.
///
/// Fails on the first row with an unknown operation, unknown category or
/// malformed shape; no partial deck is returned.
pub fn expand_rows(rows: &[DeckRow]) -> Result<Vec<Card>, CatalogError> {
    let templates = rows
        .iter()
        .map(|row| Ok((row.to_card()?, row.copies)))
        .collect::<Result<Vec<_>, CatalogError>>()?;
    Ok(repeat_copies(templates))
}

fn repeat_copies(templates: impl IntoIterator<Item = (Card, usize)>) -> Vec<Card> {
    templates
        .into_iter()
        .flat_map(|(card, copies)| std::iter::repeat(card).take(copies))
        .collect()
}

/// Validated collection of deck rows, indexed by name.
///
/// ## Example
///
/// ```
/// use matetra_engine::cards::{CardCatalog, DeckRow};
///
/// let mut catalog = CardCatalog::new();
/// catalog
///     .register(DeckRow::new("Add", "Add two numbers", "function", "ADD", "AnUn", 3))
///     .unwrap();
///
/// assert_eq!(catalog.deck_size(), 3);
/// assert_eq!(catalog.expand().len(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    rows: Vec<DeckRow>,
    templates: Vec<Card>,
    by_name: FxHashMap<String, usize>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for row in standard_rows() {
            // Covered by test_standard_catalog_covers_every_operation.
            if let Err(err) = catalog.register(row) {
                log::warn!("skipping built-in card: {err}");
            }
        }
        log::debug!("built-in catalog: {} rows, {} cards", catalog.len(), catalog.deck_size());
        catalog
    }

    /// Check and add a row. Names must be unique.
    pub fn register(&mut self, row: DeckRow) -> Result<(), CatalogError> {
        if self.by_name.contains_key(&row.name) {
            return Err(CatalogError::DuplicateEntry(row.name));
        }
        let template = row.to_card()?;
        self.by_name.insert(row.name.clone(), self.rows.len());
        self.rows.push(row);
        self.templates.push(template);
        Ok(())
    }

    /// Register several rows, stopping at the first failure.
    pub fn extend(&mut self, rows: impl IntoIterator<Item = DeckRow>) -> Result<(), CatalogError> {
        rows.into_iter().try_for_each(|row| self.register(row))
    }

    /// Number of distinct rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &DeckRow> {
        self.rows.iter()
    }

    /// Find rows whose operation falls in `category`.
    pub fn find_by_category(&self, category: CardCategory) -> impl Iterator<Item = &DeckRow> {
        self.rows
            .iter()
            .zip(&self.templates)
            .filter(move |(_, card)| card.category == category)
            .map(|(row, _)| row)
    }

    /// Total physical cards the catalog expands to.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.rows.iter().map(|r| r.copies).sum()
    }

    /// Expand every row into physical cards.
    #[must_use]
    pub fn expand(&self) -> Vec<Card> {
        repeat_copies(
            self.templates
                .iter()
                .cloned()
                .zip(self.rows.iter().map(|row| row.copies)),
        )
    }
}

/// The built-in deck, expanded.
#[must_use]
pub fn standard_deck() -> Vec<Card> {
    CardCatalog::standard().expand()
}

/// Rows of the built-in deck.
#[must_use]
pub fn standard_rows() -> Vec<DeckRow> {
    const F: &str = "function";
    const T: &str = "theorem";
    const C: &str = "constant";

    let rows: [(&str, &str, &str, &str, &str, usize); 48] = [
        // Functions
        ("Addition", "Add one of your numbers to the defender's number.", F, "ADD", "AnUn", 4),
        ("Subtraction", "Subtract one of your numbers from the defender's number.", F, "SUBTRACT", "AnUn", 4),
        ("Multiplication", "Multiply the defender's number by one of yours.", F, "MULTIPLY", "AnUn", 3),
        ("Division", "Divide the defender's number by one of yours.", F, "DIVIDE", "AnUn", 3),
        ("Absolute Value", "Make the defender's number non-negative.", F, "ABSOLUTEVALUE", "An", 2),
        ("Inverse", "Replace the defender's number with its reciprocal.", F, "INVERSE", "An", 2),
        ("Negative", "Flip the sign of the defender's number.", F, "NEGATIVE", "An", 2),
        ("Positive", "Leave the defender's number exactly as it is.", F, "POSITIVE", "An", 1),
        ("Square Root", "Take the square root of the defender's number.", F, "SQRT", "An", 2),
        ("Square", "Square the defender's number.", F, "SQUARE", "An", 2),
        ("Factorial", "Roll a die and gain its factorial.", C, "FACTORIAL", "", 1),
        ("Cosine", "Roll a die; multiply the defender's number by its cosine.", F, "COSMOD", "An", 1),
        ("Sine", "Roll a die; multiply the defender's number by its sine.", F, "SINMOD", "An", 1),
        ("Tangent", "Roll a die; multiply the defender's number by its tangent.", F, "TANMOD", "An", 1),
        ("Common Logarithm", "Take the base-10 logarithm of the defender's number.", F, "LOG10", "An", 1),
        ("Exponential", "Raise e to the defender's number.", F, "EXPONENTIAL", "An", 1),
        ("Natural Logarithm", "Take the natural logarithm of the defender's number.", F, "NATLOG", "An", 1),
        ("Logarithm", "Roll a die; take the logarithm of the defender's number in that base.", F, "LOGORHYTHM", "An", 1),
        ("Root", "Roll a die; take that root of the defender's number.", F, "ROOTBASE", "An", 1),
        ("Exponent", "Roll a die; raise the defender's number to that power.", F, "EXPONENTBASE", "An", 1),
        ("Sigma Notation", "Sum all of the defender's numbers into one.", F, "SIGMANOTATION", "A", 1),
        ("Product Notation", "Multiply all of the defender's numbers into one.", F, "PRODUCTNOTATION", "A", 1),
        ("Linear Polynomial", "Roll x; the defender's number becomes a*x + b.", F, "POLYNOMIAL1", "AnUn", 1),
        ("Quadratic Polynomial", "Roll x; the defender's number becomes a*x^2 + b*x + c.", F, "POLYNOMIAL2", "AnUnUn", 1),
        // Theorems
        ("Identity", "Nothing happens, but the number must exist.", T, "ELEMENTIDENTITY", "An", 1),
        ("Closure", "Make one of your numbers immune until the end of the turn.", T, "ELEMENTCLOSURE", "Un", 2),
        ("Distributive Property", "Give every other player a copy of a number.", T, "ELEMENTDISTRIBUTIVE", "pn", 1),
        ("Commutative Property", "Swap any two numbers.", T, "ELEMENTCOMMUTATIVE", "pnpn", 2),
        ("Pythagorean Theorem", "The defender's number becomes the hypotenuse of it and one of yours.", T, "PYTHAGOREANTHEOREM", "AnUn", 1),
        ("Pascal's Triangle", "Collapse a run of adjacent numbers into their sum.", T, "PASCALTRIANGLE", "pn", 1),
        ("Fundamental Theorem of Arithmetic", "Split an integer into its prime factors.", T, "FUNDAMENTALTHEOREMOFARITHMETIC", "pn", 1),
        // Constants
        ("Pi", "Gain pi.", C, "CONSTPI", "", 2),
        ("Euler's Number", "Gain e.", C, "CONSTE", "", 2),
        ("Negative One", "Gain -1.", C, "CONSTN1", "", 2),
        ("Golden Ratio", "Gain phi.", C, "CONSTPHI", "", 1),
        ("Zero", "Gain 0.", C, "CONSTZERO", "", 2),
        ("Tau", "Gain tau.", C, "CONSTTAU", "", 1),
        ("Seventy-Three", "Gain 73 if you already hold a 73, otherwise 12.", C, "CONST73", "", 1),
        ("Googol", "Steal the defender's number if it divides by 10, otherwise gain 10.", C, "CONSTGOOGLE", "An", 1),
        ("Forty-Two", "Gain 42.", C, "CONST42", "", 1),
        ("Lucky Seven", "Gain 7; roll two dice and gain another 7 if they sum to 7.", C, "CONST7", "", 1),
        ("Twenty-Six", "Gain 26.", C, "CONST26", "", 1),
        ("Six", "Gain 6.", C, "CONST6", "", 2),
        ("Fibonacci", "Gain 1; it grows along the Fibonacci sequence every turn.", C, "CONSTFIBONACCI", "", 1),
        ("Sixty-Nine", "Gain 69.", C, "CONST69", "", 1),
        ("Power of Ten", "Roll a die; gain ten to that power.", C, "CONSTTENPOWER", "", 1),
        ("Graham's Number", "Gain 9. Close enough.", C, "CONSTGRAHAM", "", 1),
        ("Cupid", "Roll two dice; gain 29 if both are at most 3, otherwise 14.", C, "CONSTCUPID", "", 1),
    ];

    rows.into_iter()
        .map(|(name, description, category, operation, shape, copies)| {
            DeckRow::new(name, description, category, operation, shape, copies)
        })
        .collect()
}
