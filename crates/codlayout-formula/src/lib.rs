pub mod bo;
pub mod dialect;
pub mod it;
pub mod service;

pub use bo::BoLayoutFormulaService;
pub use dialect::{Dialect, UnknownDialect};
pub use it::{ColumnRole, InvalidItLabel, ItLabel, ItLayoutFormulaService};
pub use service::{FormulaSource, LayoutFormulaService};

pub use codlayout_core::{
    AreaColors, LayoutArea, LayoutFormula, LayoutSpan, LayoutValue, ParseOutcome, ParsingError,
    ParsingErrorKind, Unit, ValidationErrors,
};

/// Parse a formula in the given dialect
///
/// Blank input yields `Ok(None)`.
pub fn parse_formula(dialect: Dialect, text: &str) -> Result<Option<LayoutFormula>, ParsingError> {
    dialect.service().parse_formula(text)
}

/// Build the text of a formula in the given dialect
pub fn build_formula(dialect: Dialect, formula: &LayoutFormula) -> String {
    dialect.service().build_formula(formula)
}
