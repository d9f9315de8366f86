//! IT dialect: `H x W = height x width`, whitespace-insensitive.
//!
//! ```text
//! 250 × 160 = 30 / 5 [170 / 5] 40 × 15 [3 / 50 / 5] 15
//! 200 × 160 = 30 [130] 40 × 15 [60 (10) 60] 15
//! ```
//!
//! Height details are `mt[/he] [[hw/]ah[/fw]] [fe/]mb`; width details are
//! `ml [columns] mr`, with columns divided by `(gap)`. Every span gets a
//! label from the closed vocabulary of [`ItLabel`].

mod builder;
mod labels;
mod parser;
mod scanner;

pub use builder::build_formula;
pub use labels::{ColumnRole, InvalidItLabel, ItLabel};
pub use parser::parse_formula;

use std::collections::HashSet;

use codlayout_core::{LayoutFormula, ParsingError};

use crate::service::{resolve_source, FormulaSource, LayoutFormulaService};

pub const IT_FORMULA_TYPE: &str = "IT";

#[derive(Debug, Clone, Copy, Default)]
pub struct ItLayoutFormulaService;

impl ItLayoutFormulaService {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutFormulaService for ItLayoutFormulaService {
    fn formula_type(&self) -> &'static str {
        IT_FORMULA_TYPE
    }

    fn parse_formula(&self, text: &str) -> Result<Option<LayoutFormula>, ParsingError> {
        parse_formula(text).map_err(|err| {
            tracing::debug!(
                "IT formula rejected ({:?} at {:?}): {}",
                err.kind,
                err.index,
                err.message
            );
            err
        })
    }

    fn build_formula(&self, formula: &LayoutFormula) -> String {
        build_formula(formula)
    }

    /// Keep the labels which are valid IT labels and are used in the formula
    fn filter_formula_labels(&self, formula: FormulaSource<'_>, labels: &[String]) -> Vec<String> {
        let Some(formula) = resolve_source(self, formula) else {
            return Vec::new();
        };
        let present: HashSet<&str> = formula.labels().collect();
        labels
            .iter()
            .filter(|label| label.parse::<ItLabel>().is_ok() && present.contains(label.as_str()))
            .cloned()
            .collect()
    }
}
