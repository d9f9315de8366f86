//! BO dialect: `[unit ]H x W = vSpans x hSpans`.
//!
//! Dimensions are written `N` (original), `(N)` (not original) or `(N) [N]`
//! (with the attested original value), optionally followed by `:label`.
//! Spans are divided by `/`, and `//` pairs wrap the text spans:
//!
//! ```text
//! 20 x 10 = 4 // 10 // 6 x 2 // 7 // 3
//! ```

mod builder;
mod parser;
mod preprocess;

pub use builder::build_formula;
pub use parser::parse_formula;
pub use preprocess::preprocess_formula;

use std::collections::HashSet;

use codlayout_core::{LayoutFormula, ParsingError};

use crate::service::{resolve_source, FormulaSource, LayoutFormulaService};

pub const BO_FORMULA_TYPE: &str = "BO";

#[derive(Debug, Clone, Copy, Default)]
pub struct BoLayoutFormulaService;

impl BoLayoutFormulaService {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutFormulaService for BoLayoutFormulaService {
    fn formula_type(&self) -> &'static str {
        BO_FORMULA_TYPE
    }

    fn parse_formula(&self, text: &str) -> Result<Option<LayoutFormula>, ParsingError> {
        parse_formula(text).map_err(|err| {
            tracing::debug!(
                "BO formula rejected ({:?} at {:?}): {}",
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

    /// Labels are free text in BO: keep those used by the size or any span
    fn filter_formula_labels(&self, formula: FormulaSource<'_>, labels: &[String]) -> Vec<String> {
        let Some(formula) = resolve_source(self, formula) else {
            return Vec::new();
        };
        let present: HashSet<&str> = formula.labels().collect();
        labels
            .iter()
            .filter(|label| present.contains(label.as_str()))
            .cloned()
            .collect()
    }
}
