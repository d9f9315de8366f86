use std::borrow::Cow;

use codlayout_core::{
    area, validation, AreaColors, LayoutArea, LayoutFormula, LayoutSpan, ParsingError,
    ValidationErrors,
};

/// A formula given either as text or as an already parsed model
#[derive(Debug, Clone, Copy)]
pub enum FormulaSource<'a> {
    Text(&'a str),
    Model(&'a LayoutFormula),
}

impl<'a> From<&'a str> for FormulaSource<'a> {
    fn from(text: &'a str) -> Self {
        FormulaSource::Text(text)
    }
}

impl<'a> From<&'a String> for FormulaSource<'a> {
    fn from(text: &'a String) -> Self {
        FormulaSource::Text(text.as_str())
    }
}

impl<'a> From<&'a LayoutFormula> for FormulaSource<'a> {
    fn from(formula: &'a LayoutFormula) -> Self {
        FormulaSource::Model(formula)
    }
}

/// A layout formula dialect.
///
/// Each dialect provides its own grammar (parse, build, label filtering);
/// grid areas and validation are shared.
pub trait LayoutFormulaService: std::fmt::Debug + Send + Sync {
    /// The formula type identifier, e.g. "BO"
    fn formula_type(&self) -> &'static str;

    /// Parse a formula from text. Blank text yields `Ok(None)`.
    fn parse_formula(&self, text: &str) -> Result<Option<LayoutFormula>, ParsingError>;

    /// Build the text of a formula from its model
    fn build_formula(&self, formula: &LayoutFormula) -> String;

    /// Keep only the labels from `labels` which belong to the formula
    fn filter_formula_labels(&self, formula: FormulaSource<'_>, labels: &[String]) -> Vec<String>;

    fn get_areas(&self, spans: &[LayoutSpan]) -> Vec<LayoutArea> {
        area::get_areas(spans)
    }

    fn filter_areas(&self, name: &str, areas: &[LayoutArea]) -> Vec<LayoutArea> {
        area::filter_areas(name, areas)
    }

    fn map_area_colors(&self, areas: &[LayoutArea], colors: &AreaColors) -> AreaColors {
        area::map_area_colors(areas, colors)
    }

    fn validate_formula_size(&self, formula: &LayoutFormula) -> Option<ValidationErrors> {
        validation::validate_formula_size(formula)
    }

    /// Validate a formula text: a parse error is reported under `formula`,
    /// otherwise the size is checked. Blank text is valid.
    fn validate_formula(&self, text: &str) -> Option<ValidationErrors> {
        match self.parse_formula(text) {
            Ok(Some(formula)) => self.validate_formula_size(&formula),
            Ok(None) => None,
            Err(err) => {
                let mut errors = ValidationErrors::new();
                errors.insert("formula".to_string(), err.message);
                Some(errors)
            }
        }
    }
}

/// Resolve a formula source into a model, parsing text when needed.
/// Blank or invalid text yields `None`.
pub(crate) fn resolve_source<'a, S>(service: &S, source: FormulaSource<'a>) -> Option<Cow<'a, LayoutFormula>>
where
    S: LayoutFormulaService + ?Sized,
{
    match source {
        FormulaSource::Model(formula) => Some(Cow::Borrowed(formula)),
        FormulaSource::Text(text) => service.parse_formula(text).ok().flatten().map(Cow::Owned),
    }
}
