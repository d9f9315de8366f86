use indexmap::IndexMap;

use crate::model::{format_number, LayoutFormula};

/// Validation messages keyed by what failed (`formula`, `height`, `width`)
pub type ValidationErrors = IndexMap<String, String>;

/// Validate the declared size of a formula against its spans.
///
/// The height must equal the sum of the vertical spans and the width the
/// sum of the horizontal spans. Returns `None` when the formula is valid
/// or has no spans at all.
pub fn validate_formula_size(formula: &LayoutFormula) -> Option<ValidationErrors> {
    if formula.spans.is_empty() {
        return None;
    }

    let height = formula.height.value;
    let width = formula.width.value;
    let v_sum: f64 = formula.vertical_spans().map(|s| s.value).sum();
    let h_sum: f64 = formula.horizontal_spans().map(|s| s.value).sum();

    let mut errors = ValidationErrors::new();
    if height != v_sum {
        errors.insert(
            "height".to_string(),
            format!(
                "Height {} does not match v-spans sum {}",
                format_number(height),
                format_number(v_sum)
            ),
        );
    }
    if width != h_sum {
        errors.insert(
            "width".to_string(),
            format!(
                "Width {} does not match h-spans sum {}",
                format_number(width),
                format_number(h_sum)
            ),
        );
    }

    if errors.is_empty() {
        None
    } else {
        tracing::debug!("formula size mismatch: {:?}", errors);
        Some(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayoutSpan, LayoutValue};

    fn formula(height: f64, width: f64, v: &[f64], h: &[f64]) -> LayoutFormula {
        let mut f = LayoutFormula::new("BO");
        f.height = LayoutValue::new(height);
        f.width = LayoutValue::new(width);
        f.spans.extend(v.iter().map(|&n| LayoutSpan::vertical(n)));
        f.spans.extend(h.iter().map(|&n| LayoutSpan::horizontal(n)));
        f
    }

    #[test]
    fn test_valid_size() {
        assert_eq!(validate_formula_size(&formula(20.0, 10.0, &[4.0, 10.0, 6.0], &[2.0, 7.0, 1.0])), None);
    }

    #[test]
    fn test_no_spans_is_valid() {
        assert_eq!(validate_formula_size(&formula(20.0, 10.0, &[], &[])), None);
    }

    #[test]
    fn test_height_mismatch() {
        let errors = validate_formula_size(&formula(30.0, 10.0, &[5.0, 15.0], &[4.0, 6.0])).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["height"], "Height 30 does not match v-spans sum 20");
    }

    #[test]
    fn test_both_mismatches() {
        let errors = validate_formula_size(&formula(30.0, 12.5, &[5.0], &[4.0])).unwrap();
        assert_eq!(errors["height"], "Height 30 does not match v-spans sum 5");
        assert_eq!(errors["width"], "Width 12.5 does not match h-spans sum 4");
    }

    #[test]
    fn test_sums_compare_exactly() {
        let errors = validate_formula_size(&formula(0.3, 1.0, &[0.1, 0.2], &[1.0])).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["height"], "Height 0.3 does not match v-spans sum 0.30000000000000004");

        assert_eq!(validate_formula_size(&formula(0.75, 1.0, &[0.25, 0.5], &[1.0])), None);
    }
}
