use codlayout_core::{format_number, LayoutFormula, LayoutSpan};

use super::labels::{ColumnRole, ItLabel};

const REQUIRED_LABELS: [ItLabel; 5] = [
    ItLabel::MarginTop,
    ItLabel::AreaHeight,
    ItLabel::MarginBottom,
    ItLabel::MarginLeft,
    ItLabel::MarginRight,
];

/// Spans of a formula looked up by their IT label
struct LabeledSpans<'a> {
    formula: &'a LayoutFormula,
}

impl<'a> LabeledSpans<'a> {
    fn get(&self, label: ItLabel) -> Option<&'a LayoutSpan> {
        let name = label.to_string();
        let horizontal = matches!(
            label,
            ItLabel::MarginLeft | ItLabel::MarginRight | ItLabel::Column { .. }
        );
        self.formula
            .spans
            .iter()
            .find(|s| s.is_horizontal == horizontal && s.label.as_deref() == Some(name.as_str()))
    }

    fn value(&self, label: ItLabel) -> Option<String> {
        self.get(label).map(|s| format_number(s.value))
    }

    /// A column margin, with `*` when it is empty
    fn margin(&self, index: usize, written: ColumnRole, empty: ColumnRole) -> Option<String> {
        [written, empty].into_iter().find_map(|role| {
            self.get(ItLabel::column(index, role)).map(|s| {
                let marker = if role.is_empty_margin() { "*" } else { "" };
                format!("{}{}", format_number(s.value), marker)
            })
        })
    }
}

fn build_height(sb: &mut String, spans: &LabeledSpans<'_>) {
    if let Some(mt) = spans.value(ItLabel::MarginTop) {
        sb.push_str(&mt);
    }
    if let Some(he) = spans.value(ItLabel::HeadE) {
        sb.push_str(" / ");
        sb.push_str(&he);
    }

    sb.push_str(" [");
    if let Some(hw) = spans.value(ItLabel::HeadW) {
        sb.push_str(&hw);
        sb.push_str(" / ");
    }
    if let Some(ah) = spans.value(ItLabel::AreaHeight) {
        sb.push_str(&ah);
    }
    if let Some(fw) = spans.value(ItLabel::FootW) {
        sb.push_str(" / ");
        sb.push_str(&fw);
    }
    sb.push(']');

    if let Some(fe) = spans.value(ItLabel::FootE) {
        sb.push(' ');
        sb.push_str(&fe);
        sb.push_str(" /");
    }
    if let Some(mb) = spans.value(ItLabel::MarginBottom) {
        sb.push(' ');
        sb.push_str(&mb);
    }
}

fn build_width(sb: &mut String, spans: &LabeledSpans<'_>) {
    if let Some(ml) = spans.value(ItLabel::MarginLeft) {
        sb.push_str(&ml);
        sb.push(' ');
    }

    sb.push('[');
    let mut index = 1;
    while let Some(width) = spans.value(ItLabel::column(index, ColumnRole::Width)) {
        let parts: Vec<String> = [
            spans.margin(index, ColumnRole::LeftW, ColumnRole::LeftE),
            Some(width),
            spans.margin(index, ColumnRole::RightW, ColumnRole::RightE),
        ]
        .into_iter()
        .flatten()
        .collect();
        sb.push_str(&parts.join(" / "));

        if let Some(gap) = spans.value(ItLabel::column(index, ColumnRole::Gap)) {
            sb.push_str(" (");
            sb.push_str(&gap);
            sb.push_str(") ");
        }
        index += 1;
    }
    sb.push(']');

    if let Some(mr) = spans.value(ItLabel::MarginRight) {
        sb.push(' ');
        sb.push_str(&mr);
    }
}

/// Build the text of an IT formula from the labels of its spans.
///
/// Spans without an IT label are ignored. Empty column margins are
/// marked with `*` so that the result reads back the same way.
pub fn build_formula(formula: &LayoutFormula) -> String {
    let spans = LabeledSpans { formula };

    let missing: Vec<String> = REQUIRED_LABELS
        .iter()
        .filter(|label| spans.get(**label).is_none())
        .map(|label| label.to_string())
        .collect();
    if !missing.is_empty() {
        tracing::warn!("building IT formula without {}", missing.join(", "));
    }

    let mut sb = format!(
        "{} × {} = ",
        format_number(formula.height.value),
        format_number(formula.width.value)
    );
    build_height(&mut sb, &spans);
    sb.push_str(" × ");
    build_width(&mut sb, &spans);
    sb
}

#[cfg(test)]
mod tests {
    use super::*;
    use codlayout_core::LayoutValue;

    fn v(value: f64, label: &str) -> LayoutSpan {
        LayoutSpan::vertical(value).with_label(label)
    }

    fn h(value: f64, label: &str) -> LayoutSpan {
        LayoutSpan::horizontal(value).with_label(label)
    }

    fn formula(spans: Vec<LayoutSpan>) -> LayoutFormula {
        let mut formula = LayoutFormula::new("IT");
        formula.height = LayoutValue::new(250.0);
        formula.width = LayoutValue::new(160.0);
        formula.spans = spans;
        formula
    }

    #[test]
    fn test_build_full() {
        let f = formula(vec![
            v(30.0, "margin-top"),
            v(5.0, "head-e"),
            v(170.0, "area-height").text(),
            v(5.0, "foot-w").text(),
            v(40.0, "margin-bottom"),
            h(15.0, "margin-left"),
            h(3.0, "col-1-left-w").text(),
            h(50.0, "col-1-width").text(),
            h(5.0, "col-1-right-w").text(),
            h(15.0, "margin-right"),
        ]);
        assert_eq!(
            build_formula(&f),
            "250 × 160 = 30 / 5 [170 / 5] 40 × 15 [3 / 50 / 5] 15"
        );
    }

    #[test]
    fn test_build_head_and_foot_empty() {
        let f = formula(vec![
            v(30.0, "margin-top"),
            v(5.0, "head-w").text(),
            v(170.0, "area-height").text(),
            v(5.0, "foot-e"),
            v(40.0, "margin-bottom"),
            h(15.0, "margin-left"),
            h(130.0, "col-1-width").text(),
            h(15.0, "margin-right"),
        ]);
        assert_eq!(
            build_formula(&f),
            "250 × 160 = 30 [5 / 170] 5 / 40 × 15 [130] 15"
        );
    }

    #[test]
    fn test_build_columns_with_gaps_and_empty_margins() {
        let f = formula(vec![
            v(30.0, "margin-top"),
            v(180.0, "area-height").text(),
            v(40.0, "margin-bottom"),
            h(15.0, "margin-left"),
            h(60.0, "col-1-width").text(),
            h(5.0, "col-1-right-e"),
            h(10.0, "col-1-gap"),
            h(5.0, "col-2-left-e"),
            h(50.0, "col-2-width").text(),
            h(15.0, "margin-right"),
        ]);
        assert_eq!(
            build_formula(&f),
            "250 × 160 = 30 [180] 40 × 15 [60 / 5* (10) 5* / 50] 15"
        );
    }

    #[test]
    fn test_build_ignores_unlabeled_spans() {
        let f = formula(vec![
            v(30.0, "margin-top"),
            v(180.0, "area-height"),
            LayoutSpan::vertical(3.0),
            v(40.0, "margin-bottom"),
            h(15.0, "margin-left"),
            h(130.0, "col-1-width"),
            LayoutSpan::horizontal(1.0).with_label("initials"),
            h(15.0, "margin-right"),
        ]);
        assert_eq!(build_formula(&f), "250 × 160 = 30 [180] 40 × 15 [130] 15");
    }

    #[test]
    fn test_build_missing_labels() {
        let f = formula(vec![v(180.0, "area-height"), h(130.0, "col-1-width")]);
        assert_eq!(build_formula(&f), "250 × 160 =  [180] × [130]");
    }
}
