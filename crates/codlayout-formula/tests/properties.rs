//! Property-based tests for parsing, building and validating formulas
//!
//! - parsing is deterministic
//! - building then parsing a BO model gives the same model back
//! - IT formulas written without ambiguity survive a parse/build/parse cycle
//! - the area grid has one distinct cell per vertical/horizontal span pair
//! - size validation passes exactly when the spans add up

use codlayout_formula::{
    Dialect, LayoutFormula, LayoutFormulaService, LayoutSpan, LayoutValue, Unit,
};
use proptest::prelude::*;
use std::collections::HashSet;

/// Values with at most one decimal digit
fn value_strategy() -> impl Strategy<Value = f64> {
    (0u32..5000).prop_map(|n| n as f64 / 10.0)
}

fn label_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z][a-z0-9-]{0,7}")
}

/// A value flagged original, not original, or carrying its original value
fn dimension_strategy() -> impl Strategy<Value = LayoutValue> {
    prop_oneof![
        value_strategy().prop_map(LayoutValue::original),
        value_strategy().prop_map(|v| {
            let mut value = LayoutValue::new(v);
            value.is_original = Some(false);
            value
        }),
        (value_strategy(), value_strategy())
            .prop_map(|(v, o)| LayoutValue::new(v).with_original_value(o)),
    ]
}

fn span_strategy(horizontal: bool) -> impl Strategy<Value = LayoutSpan> {
    (dimension_strategy(), label_strategy(), any::<bool>()).prop_map(
        move |(mut value, label, is_text)| {
            value.label = label;
            let span = LayoutSpan::from_value(value, horizontal);
            if is_text {
                span.text()
            } else {
                span
            }
        },
    )
}

fn unit_strategy() -> impl Strategy<Value = Unit> {
    prop_oneof![Just(Unit::Mm), Just(Unit::Cm), Just(Unit::In)]
}

fn bo_formula_strategy() -> impl Strategy<Value = LayoutFormula> {
    (
        unit_strategy(),
        dimension_strategy(),
        dimension_strategy(),
        prop::collection::vec(span_strategy(false), 1..6),
        prop::collection::vec(span_strategy(true), 1..6),
    )
        .prop_map(|(unit, height, width, v_spans, h_spans)| {
            let mut formula = LayoutFormula::new("BO");
            formula.unit = unit;
            formula.height = height;
            formula.width = width;
            formula.spans = v_spans;
            formula.spans.extend(h_spans);
            formula
        })
}

fn margin() -> impl Strategy<Value = u32> {
    1u32..20
}

fn area() -> impl Strategy<Value = u32> {
    30u32..200
}

/// IT height details, keeping heads and feet smaller than the area
fn it_height_strategy() -> impl Strategy<Value = String> {
    let bracket = prop_oneof![
        area().prop_map(|ah| format!("[{}]", ah)),
        (margin(), area()).prop_map(|(hw, ah)| format!("[{} / {}]", hw, ah)),
        (area(), margin()).prop_map(|(ah, fw)| format!("[{} / {}]", ah, fw)),
        (margin(), area(), margin()).prop_map(|(hw, ah, fw)| format!("[{} / {} / {}]", hw, ah, fw)),
    ];
    (
        margin(),
        prop::option::of(margin()),
        bracket,
        prop::option::of(margin()),
        margin(),
    )
        .prop_map(|(mt, he, bracket, fe, mb)| {
            let he = he.map(|v| format!(" / {}", v)).unwrap_or_default();
            let fe = fe.map(|v| format!(" {} /", v)).unwrap_or_default();
            format!("{}{} {}{} {}", mt, he, bracket, fe, mb)
        })
}

/// One IT column; margins are always smaller than the width
fn it_column_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        area().prop_map(|w| w.to_string()),
        (margin(), area()).prop_map(|(l, w)| format!("{} / {}", l, w)),
        (margin(), area()).prop_map(|(l, w)| format!("{}* / {}", l, w)),
        (area(), margin()).prop_map(|(w, r)| format!("{} / {}", w, r)),
        (area(), margin()).prop_map(|(w, r)| format!("{} / {}*", w, r)),
        (margin(), area(), margin(), any::<bool>(), any::<bool>()).prop_map(
            |(l, w, r, le, re)| {
                format!(
                    "{}{} / {} / {}{}",
                    l,
                    if le { "*" } else { "" },
                    w,
                    r,
                    if re { "*" } else { "" }
                )
            }
        ),
    ]
}

fn it_width_strategy() -> impl Strategy<Value = String> {
    (
        margin(),
        prop::collection::vec((it_column_strategy(), margin()), 1..4),
        margin(),
    )
        .prop_map(|(ml, columns, mr)| {
            let last = columns.len() - 1;
            let body: Vec<String> = columns
                .into_iter()
                .enumerate()
                .map(|(i, (col, gap))| {
                    if i < last {
                        format!("{} ({}) ", col, gap)
                    } else {
                        col
                    }
                })
                .collect();
            format!("{} [{}] {}", ml, body.concat(), mr)
        })
}

fn it_formula_strategy() -> impl Strategy<Value = String> {
    (1u32..1000, 1u32..1000, it_height_strategy(), it_width_strategy())
        .prop_map(|(h, w, height, width)| format!("{} × {} = {} × {}", h, w, height, width))
}

fn parse(dialect: Dialect, text: &str) -> LayoutFormula {
    match dialect.service().parse_formula(text) {
        Ok(Some(formula)) => formula,
        other => panic!("{} did not parse: {:?}", text, other),
    }
}

proptest! {
    #[test]
    fn test_bo_build_then_parse_is_identity(formula in bo_formula_strategy()) {
        let service = Dialect::Bo.service();
        let text = service.build_formula(&formula);
        let parsed = parse(Dialect::Bo, &text);
        prop_assert_eq!(parsed, formula, "built: {}", text);
    }

    #[test]
    fn test_bo_parse_is_deterministic(formula in bo_formula_strategy()) {
        let text = Dialect::Bo.service().build_formula(&formula);
        prop_assert_eq!(parse(Dialect::Bo, &text), parse(Dialect::Bo, &text));
    }

    #[test]
    fn test_it_round_trip(text in it_formula_strategy()) {
        let service = Dialect::It.service();
        let first = parse(Dialect::It, &text);
        let built = service.build_formula(&first);
        let second = parse(Dialect::It, &built);
        prop_assert_eq!(first, second, "{} -> {}", text, built);
    }

    #[test]
    fn test_it_parse_is_deterministic(text in it_formula_strategy()) {
        prop_assert_eq!(parse(Dialect::It, &text), parse(Dialect::It, &text));
    }

    #[test]
    fn test_area_count(formula in bo_formula_strategy()) {
        let service = Dialect::Bo.service();
        let areas = service.get_areas(&formula.spans);
        let v = formula.vertical_spans().count();
        let h = formula.horizontal_spans().count();
        prop_assert_eq!(areas.len(), v * h);
        prop_assert_eq!(service.filter_areas("", &areas), areas.clone());
        for area in &areas {
            prop_assert!(area.y >= 1 && area.y <= v);
            prop_assert!(area.x >= 1 && area.x <= h);
        }
        let cells: HashSet<(usize, usize)> = areas.iter().map(|a| (a.y, a.x)).collect();
        prop_assert_eq!(cells.len(), v * h);
    }

    #[test]
    fn test_size_validation_law(formula in bo_formula_strategy(), extra in 1u32..100) {
        let service = Dialect::Bo.service();
        let mut formula = formula;
        let v_sum: f64 = formula.vertical_spans().map(|s| s.value).sum();
        let h_sum: f64 = formula.horizontal_spans().map(|s| s.value).sum();
        formula.height = LayoutValue::new(v_sum);
        formula.width = LayoutValue::new(h_sum);
        prop_assert_eq!(service.validate_formula_size(&formula), None);

        formula.height.value += extra as f64;
        let errors = service.validate_formula_size(&formula);
        prop_assert!(errors.is_some());
        let errors = errors.unwrap_or_default();
        prop_assert!(errors.contains_key("height"));
        prop_assert!(!errors.contains_key("width"));
    }
}
