use codlayout_core::{format_number, LayoutFormula, LayoutSpan, LayoutValue};

fn append_value(sb: &mut String, value: &LayoutValue) {
    let original = value.is_original();
    if original && value.value == 0.0 && value.label.is_none() {
        sb.push('-');
    } else if original {
        sb.push_str(&format_number(value.value));
    } else {
        sb.push('(');
        sb.push_str(&format_number(value.value));
        sb.push(')');
    }

    if let Some(original_value) = value.original_value {
        sb.push_str(" [");
        sb.push_str(&format_number(original_value));
        sb.push(']');
    }
    if let Some(label) = &value.label {
        sb.push(':');
        sb.push_str(label);
    }
}

/// Append spans, wrapping each run of text spans in `//`
fn append_spans<'a>(sb: &mut String, spans: impl Iterator<Item = &'a LayoutSpan>) {
    let mut prev_text: Option<bool> = None;

    for span in spans {
        let is_text = span.is_text();
        let divider = match (prev_text, is_text) {
            (None, true) => "// ",
            (None, false) => "",
            (Some(true), true) => " | ",
            (Some(false), false) => " / ",
            _ => " // ",
        };
        sb.push_str(divider);
        append_value(sb, &span.as_value());
        prev_text = Some(is_text);
    }

    if prev_text == Some(true) {
        sb.push_str(" //");
    }
}

/// Build the text of a BO formula
pub fn build_formula(formula: &LayoutFormula) -> String {
    let mut sb = String::new();

    sb.push_str(formula.unit.as_str());
    sb.push(' ');

    append_value(&mut sb, &formula.height);
    sb.push_str(" x ");
    append_value(&mut sb, &formula.width);

    sb.push_str(" = ");
    append_spans(&mut sb, formula.vertical_spans());
    sb.push_str(" x ");
    append_spans(&mut sb, formula.horizontal_spans());

    sb
}
