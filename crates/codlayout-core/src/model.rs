use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Span type marking an area designed to contain written text
pub const TEXT_SPAN_TYPE: &str = "text";

/// Unit of measure for all dimensions of a formula
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Mm,
    Cm,
    In,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::In => "in",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mm" => Ok(Unit::Mm),
            "cm" => Ok(Unit::Cm),
            "in" => Ok(Unit::In),
            other => Err(format!("Unknown unit: {}", other)),
        }
    }
}

/// Format a number the way it is written in formulas and messages
/// (integers without a decimal part).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// A measured dimension, optionally paired with its historically attested original
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutValue {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_original: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl LayoutValue {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    /// A value known to be the original one
    pub fn original(value: f64) -> Self {
        Self {
            value,
            is_original: Some(true),
            ..Default::default()
        }
    }

    /// A current value that differs from the attested `original_value`.
    /// Setting an original value always clears `is_original`.
    pub fn with_original_value(mut self, original_value: f64) -> Self {
        self.original_value = Some(original_value);
        self.is_original = None;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether the value is flagged as original. An attested original value
    /// overrides the flag.
    pub fn is_original(&self) -> bool {
        self.original_value.is_none() && self.is_original.unwrap_or(false)
    }
}

/// One measurement along the height (vertical) or width (horizontal) axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSpan {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_original: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub span_type: Option<String>,
    #[serde(default)]
    pub is_horizontal: bool,
}

impl LayoutSpan {
    pub fn vertical(value: f64) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    pub fn horizontal(value: f64) -> Self {
        Self {
            value,
            is_horizontal: true,
            ..Default::default()
        }
    }

    /// Build a span on the given axis from a parsed dimension
    pub fn from_value(value: LayoutValue, is_horizontal: bool) -> Self {
        Self {
            value: value.value,
            is_original: value.is_original,
            original_value: value.original_value,
            label: value.label,
            span_type: None,
            is_horizontal,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_type(mut self, span_type: impl Into<String>) -> Self {
        self.span_type = Some(span_type.into());
        self
    }

    /// Mark the span as a text area
    pub fn text(self) -> Self {
        self.with_type(TEXT_SPAN_TYPE)
    }

    pub fn is_text(&self) -> bool {
        self.span_type.as_deref() == Some(TEXT_SPAN_TYPE)
    }

    pub fn is_original(&self) -> bool {
        self.original_value.is_none() && self.is_original.unwrap_or(false)
    }

    /// The dimension part of the span
    pub fn as_value(&self) -> LayoutValue {
        LayoutValue {
            value: self.value,
            is_original: self.is_original,
            original_value: self.original_value,
            label: self.label.clone(),
        }
    }
}

/// A parsed layout formula.
///
/// `spans` holds all vertical spans (top to bottom) followed by all
/// horizontal spans (left to right). The declared `height` and `width`
/// are not required to match the span sums; see `validate_formula_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFormula {
    #[serde(rename = "type")]
    pub formula_type: String,
    #[serde(default)]
    pub unit: Unit,
    pub height: LayoutValue,
    pub width: LayoutValue,
    #[serde(default)]
    pub spans: Vec<LayoutSpan>,
}

impl LayoutFormula {
    pub fn new(formula_type: impl Into<String>) -> Self {
        Self {
            formula_type: formula_type.into(),
            unit: Unit::Mm,
            height: LayoutValue::default(),
            width: LayoutValue::default(),
            spans: Vec::new(),
        }
    }

    /// Spans measured along the height, in top-to-bottom order
    pub fn vertical_spans(&self) -> impl Iterator<Item = &LayoutSpan> {
        self.spans.iter().filter(|s| !s.is_horizontal)
    }

    /// Spans measured along the width, in left-to-right order
    pub fn horizontal_spans(&self) -> impl Iterator<Item = &LayoutSpan> {
        self.spans.iter().filter(|s| s.is_horizontal)
    }

    /// Find the first span carrying the given label
    pub fn find_span(&self, label: &str) -> Option<&LayoutSpan> {
        self.spans.iter().find(|s| s.label.as_deref() == Some(label))
    }

    /// Labels of height, width and spans, in that order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.height
            .label
            .iter()
            .chain(self.width.label.iter())
            .chain(self.spans.iter().filter_map(|s| s.label.as_ref()))
            .map(String::as_str)
    }
}
