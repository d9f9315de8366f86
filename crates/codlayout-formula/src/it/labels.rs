use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Role of a span inside a column of the IT width details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    /// Gap after the column, before the next one
    Gap,
    /// Empty left margin of the column
    LeftE,
    /// Written left margin of the column
    LeftW,
    Width,
    /// Empty right margin of the column
    RightE,
    /// Written right margin of the column
    RightW,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Gap => "gap",
            ColumnRole::LeftE => "left-e",
            ColumnRole::LeftW => "left-w",
            ColumnRole::Width => "width",
            ColumnRole::RightE => "right-e",
            ColumnRole::RightW => "right-w",
        }
    }

    /// Whether a span with this role is part of the written area
    pub fn is_text(&self) -> bool {
        matches!(self, ColumnRole::LeftW | ColumnRole::Width | ColumnRole::RightW)
    }

    /// Whether this role is an empty margin, written with a `*` marker
    pub fn is_empty_margin(&self) -> bool {
        matches!(self, ColumnRole::LeftE | ColumnRole::RightE)
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "gap" => ColumnRole::Gap,
            "left-e" => ColumnRole::LeftE,
            "left-w" => ColumnRole::LeftW,
            "width" => ColumnRole::Width,
            "right-e" => ColumnRole::RightE,
            "right-w" => ColumnRole::RightW,
            _ => return None,
        })
    }
}

/// The closed set of labels used by IT formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItLabel {
    MarginTop,
    HeadE,
    HeadW,
    AreaHeight,
    FootW,
    FootE,
    MarginBottom,
    MarginLeft,
    MarginRight,
    /// `col-<index>-<role>`, with 1-based index
    Column { index: usize, role: ColumnRole },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid IT label: {0}")]
pub struct InvalidItLabel(pub String);

impl ItLabel {
    pub fn column(index: usize, role: ColumnRole) -> Self {
        ItLabel::Column { index, role }
    }

    /// Whether spans with this label are typed as text
    pub fn is_text(&self) -> bool {
        match self {
            ItLabel::HeadW | ItLabel::AreaHeight | ItLabel::FootW => true,
            ItLabel::Column { role, .. } => role.is_text(),
            _ => false,
        }
    }
}

impl fmt::Display for ItLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItLabel::MarginTop => "margin-top",
            ItLabel::HeadE => "head-e",
            ItLabel::HeadW => "head-w",
            ItLabel::AreaHeight => "area-height",
            ItLabel::FootW => "foot-w",
            ItLabel::FootE => "foot-e",
            ItLabel::MarginBottom => "margin-bottom",
            ItLabel::MarginLeft => "margin-left",
            ItLabel::MarginRight => "margin-right",
            ItLabel::Column { index, role } => {
                return write!(f, "col-{}-{}", index, role.as_str());
            }
        };
        f.write_str(name)
    }
}

impl FromStr for ItLabel {
    type Err = InvalidItLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = match s {
            "margin-top" => ItLabel::MarginTop,
            "head-e" => ItLabel::HeadE,
            "head-w" => ItLabel::HeadW,
            "area-height" => ItLabel::AreaHeight,
            "foot-w" => ItLabel::FootW,
            "foot-e" => ItLabel::FootE,
            "margin-bottom" => ItLabel::MarginBottom,
            "margin-left" => ItLabel::MarginLeft,
            "margin-right" => ItLabel::MarginRight,
            _ => return parse_column_label(s).ok_or_else(|| InvalidItLabel(s.to_string())),
        };
        Ok(label)
    }
}

// col-<N>-<role>, N without leading zeros
fn parse_column_label(s: &str) -> Option<ItLabel> {
    let rest = s.strip_prefix("col-")?;
    let (digits, role) = rest.split_once('-')?;
    if digits.is_empty() || digits.starts_with('0') || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let index = digits.parse().ok()?;
    let role = ColumnRole::from_name(role)?;
    Some(ItLabel::Column { index, role })
}
