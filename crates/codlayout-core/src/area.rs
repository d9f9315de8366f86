use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::LayoutSpan;

/// Ordered map from area name (or `@y_x` key) to color
pub type AreaColors = IndexMap<String, String>;

/// A grid cell formed by intersecting one vertical and one horizontal span.
///
/// `y` and `x` are 1-based. Row indexes come from the vertical span, column
/// indexes from the horizontal one: the span label (if any) followed by
/// `$` + span type (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutArea {
    pub y: usize,
    pub x: usize,
    pub row_indexes: Vec<String>,
    pub col_indexes: Vec<String>,
}

impl LayoutArea {
    /// The `@y_x` key of this area
    pub fn key(&self) -> String {
        format!("@{}_{}", self.y, self.x)
    }
}

fn span_indexes(span: &LayoutSpan) -> Vec<String> {
    let mut indexes = Vec::with_capacity(2);
    if let Some(label) = &span.label {
        indexes.push(label.clone());
    }
    if let Some(span_type) = &span.span_type {
        indexes.push(format!("${}", span_type));
    }
    indexes
}

/// Get all the areas defined by intersecting vertical and horizontal spans.
///
/// With 3 vertical spans (mt, text, mb) and 4 horizontal ones (ml, i, text, mr)
/// this yields 12 areas, row by row:
///
/// ```text
///            col 1     col 2    col 3        col 4
///  row 1:    mt_ml,    mt_i,    mt_$text,    mt_mr
///  row 2:    $text_ml, $text_i, $text_$text, $text_mr
///  row 3:    mb_ml,    mb_i,    mb_$text,    mb_mr
/// ```
pub fn get_areas(spans: &[LayoutSpan]) -> Vec<LayoutArea> {
    let cols: Vec<Vec<String>> = spans
        .iter()
        .filter(|s| s.is_horizontal)
        .map(span_indexes)
        .collect();

    let mut areas = Vec::new();
    for (v, row) in spans.iter().filter(|s| !s.is_horizontal).enumerate() {
        let row_indexes = span_indexes(row);
        for (h, col_indexes) in cols.iter().enumerate() {
            areas.push(LayoutArea {
                y: v + 1,
                x: h + 1,
                row_indexes: row_indexes.clone(),
                col_indexes: col_indexes.clone(),
            });
        }
    }
    areas
}

/// A parsed area name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaSelector {
    /// Empty name: every area
    All,
    /// `@y_x`
    Cell { y: usize, x: usize },
    /// `row_`
    Row(String),
    /// `_col`
    Column(String),
    /// `row_col`
    Intersection { row: String, col: String },
    /// A name that cannot address any area
    Invalid,
}

impl AreaSelector {
    pub fn parse(name: &str) -> Self {
        if name.is_empty() {
            return AreaSelector::All;
        }

        if let Some(cell) = name.strip_prefix('@') {
            return match cell.split_once('_') {
                Some((y, x)) => match (y.parse(), x.parse()) {
                    (Ok(y), Ok(x)) => AreaSelector::Cell { y, x },
                    _ => AreaSelector::Invalid,
                },
                None => AreaSelector::Invalid,
            };
        }

        if let Some(col) = name.strip_prefix('_') {
            return AreaSelector::Column(col.to_string());
        }

        if let Some(row) = name.strip_suffix('_') {
            return AreaSelector::Row(row.to_string());
        }

        match name.split_once('_') {
            Some((row, col)) => AreaSelector::Intersection {
                row: row.to_string(),
                col: col.to_string(),
            },
            None => AreaSelector::Invalid,
        }
    }

    pub fn matches(&self, area: &LayoutArea) -> bool {
        match self {
            AreaSelector::All => true,
            AreaSelector::Cell { y, x } => area.y == *y && area.x == *x,
            AreaSelector::Row(row) => area.row_indexes.iter().any(|r| r == row),
            AreaSelector::Column(col) => area.col_indexes.iter().any(|c| c == col),
            AreaSelector::Intersection { row, col } => {
                area.row_indexes.iter().any(|r| r == row)
                    && area.col_indexes.iter().any(|c| c == col)
            }
            AreaSelector::Invalid => false,
        }
    }
}

impl fmt::Display for AreaSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaSelector::All | AreaSelector::Invalid => Ok(()),
            AreaSelector::Cell { y, x } => write!(f, "@{}_{}", y, x),
            AreaSelector::Row(row) => write!(f, "{}_", row),
            AreaSelector::Column(col) => write!(f, "_{}", col),
            AreaSelector::Intersection { row, col } => write!(f, "{}_{}", row, col),
        }
    }
}

/// Filter areas by name: `@y_x`, `row_`, `_col` or `row_col`.
/// An empty name returns all the areas.
pub fn filter_areas(name: &str, areas: &[LayoutArea]) -> Vec<LayoutArea> {
    let selector = AreaSelector::parse(name);
    areas
        .iter()
        .filter(|a| selector.matches(a))
        .cloned()
        .collect()
}

/// Resolve colors keyed by any area name form into colors keyed by `@y_x`.
/// When several names match the same area, the last one wins.
pub fn map_area_colors(areas: &[LayoutArea], colors: &AreaColors) -> AreaColors {
    let mut map = AreaColors::new();
    for (name, color) in colors {
        for area in filter_areas(name, areas) {
            map.insert(area.key(), color.clone());
        }
    }
    map
}
