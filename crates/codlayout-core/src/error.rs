use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What went wrong while parsing a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParsingErrorKind {
    /// Odd number of `//` group delimiters
    MalformedDelimiters,
    /// Missing `=` or `x`/`×` separator
    MissingSeparator,
    /// No horizontal spans after the last separator
    MissingSpans,
    InvalidDimension,
    InvalidSizeFormat,
    InvalidHeightFormat,
    MissingMargins,
    TooManyNumbersInColumn,
    AmbiguousColumnValues,
    NoWidthInColumn,
    EmptyColumn,
}

/// Error raised when a formula text cannot be parsed.
///
/// `index` and `length` are character offsets into the normalized input
/// the parser worked on, so that editors can highlight the offending text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ParsingError {
    pub kind: ParsingErrorKind,
    pub message: String,
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

impl ParsingError {
    /// Create an error without position data
    pub fn new(kind: ParsingErrorKind, message: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            input: input.into(),
            index: None,
            length: None,
        }
    }

    /// Create an error locating `length` characters at `index`
    pub fn at(
        kind: ParsingErrorKind,
        message: impl Into<String>,
        input: impl Into<String>,
        index: usize,
        length: usize,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            input: input.into(),
            index: Some(index),
            length: Some(length),
        }
    }
}
