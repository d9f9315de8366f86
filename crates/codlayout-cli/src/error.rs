use codlayout_formula::{ParsingError, UnknownDialect};
use thiserror::Error;

/// Command line error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Dialect(#[from] UnknownDialect),

    #[error("{}", describe(.0))]
    Parse(#[from] ParsingError),

    #[error("No formula given")]
    EmptyInput,

    #[error("Invalid value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },
}

/// Message followed by a caret line under the offending characters
fn describe(err: &ParsingError) -> String {
    match (err.index, err.length) {
        (Some(index), Some(length)) => format!(
            "{}\n  {}\n  {}{}",
            err.message,
            err.input,
            " ".repeat(index),
            "^".repeat(length.max(1))
        ),
        _ => err.message.clone(),
    }
}
