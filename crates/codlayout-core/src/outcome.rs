use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ParsingError;
use crate::model::LayoutFormula;

/// Tagged parse result for JSON consumers.
///
/// Exactly one of `result` and `error` is present. `result: null` means
/// that no input was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub result: Option<Option<LayoutFormula>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ParsingError>,
}

/// Distinguish an explicit `null` from a missing key
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ParseOutcome {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Convert back into the Rust result shape
    pub fn into_result(self) -> Result<Option<LayoutFormula>, ParsingError> {
        match (self.result, self.error) {
            (_, Some(error)) => Err(error),
            (Some(result), None) => Ok(result),
            (None, None) => Ok(None),
        }
    }
}

impl From<Result<Option<LayoutFormula>, ParsingError>> for ParseOutcome {
    fn from(result: Result<Option<LayoutFormula>, ParsingError>) -> Self {
        match result {
            Ok(formula) => ParseOutcome {
                result: Some(formula),
                error: None,
            },
            Err(error) => ParseOutcome {
                result: None,
                error: Some(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParsingErrorKind;

    #[test]
    fn test_no_input_serializes_null_result() {
        let outcome = ParseOutcome::from(Ok(None));
        assert_eq!(serde_json::to_string(&outcome).unwrap(), r#"{"result":null}"#);
    }

    #[test]
    fn test_error_serializes_without_result() {
        let err = ParsingError::new(ParsingErrorKind::MissingSeparator, "m", "i");
        let outcome = ParseOutcome::from(Err(err.clone()));
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("result").is_none());
        assert_eq!(json["error"]["message"], "m");
        assert_eq!(outcome.into_result(), Err(err));
    }

    #[test]
    fn test_null_result_deserializes_as_present() {
        let outcome: ParseOutcome = serde_json::from_str(r#"{"result":null}"#).unwrap();
        assert_eq!(outcome.result, Some(None));
        assert!(!outcome.is_error());
    }
}
