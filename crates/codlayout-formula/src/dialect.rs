use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::bo::BoLayoutFormulaService;
use crate::it::ItLayoutFormulaService;
use crate::service::LayoutFormulaService;

/// The textual notations available for layout formulas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Dialect {
    #[default]
    Bo,
    It,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown formula dialect: {0}")]
pub struct UnknownDialect(pub String);

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Bo, Dialect::It];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Bo => "BO",
            Dialect::It => "IT",
        }
    }

    /// The service implementing this dialect
    pub fn service(&self) -> Box<dyn LayoutFormulaService> {
        match self {
            Dialect::Bo => Box::new(BoLayoutFormulaService::new()),
            Dialect::It => Box::new(ItLayoutFormulaService::new()),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDialect(s.to_string()))
    }
}
