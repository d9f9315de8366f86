use std::env;

use codlayout_formula::Dialect;

use crate::error::CliError;

/// Defaults read from the environment (and `.env`), overridden by flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Dialect used when `--dialect` is not given
    pub dialect: Dialect,
    /// Log filter directives, as accepted by `RUST_LOG`
    pub log: String,
    /// Pretty print JSON output
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: Dialect::Bo,
            log: "warn".to_string(),
            pretty: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let dialect = match lookup("CODLAYOUT_DIALECT") {
            Some(value) => value.parse()?,
            None => defaults.dialect,
        };
        let log = lookup("CODLAYOUT_LOG").unwrap_or(defaults.log);
        let pretty = match lookup("CODLAYOUT_PRETTY") {
            Some(value) => parse_flag("CODLAYOUT_PRETTY", &value)?,
            None => defaults.pretty,
        };

        Ok(Self {
            dialect,
            log,
            pretty,
        })
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, CliError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(CliError::InvalidSetting {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, CliError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]).unwrap(), Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("CODLAYOUT_DIALECT", "it"),
            ("CODLAYOUT_LOG", "codlayout_formula=trace"),
            ("CODLAYOUT_PRETTY", "yes"),
        ])
        .unwrap();
        assert_eq!(config.dialect, Dialect::It);
        assert_eq!(config.log, "codlayout_formula=trace");
        assert!(config.pretty);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[("CODLAYOUT_DIALECT", "FR")]),
            Err(CliError::Dialect(_))
        ));
        assert!(matches!(
            config(&[("CODLAYOUT_PRETTY", "maybe")]),
            Err(CliError::InvalidSetting { name: "CODLAYOUT_PRETTY", .. })
        ));
    }
}
