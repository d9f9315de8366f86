pub mod config;
pub mod error;

use std::io::{self, Read};

use clap::{Parser, Subcommand};
use codlayout_formula::{AreaColors, Dialect, LayoutFormula, LayoutFormulaService};
use serde::Serialize;

pub use crate::config::Config;
pub use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "codlayout")]
#[command(version)]
#[command(about = "Parse, build, convert and validate codicological layout formulas", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Formula dialect, BO or IT (defaults to CODLAYOUT_DIALECT, then BO)
    #[arg(short, long, global = true)]
    pub dialect: Option<Dialect>,

    /// Pretty print JSON output
    #[arg(short, long, global = true)]
    pub pretty: bool,
}

/// Every command reads its formula (or model) from the argument, or from
/// stdin when the argument is omitted
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a formula and print its model as JSON
    Parse { formula: Option<String> },

    /// Build the formula text of a JSON model
    Build { model: Option<String> },

    /// Rewrite a formula in another dialect
    Convert {
        formula: Option<String>,

        /// Target dialect
        #[arg(long)]
        to: Dialect,
    },

    /// Check syntax and sizes; exits with status 1 when invalid
    Validate { formula: Option<String> },

    /// Print the grid areas of a formula as JSON
    Areas {
        formula: Option<String>,

        /// Keep the areas matching `@y_x`, `row_`, `_col` or `row_col`
        #[arg(short, long)]
        filter: Option<String>,

        /// JSON object of area names to colors; prints the colors per `@y_x` key
        #[arg(short, long)]
        colors: Option<String>,
    },

    /// Print the given labels which the formula uses
    Labels {
        formula: Option<String>,

        #[arg(short, long = "label", required = true)]
        labels: Vec<String>,
    },
}

impl Command {
    fn input(&self) -> Option<&str> {
        match self {
            Command::Parse { formula }
            | Command::Convert { formula, .. }
            | Command::Validate { formula }
            | Command::Areas { formula, .. }
            | Command::Labels { formula, .. } => formula.as_deref(),
            Command::Build { model } => model.as_deref(),
        }
    }
}

/// Text to print and whether the command succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub success: bool,
}

impl Output {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Run the command line with the given configuration
pub fn run(cli: Cli, config: &Config) -> Result<Output, CliError> {
    let dialect = cli.dialect.unwrap_or(config.dialect);
    let pretty = cli.pretty || config.pretty;
    let input = read_input(&cli.command)?;
    tracing::debug!("running {:?} with dialect {}", cli.command, dialect);
    execute(&cli.command, dialect, pretty, &input)
}

fn read_input(command: &Command) -> Result<String, CliError> {
    let text = match command.input() {
        Some(text) => text.to_string(),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    check_input(command, &text)
}

/// Trim the input; only `validate` accepts a blank formula
fn check_input(command: &Command, text: &str) -> Result<String, CliError> {
    let text = text.trim();
    if text.is_empty() && !matches!(command, Command::Validate { .. }) {
        return Err(CliError::EmptyInput);
    }
    Ok(text.to_string())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn parse(service: &dyn LayoutFormulaService, text: &str) -> Result<LayoutFormula, CliError> {
    service.parse_formula(text)?.ok_or(CliError::EmptyInput)
}

/// Execute a command on already read input
pub fn execute(
    command: &Command,
    dialect: Dialect,
    pretty: bool,
    input: &str,
) -> Result<Output, CliError> {
    let service = dialect.service();

    match command {
        Command::Parse { .. } => {
            let formula = parse(service.as_ref(), input)?;
            Ok(Output::ok(to_json(&formula, pretty)?))
        }
        Command::Build { .. } => {
            let formula: LayoutFormula = serde_json::from_str(input)?;
            Ok(Output::ok(service.build_formula(&formula)))
        }
        Command::Convert { to, .. } => {
            let formula = parse(service.as_ref(), input)?;
            Ok(Output::ok(to.service().build_formula(&formula)))
        }
        Command::Validate { .. } => match service.validate_formula(input) {
            None => Ok(Output::ok("valid".to_string())),
            Some(errors) => {
                let text = errors
                    .iter()
                    .map(|(field, message)| format!("{}: {}", field, message))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(Output {
                    text,
                    success: false,
                })
            }
        },
        Command::Areas { filter, colors, .. } => {
            let formula = parse(service.as_ref(), input)?;
            let mut areas = service.get_areas(&formula.spans);
            if let Some(name) = filter {
                areas = service.filter_areas(name, &areas);
            }
            match colors {
                Some(colors) => {
                    let colors: AreaColors = serde_json::from_str(colors)?;
                    Ok(Output::ok(to_json(&service.map_area_colors(&areas, &colors), pretty)?))
                }
                None => Ok(Output::ok(to_json(&areas, pretty)?)),
            }
        }
        Command::Labels { labels, .. } => {
            let found = service.filter_formula_labels(input.into(), labels);
            Ok(Output::ok(found.join("\n")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BO: &str = "20 x 10 = 4 // 10 // 6 x 2 // 7 // 1";
    const IT: &str = "200 × 160 = 30 [130] 40 × 15 [60 (10) 60] 15";

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("codlayout").chain(args.iter().copied())).unwrap()
    }

    fn exec(args: &[&str], input: &str) -> Result<Output, CliError> {
        let cli = cli(args);
        execute(
            &cli.command,
            cli.dialect.unwrap_or_default(),
            cli.pretty,
            input,
        )
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = cli(&["parse", "--dialect", "it", "-p", IT]);
        assert_eq!(cli.dialect, Some(Dialect::It));
        assert!(cli.pretty);
        assert_eq!(cli.command.input(), Some(IT));
    }

    #[test]
    fn test_parse_then_build() {
        let parsed = exec(&["parse"], BO).unwrap();
        let model: serde_json::Value = serde_json::from_str(&parsed.text).unwrap();
        assert_eq!(model["type"], "BO");
        assert_eq!(model["spans"].as_array().map(Vec::len), Some(6));

        let built = exec(&["build"], &parsed.text).unwrap();
        assert_eq!(built.text, "mm 20 x 10 = 4 // 10 // 6 x 2 // 7 // 1");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = exec(&["parse"], "20 x 10 = 5 // 10 / 15").unwrap_err();
        assert!(matches!(err, CliError::Parse(_)));
        assert_eq!(err.to_string(), "Odd number of '//' in formula");
    }

    #[test]
    fn test_convert_it_to_bo() {
        let output = exec(&["-d", "IT", "convert", "--to", "BO"], IT).unwrap();
        let bo = Dialect::Bo
            .service()
            .parse_formula(&output.text)
            .unwrap()
            .unwrap();
        let values: Vec<f64> = bo.spans.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![30.0, 130.0, 40.0, 15.0, 60.0, 10.0, 60.0, 15.0]);
        assert_eq!(bo.find_span("col-1-gap").map(|s| s.value), Some(10.0));
    }

    #[test]
    fn test_validate() {
        assert_eq!(exec(&["validate"], BO).unwrap(), Output::ok("valid".to_string()));

        let invalid = exec(&["-d", "it", "validate"], "210 × 150 = 30 [130] 40 × 15 [60 (10) 60] 15").unwrap();
        assert!(!invalid.success);
        assert_eq!(
            invalid.text,
            "height: Height 210 does not match v-spans sum 200\nwidth: Width 150 does not match h-spans sum 160"
        );
    }

    #[test]
    fn test_areas_filter_and_colors() {
        let text = exec(&["areas", "--filter", "$text_$text"], BO).unwrap();
        let areas: serde_json::Value = serde_json::from_str(&text.text).unwrap();
        assert_eq!(areas.as_array().map(Vec::len), Some(1));
        assert_eq!(areas[0]["y"], 2);
        assert_eq!(areas[0]["x"], 2);

        let colors = exec(&["areas", "--colors", r##"{"$text_$text": "red"}"##], BO).unwrap();
        assert_eq!(colors.text, r#"{"@2_2":"red"}"#);
    }

    #[test]
    fn test_labels() {
        let output = exec(
            &["-d", "it", "labels", "-l", "col-1-gap", "-l", "head-w", "-l", "margin-top"],
            IT,
        )
        .unwrap();
        assert_eq!(output.text, "col-1-gap\nmargin-top");
    }

    #[test]
    fn test_blank_input() {
        let validate = cli(&["validate"]).command;
        let input = check_input(&validate, "  \n").unwrap();
        assert_eq!(
            execute(&validate, Dialect::Bo, false, &input).unwrap(),
            Output::ok("valid".to_string())
        );

        let parse = cli(&["parse"]).command;
        assert!(matches!(check_input(&parse, " "), Err(CliError::EmptyInput)));
        assert_eq!(check_input(&parse, " 20 x 10 \n").unwrap(), "20 x 10");
    }

    #[test]
    fn test_build_rejects_bad_json() {
        assert!(matches!(exec(&["build"], "{"), Err(CliError::Json(_))));
    }
}
