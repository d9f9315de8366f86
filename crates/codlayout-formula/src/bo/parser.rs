//! Nom-based parser for BO formulas.
//!
//! The formula is first preprocessed (see `preprocess_formula`), then split
//! into its sections: `[unit ]H x W = vSpans x hSpans`. Dimensions are parsed
//! with nom combinators.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{all_consuming, map_opt, opt, recognize, value},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

use codlayout_core::{
    LayoutFormula, LayoutSpan, LayoutValue, ParsingError, ParsingErrorKind, Unit,
};

use super::preprocess::preprocess_formula;
use super::BO_FORMULA_TYPE;

// =============================================================================
// Combinators
// =============================================================================

/// Leading unit followed by whitespace
fn unit_prefix(input: &str) -> IResult<&str, Unit> {
    terminated(
        alt((
            value(Unit::Mm, tag("mm")),
            value(Unit::Cm, tag("cm")),
            value(Unit::In, tag("in")),
        )),
        multispace1,
    )(input)
}

/// Unsigned decimal number: `12` or `12.5`. Digit runs too long for an
/// `f64` are rejected.
fn number(input: &str) -> IResult<&str, f64> {
    map_opt(recognize(pair(digit1, opt(pair(char('.'), digit1)))), |s: &str| {
        s.parse::<f64>().ok().filter(|n| n.is_finite())
    })(input)
}

/// Dimension: `N`, `(N)`, `(N) [N]`, each optionally followed by `:label`
fn dimension(input: &str) -> IResult<&str, LayoutValue> {
    let (input, open) = opt(char('('))(input)?;
    let (input, n) = number(input)?;
    let (input, _) = opt(char(')'))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, original) = opt(delimited(char('['), number, char(']')))(input)?;
    let (input, label) = opt(preceded(char(':'), take_till1(char::is_whitespace)))(input)?;

    let mut dim = LayoutValue::new(n);
    dim.is_original = Some(open.is_none());
    if let Some(original) = original {
        dim = dim.with_original_value(original);
    }
    if let Some(label) = label {
        dim = dim.with_label(label);
    }
    Ok((input, dim))
}

fn whole_dimension(input: &str) -> IResult<&str, LayoutValue> {
    all_consuming(delimited(multispace0, dimension, multispace0))(input)
}

// =============================================================================
// Parser
// =============================================================================

/// Find the first ` x ` or ` × ` separator, returning its byte range
fn find_x(text: &str) -> Option<(usize, usize)> {
    [" x ", " × "]
        .iter()
        .filter_map(|sep| text.find(sep).map(|i| (i, i + sep.len())))
        .min_by_key(|(start, _)| *start)
}

/// Section parser over a preprocessed formula.
///
/// All offsets handled internally are byte offsets into `text`; errors
/// report character offsets.
struct BoParser<'a> {
    input: &'a str,
    text: &'a str,
}

impl<'a> BoParser<'a> {
    fn chars_before(&self, byte: usize) -> usize {
        self.text[..byte].chars().count()
    }

    fn error(&self, kind: ParsingErrorKind, message: impl Into<String>, start: usize, end: usize) -> ParsingError {
        let index = self.chars_before(start);
        let length = self.text[start..end].chars().count();
        ParsingError::at(kind, message, self.input, index, length)
    }

    /// Parse a dimension found at byte `start` of the text
    fn dimension(&self, start: usize, end: usize) -> Result<LayoutValue, ParsingError> {
        let raw = &self.text[start..end];
        match whole_dimension(raw) {
            Ok((_, dim)) => Ok(dim),
            Err(_) => {
                let lead = raw.len() - raw.trim_start().len();
                let trimmed = raw.trim();
                Err(self.error(
                    ParsingErrorKind::InvalidDimension,
                    format!("Invalid dimension: {}", trimmed),
                    start + lead,
                    start + lead + trimmed.len(),
                ))
            }
        }
    }

    fn parse(&self) -> Result<LayoutFormula, ParsingError> {
        let mut formula = LayoutFormula::new(BO_FORMULA_TYPE);
        let end = self.text.len();

        // unit
        let mut offset = 0;
        if let Ok((rest, unit)) = unit_prefix(self.text) {
            formula.unit = unit;
            offset = end - rest.len();
        }

        // size
        let eq = match self.text[offset..].find('=') {
            Some(i) => offset + i,
            None => {
                return Err(self.error(
                    ParsingErrorKind::MissingSeparator,
                    "Invalid formula (expecting =)",
                    offset,
                    end,
                ))
            }
        };
        let (height, width) = self.size(offset, eq)?;
        formula.height = height;
        formula.width = width;

        // vertical spans
        let spans_start = eq + 1;
        let (x_start, x_end) = match find_x(&self.text[spans_start..]) {
            Some((s, e)) => (spans_start + s, spans_start + e),
            None => {
                return Err(self.error(
                    ParsingErrorKind::MissingSeparator,
                    "Invalid formula (expecting x or ×)",
                    spans_start,
                    end,
                ))
            }
        };
        formula.spans = self.spans(spans_start, x_start, false)?;

        // horizontal spans
        let h_spans = self.spans(x_end, end, true)?;
        if h_spans.is_empty() {
            return Err(self.error(
                ParsingErrorKind::MissingSpans,
                "Invalid formula (expecting horizontal spans)",
                x_end,
                end,
            ));
        }
        formula.spans.extend(h_spans);

        Ok(formula)
    }

    /// Parse `H x W`; labels on the size are accepted and dropped
    fn size(&self, start: usize, end: usize) -> Result<(LayoutValue, LayoutValue), ParsingError> {
        let (x_start, x_end) = match find_x(&self.text[start..end]) {
            Some((s, e)) => (start + s, start + e),
            None => {
                return Err(self.error(
                    ParsingErrorKind::InvalidSizeFormat,
                    "Invalid size format",
                    start,
                    end,
                ))
            }
        };

        let mut height = self.dimension(start, x_start)?;
        let mut width = self.dimension(x_end, end)?;
        height.label = None;
        width.label = None;
        Ok((height, width))
    }

    /// Parse a list of spans divided by `/` or `|`. A span preceded by `|`
    /// is a text span. Empty tokens are skipped.
    fn spans(&self, start: usize, end: usize, horizontal: bool) -> Result<Vec<LayoutSpan>, ParsingError> {
        let section = &self.text[start..end];
        let mut spans = Vec::new();

        let mut is_text = false;
        let mut token_start = 0;
        for (i, c) in section.char_indices().chain(std::iter::once((section.len(), '/'))) {
            if c != '/' && c != '|' {
                continue;
            }
            let token = &section[token_start..i];
            if !token.trim().is_empty() {
                let dim = self.dimension(start + token_start, start + i)?;
                let span = LayoutSpan::from_value(dim, horizontal);
                spans.push(if is_text { span.text() } else { span });
            }
            is_text = c == '|';
            token_start = i + c.len_utf8();
        }

        Ok(spans)
    }
}

/// Parse a BO formula. Blank text yields `Ok(None)`.
pub fn parse_formula(text: &str) -> Result<Option<LayoutFormula>, ParsingError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let preprocessed = preprocess_formula(text)?;
    let parser = BoParser {
        input: text,
        text: &preprocessed,
    };
    parser.parse().map(Some)
}
