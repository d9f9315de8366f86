use std::ops::Range;

use codlayout_core::{LayoutFormula, LayoutSpan, LayoutValue, ParsingError, ParsingErrorKind};

use super::labels::{ColumnRole, ItLabel};
use super::scanner::{is_size_separator, trailing_number, Scanner};
use super::IT_FORMULA_TYPE;

/// The four sections of `H x W = height x width`
struct Sections {
    height: f64,
    width: f64,
    height_details: Range<usize>,
    width_details: Range<usize>,
}

/// A number read from a column, with the markers around it
#[derive(Debug, Clone, Copy)]
struct ColumnNumber {
    value: f64,
    /// Preceded by `]`
    after_close: bool,
    /// Followed by `*`
    starred: bool,
    /// Followed by `[` (after the optional `*`)
    before_open: bool,
}

fn span(value: f64, label: ItLabel, horizontal: bool) -> LayoutSpan {
    let span = LayoutSpan::from_value(LayoutValue::new(value), horizontal).with_label(label.to_string());
    if label.is_text() {
        span.text()
    } else {
        span
    }
}

fn column_span(value: f64, index: usize, role: ColumnRole) -> LayoutSpan {
    span(value, ItLabel::column(index, role), true)
}

/// Parser over the whitespace-free formula. Error positions are
/// character offsets into that normalized text.
struct ItParser {
    chars: Vec<char>,
    input: String,
}

impl ItParser {
    fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        let input = chars.iter().collect();
        Self { chars, input }
    }

    fn error(&self, kind: ParsingErrorKind, message: impl Into<String>, range: Range<usize>) -> ParsingError {
        ParsingError::at(kind, message, self.input.clone(), range.start, range.len())
    }

    fn parse(&self) -> Result<LayoutFormula, ParsingError> {
        let sections = self.sections().ok_or_else(|| {
            self.error(
                ParsingErrorKind::MissingSeparator,
                "Invalid formula (expected H x W = height x width)",
                0..self.chars.len(),
            )
        })?;

        let mut formula = LayoutFormula::new(IT_FORMULA_TYPE);
        formula.height = LayoutValue::new(sections.height);
        formula.width = LayoutValue::new(sections.width);
        formula.spans = self.height_spans(sections.height_details)?;
        formula.spans.extend(self.width_spans(sections.width_details)?);
        Ok(formula)
    }

    /// Split `H x W = height x width`; height details run up to the first
    /// size separator and neither details section may be empty.
    fn sections(&self) -> Option<Sections> {
        let mut scanner = Scanner::new(&self.chars);
        let height = scanner.number()?;
        if !scanner.eat_if(is_size_separator) {
            return None;
        }
        let width = scanner.number()?;
        if !scanner.eat('=') {
            return None;
        }

        let start = scanner.position();
        while matches!(scanner.peek(), Some(c) if !is_size_separator(c)) {
            scanner.advance();
        }
        let height_details = start..scanner.position();
        if height_details.is_empty() || !scanner.eat_if(is_size_separator) {
            return None;
        }

        let width_details = scanner.position()..self.chars.len();
        if width_details.is_empty() {
            return None;
        }

        Some(Sections {
            height,
            width,
            height_details,
            width_details,
        })
    }

    /// Height details: `mt[/he][[hw/]ah[/fw]][fe/]mb`
    fn height_spans(&self, range: Range<usize>) -> Result<Vec<LayoutSpan>, ParsingError> {
        let invalid = || self.error(ParsingErrorKind::InvalidHeightFormat, "Invalid height format", range.clone());
        let mut scanner = Scanner::new(&self.chars[range.clone()]);

        let mt = scanner.number().ok_or_else(invalid)?;
        let he = if scanner.eat('/') {
            Some(scanner.number().ok_or_else(invalid)?)
        } else {
            None
        };

        if !scanner.eat('[') {
            return Err(invalid());
        }
        let mut bracketed = vec![scanner.number().ok_or_else(invalid)?];
        while scanner.eat('/') {
            bracketed.push(scanner.number().ok_or_else(invalid)?);
        }
        if !scanner.eat(']') {
            return Err(invalid());
        }
        let (mut hw, mut ah, mut fw) = match bracketed[..] {
            [ah] => (None, ah, None),
            [hw, ah] => (Some(hw), ah, None),
            [hw, ah, fw] => (Some(hw), ah, Some(fw)),
            _ => return Err(invalid()),
        };

        let last = scanner.number().ok_or_else(invalid)?;
        let (fe, mb) = if scanner.eat('/') {
            (Some(last), scanner.number().ok_or_else(invalid)?)
        } else {
            (None, last)
        };
        if !scanner.is_at_end() {
            return Err(invalid());
        }

        // [hw/ah] and [ah/fw] read the same; a head taller than the area
        // means the pair is the area followed by the foot
        if let (Some(head), None) = (hw, fw) {
            if ah < head {
                tracing::trace!("IT height [{}/{}] read as area-height/foot-w", head, ah);
                fw = Some(ah);
                ah = head;
                hw = None;
            }
        }

        let mut spans = vec![span(mt, ItLabel::MarginTop, false)];
        spans.extend(he.map(|v| span(v, ItLabel::HeadE, false)));
        spans.extend(hw.map(|v| span(v, ItLabel::HeadW, false)));
        spans.push(span(ah, ItLabel::AreaHeight, false));
        spans.extend(fw.map(|v| span(v, ItLabel::FootW, false)));
        spans.extend(fe.map(|v| span(v, ItLabel::FootE, false)));
        spans.push(span(mb, ItLabel::MarginBottom, false));
        Ok(spans)
    }

    /// Width details: `ml [columns] mr`, columns divided by `(gap)`
    fn width_spans(&self, range: Range<usize>) -> Result<Vec<LayoutSpan>, ParsingError> {
        let text = &self.chars[range.clone()];
        let missing_margins =
            || self.error(ParsingErrorKind::MissingMargins, "Missing margins in width details", range.clone());

        let mut scanner = Scanner::new(text);
        let ml = scanner.number().ok_or_else(missing_margins)?;
        let ml_end = scanner.position();
        let (mr_start, mr) = trailing_number(text).ok_or_else(missing_margins)?;
        if mr_start < ml_end {
            return Err(missing_margins());
        }

        // columns, without a bracket pair wrapping them all
        let mut cols = ml_end..mr_start;
        let inner = &text[cols.clone()];
        if inner.first() == Some(&'[') && inner.iter().position(|&c| c == ']') == Some(inner.len() - 1) {
            cols = cols.start + 1..cols.end - 1;
        }
        let base = range.start;

        let mut spans = vec![span(ml, ItLabel::MarginLeft, true)];
        let mut index = 0;
        let mut start = cols.start;
        let mut i = cols.start;
        while i < cols.end {
            let Some((gap, gap_end)) = gap_at(&text[..cols.end], i) else {
                i += 1;
                continue;
            };
            index += 1;
            spans.extend(self.column_spans(text, start..i, base, index)?);
            spans.push(column_span(gap, index, ColumnRole::Gap));
            start = gap_end;
            i = gap_end;
        }
        if start < cols.end {
            index += 1;
            spans.extend(self.column_spans(text, start..cols.end, base, index)?);
        }
        if index == 0 {
            return Err(self.error(
                ParsingErrorKind::EmptyColumn,
                "Empty column 1",
                base + cols.start..base + cols.end,
            ));
        }

        spans.push(span(mr, ItLabel::MarginRight, true));
        Ok(spans)
    }

    /// Parse the column at `range` of the width details `text`
    fn column_spans(
        &self,
        text: &[char],
        range: Range<usize>,
        base: usize,
        index: usize,
    ) -> Result<Vec<LayoutSpan>, ParsingError> {
        let location = base + range.start..base + range.end;
        let col = &text[range];

        let mut numbers = Vec::new();
        let mut scanner = Scanner::new(col);
        while scanner.skip_to_digit() {
            let at = scanner.position();
            let after_close = at > 0 && col[at - 1] == ']';
            let Some(value) = scanner.number() else {
                break;
            };
            let starred = scanner.eat('*');
            let before_open = scanner.eat('[');
            numbers.push(ColumnNumber {
                value,
                after_close,
                starred,
                before_open,
            });
            if numbers.len() > 3 {
                return Err(self.error(
                    ParsingErrorKind::TooManyNumbersInColumn,
                    format!("Too many numbers in column {}", index),
                    location,
                ));
            }
        }

        let spans = match numbers[..] {
            [left, width, right] => {
                let left_role = if left.starred || left.before_open {
                    ColumnRole::LeftE
                } else {
                    ColumnRole::LeftW
                };
                let right_role = if right.starred || right.after_close {
                    ColumnRole::RightE
                } else {
                    ColumnRole::RightW
                };
                vec![
                    column_span(left.value, index, left_role),
                    column_span(width.value, index, ColumnRole::Width),
                    column_span(right.value, index, right_role),
                ]
            }
            [a, b] => self.two_number_column(a, b, index, location)?,
            [width] => vec![column_span(width.value, index, ColumnRole::Width)],
            _ => {
                return Err(self.error(
                    ParsingErrorKind::EmptyColumn,
                    format!("Empty column {}", index),
                    location,
                ))
            }
        };
        Ok(spans)
    }

    /// Two numbers are the width and one margin: a `*` marks the empty
    /// margin, otherwise the larger value is the width.
    fn two_number_column(
        &self,
        a: ColumnNumber,
        b: ColumnNumber,
        index: usize,
        location: Range<usize>,
    ) -> Result<Vec<LayoutSpan>, ParsingError> {
        let spans = match (a.starred, b.starred) {
            (true, true) => {
                return Err(self.error(
                    ParsingErrorKind::NoWidthInColumn,
                    format!("No width in column {}", index),
                    location,
                ))
            }
            (true, false) => vec![
                column_span(a.value, index, ColumnRole::LeftE),
                column_span(b.value, index, ColumnRole::Width),
            ],
            (false, true) => vec![
                column_span(a.value, index, ColumnRole::Width),
                column_span(b.value, index, ColumnRole::RightE),
            ],
            (false, false) => {
                if a.value == b.value {
                    return Err(self.error(
                        ParsingErrorKind::AmbiguousColumnValues,
                        format!("Ambiguous values for column {}", index),
                        location,
                    ));
                }
                if a.value > b.value {
                    let role = if b.after_close {
                        ColumnRole::RightE
                    } else {
                        ColumnRole::RightW
                    };
                    tracing::trace!("IT column {}: {} is the width, {} is {:?}", index, a.value, b.value, role);
                    vec![
                        column_span(a.value, index, ColumnRole::Width),
                        column_span(b.value, index, role),
                    ]
                } else {
                    let role = if a.before_open {
                        ColumnRole::LeftE
                    } else {
                        ColumnRole::LeftW
                    };
                    tracing::trace!("IT column {}: {} is {:?}, {} is the width", index, a.value, role, b.value);
                    vec![
                        column_span(a.value, index, role),
                        column_span(b.value, index, ColumnRole::Width),
                    ]
                }
            }
        };
        Ok(spans)
    }
}

/// Match a `(N)` gap at `at`, returning its value and end
fn gap_at(text: &[char], at: usize) -> Option<(f64, usize)> {
    if text.get(at) != Some(&'(') {
        return None;
    }
    let mut scanner = Scanner::new(&text[at + 1..]);
    let gap = scanner.number()?;
    if !scanner.eat(')') {
        return None;
    }
    Some((gap, at + 1 + scanner.position()))
}

/// Parse an IT formula. Whitespace is ignored; blank text yields `Ok(None)`.
pub fn parse_formula(text: &str) -> Result<Option<LayoutFormula>, ParsingError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    ItParser::new(text).parse().map(Some)
}
