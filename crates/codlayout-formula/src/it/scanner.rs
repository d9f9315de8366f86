/// Character scanner over a whitespace-free IT formula
pub struct Scanner<'a> {
    input: &'a [char],
    position: usize,
}

/// `x`, `X` or `×`
pub fn is_size_separator(c: char) -> bool {
    matches!(c, 'x' | 'X' | '×')
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a [char]) -> Self {
        Self { input, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        self.position += 1;
        c
    }

    /// Consume `expected` if it is the next char
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub fn eat_if(&mut self, pred: impl Fn(char) -> bool) -> bool {
        match self.peek() {
            Some(c) if pred(c) => {
                self.position += 1;
                true
            }
            _ => false,
        }
    }

    /// Read an unsigned number: digits with an optional decimal part
    pub fn number(&mut self) -> Option<f64> {
        let start = self.position;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.position == start {
            return None;
        }
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text: String = self.input[start..self.position].iter().collect();
        parse_finite(&text)
    }

    /// Skip to the next digit, returning false at the end of input
    pub fn skip_to_digit(&mut self) -> bool {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                return true;
            }
            self.advance();
        }
        false
    }
}

/// Find the number ending the input: returns its start and value
pub fn trailing_number(input: &[char]) -> Option<(usize, f64)> {
    let digits_before = |end: usize| {
        input[..end]
            .iter()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .count()
    };

    let end = input.len();
    let mut start = end - digits_before(end);
    if start == end {
        return None;
    }
    if start >= 2 && input[start - 1] == '.' {
        let int_digits = digits_before(start - 1);
        if int_digits > 0 {
            start = start - 1 - int_digits;
        }
    }

    let text: String = input[start..end].iter().collect();
    parse_finite(&text).map(|n| (start, n))
}

/// Digit runs too long for an `f64` are not numbers
fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}
