use codlayout_core::{ParsingError, ParsingErrorKind};

/// Marker replacing the first `//` of a pair (opens a text group)
const GROUP_OPEN: [char; 2] = ['|', ' '];
/// Marker replacing the second `//` of a pair (closes a text group)
const GROUP_CLOSE: [char; 2] = ['/', ' '];

fn is_token_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_whitespace() || c == '/',
    }
}

/// Preprocess a BO formula before parsing.
///
/// A standalone `-` becomes `0`, and the `//` pairs become `| ` and `/ `
/// alternately. The result has the same number of characters as the
/// input, so that positions found in it are valid for the input too.
pub fn preprocess_formula(text: &str) -> Result<String, ParsingError> {
    let mut chars: Vec<char> = text.chars().collect();

    for i in 0..chars.len() {
        if chars[i] != '-' {
            continue;
        }
        let prev = if i == 0 { None } else { Some(chars[i - 1]) };
        let next = chars.get(i + 1).copied();
        if is_token_boundary(prev) && is_token_boundary(next) {
            chars[i] = '0';
        }
    }

    let mut delimiters = Vec::new();
    let mut i = 0;
    while i + 1 < chars.len() {
        if chars[i] == '/' && chars[i + 1] == '/' {
            delimiters.push(i);
            i += 2;
        } else {
            i += 1;
        }
    }

    if delimiters.len() % 2 != 0 {
        return Err(ParsingError::new(
            ParsingErrorKind::MalformedDelimiters,
            "Odd number of '//' in formula",
            text,
        ));
    }

    for (n, &at) in delimiters.iter().enumerate() {
        let marker = if n % 2 == 0 { GROUP_OPEN } else { GROUP_CLOSE };
        chars[at..at + 2].copy_from_slice(&marker);
    }

    Ok(chars.into_iter().collect())
}
