//! Quote-aware splitting of an annotation's inner text
//!
//! Units are separated by whitespace, except whitespace inside a matching pair
//! of `"`, `'` or `` ` `` quotes:
//! ```text
//! .card data-x="a b" checked   →   [.card] [data-x="a b"] [checked]
//! ```
//! An unterminated quote runs to the end of the text.

use crate::annotation::AttributeToken;

const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Split `inner` into attribute tokens.
///
/// Returns `None` when the text is empty or nothing usable survives
/// (empty and quote-only fragments are dropped).
pub fn tokenize(inner: &str) -> Option<Vec<AttributeToken>> {
    if inner.trim().is_empty() {
        return None;
    }

    let tokens: Vec<AttributeToken> = split_units(inner)
        .into_iter()
        .map(str::trim)
        .filter(|unit| !unit.is_empty() && !unit.chars().all(is_quote))
        .map(classify)
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

fn is_quote(c: char) -> bool {
    QUOTES.contains(&c)
}

fn split_units(s: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if is_quote(c) => quote = Some(c),
            None if c.is_whitespace() => {
                units.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            None => {}
        }
    }
    units.push(&s[start..]);

    units
}

fn classify(unit: &str) -> AttributeToken {
    if let Some(name) = unit.strip_prefix('.') {
        return AttributeToken::Class {
            name: strip_quotes(name).to_string(),
        };
    }

    if let Some(name) = unit.strip_prefix('#') {
        return AttributeToken::Id {
            name: strip_quotes(name).to_string(),
        };
    }

    match unit.find('=') {
        Some(eq) if eq > 0 => AttributeToken::KeyValue {
            key: unit[..eq].to_string(),
            value: strip_quotes(&unit[eq + 1..]).to_string(),
        },
        _ => AttributeToken::Flag {
            name: unit.to_string(),
        },
    }
}

/// Remove one pair of matching surrounding quotes
pub fn strip_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && is_quote(first) => {
            &value[first.len_utf8()..value.len() - last.len_utf8()]
        }
        _ => value,
    }
}
