//! Brace scanner
//!
//! Every entry point shares one body grammar for an annotation that opens at
//! a `{`:
//!
//! - the body runs to the first brace or newline, and must end on `}`
//! - an optional `:` and optional spaces may lead the body
//! - what remains must be non-empty and must not start with a space
//!
//! If the colon form leaves nothing, the colon itself is taken as the first
//! character (`{:}` has inner text `:`). Trailing spaces are not part of the
//! inner text.
//!
//! The entry points differ only in where a match may sit:
//!
//! | function             | position                                        |
//! |----------------------|-------------------------------------------------|
//! | [`scan_line`]        | ends a line, one per line, all lines            |
//! | [`scan_block_trailer`] | last line (modulo trailing whitespace), alone |
//! | [`probe_contains`]   | anywhere                                        |
//! | [`probe_whole`]      | the entire text                                 |

use crate::annotation::AnnotationMatch;
use std::ops::Range;

/// Match the annotation opening at byte `start`.
///
/// Returns the range of the whole annotation and the range of its inner text.
fn match_at(text: &str, start: usize) -> Option<(Range<usize>, Range<usize>)> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let body = start + 1;
    let close = body
        + bytes[body..]
            .iter()
            .position(|&b| matches!(b, b'{' | b'}' | b'\n'))?;
    if bytes[close] != b'}' {
        return None;
    }

    let inner = inner_range(bytes, body, close)?;
    Some((start..close + 1, inner))
}

fn inner_range(bytes: &[u8], from: usize, to: usize) -> Option<Range<usize>> {
    let skip_spaces = |mut i: usize| {
        while i < to && bytes[i] == b' ' {
            i += 1;
        }
        i
    };

    let after_colon = if from < to && bytes[from] == b':' {
        Some(skip_spaces(from + 1)).filter(|&i| i < to)
    } else {
        None
    };

    let start = match after_colon {
        Some(i) => i,
        None => Some(skip_spaces(from)).filter(|&i| i < to)?,
    };

    let mut end = to;
    while end > start + 1 && bytes[end - 1] == b' ' {
        end -= 1;
    }

    Some(start..end)
}

fn build(text: &str, (span, inner): (Range<usize>, Range<usize>)) -> AnnotationMatch {
    AnnotationMatch::from_ranges(text, span, inner)
}

/// Lines of `text` with their byte offset, without the line terminator
fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split('\n').map(move |line| {
        let start = offset;
        offset += line.len() + 1;
        (start, line.strip_suffix('\r').unwrap_or(line))
    })
}

/// Find the annotation that ends each line.
pub fn scan_line(text: &str) -> Vec<AnnotationMatch> {
    let mut matches = Vec::new();

    for (offset, line) in lines_with_offsets(text) {
        if !line.ends_with('}') {
            continue;
        }
        let line_end = offset + line.len();

        let found = line
            .match_indices('{')
            .filter_map(|(i, _)| match_at(text, offset + i))
            .find(|(span, _)| span.end == line_end);

        if let Some(ranges) = found {
            matches.push(build(text, ranges));
        }
    }

    matches
}

/// Find an annotation standing alone on the last line of a multi-line text.
///
/// Trailing whitespace after the annotation is ignored; the annotation must
/// directly follow a newline.
pub fn scan_block_trailer(text: &str) -> Option<AnnotationMatch> {
    let trimmed = text.trim_end();
    let start = trimmed.rfind('\n')? + 1;

    match_at(text, start)
        .filter(|(span, _)| span.end == trimmed.len())
        .map(|ranges| build(text, ranges))
}

/// Leftmost annotation anywhere in `text`
pub fn find_first(text: &str) -> Option<AnnotationMatch> {
    text.match_indices('{')
        .find_map(|(i, _)| match_at(text, i))
        .map(|ranges| build(text, ranges))
}

/// Does `text` contain an annotation anywhere?
pub fn probe_contains(text: &str) -> bool {
    text.match_indices('{')
        .any(|(i, _)| match_at(text, i).is_some())
}

/// The annotation that makes up all of `text`
pub fn parse_whole(text: &str) -> Option<AnnotationMatch> {
    match_at(text, 0)
        .filter(|(span, _)| span.end == text.len())
        .map(|ranges| build(text, ranges))
}

/// Is `text` exactly one annotation?
pub fn probe_whole(text: &str) -> bool {
    matches!(match_at(text, 0), Some((span, _)) if span.end == text.len())
}
