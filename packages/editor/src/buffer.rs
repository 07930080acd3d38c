//! # Host Buffer
//!
//! The live engine reads the editable text through [`SyntaxBuffer`]: byte
//! slices plus the host's syntax tokens for a range, in document order.
//!
//! [`MemoryBuffer`] is a plain-string adapter. Its tokens are whole lines,
//! and lines inside fenced code blocks carry the `codeblock` tag.

use crate::changes::{Change, ChangeSet};
use crate::errors::{BufferError, EditorError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::Range;

/// Tag [`MemoryBuffer`] puts on lines inside a fenced code block
pub const CODE_BLOCK_TAG: &str = "codeblock";

/// A span of the buffer with the host's classification tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxToken {
    pub from: usize,
    pub to: usize,
    pub tags: Vec<String>,
}

impl SyntaxToken {
    pub fn new(from: usize, to: usize, tags: &[&str]) -> Self {
        Self {
            from,
            to,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }

    /// Does any tag contain any of the given markers?
    pub fn has_marker(&self, markers: &[String]) -> bool {
        self.tags
            .iter()
            .any(|tag| markers.iter().any(|marker| tag.contains(marker.as_str())))
    }
}

/// An editable text buffer with syntax tokens
pub trait SyntaxBuffer {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text of a byte range
    fn slice(&self, range: Range<usize>) -> Result<Cow<'_, str>, BufferError>;

    /// Tokens overlapping `range`, in document order
    fn syntax_tokens(&self, range: Range<usize>) -> Result<Vec<SyntaxToken>, BufferError>;
}

/// In-memory buffer tokenized per line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBuffer {
    text: String,
}

impl MemoryBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace `from..to` with `insert`, returning the change set to map
    /// decorations with
    pub fn replace(&mut self, from: usize, to: usize, insert: &str) -> Result<ChangeSet, EditorError> {
        let changes = ChangeSet::single(self.text.len(), Change::replace(from, to, insert.len()))?;
        self.check_boundary(from)?;
        self.check_boundary(to)?;

        self.text.replace_range(from..to, insert);
        Ok(changes)
    }

    pub fn insert(&mut self, at: usize, text: &str) -> Result<ChangeSet, EditorError> {
        self.replace(at, at, text)
    }

    pub fn delete(&mut self, from: usize, to: usize) -> Result<ChangeSet, EditorError> {
        self.replace(from, to, "")
    }

    fn check_boundary(&self, offset: usize) -> Result<(), BufferError> {
        if self.text.is_char_boundary(offset) {
            Ok(())
        } else {
            Err(BufferError::NotCharBoundary { offset })
        }
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), BufferError> {
        if range.start > range.end || range.end > self.text.len() {
            return Err(BufferError::OutOfBounds {
                from: range.start,
                to: range.end,
                len: self.text.len(),
            });
        }
        self.check_boundary(range.start)?;
        self.check_boundary(range.end)
    }
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

impl SyntaxBuffer for MemoryBuffer {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn slice(&self, range: Range<usize>) -> Result<Cow<'_, str>, BufferError> {
        self.check_range(&range)?;
        Ok(Cow::Borrowed(&self.text[range]))
    }

    fn syntax_tokens(&self, range: Range<usize>) -> Result<Vec<SyntaxToken>, BufferError> {
        self.check_range(&range)?;

        let mut tokens = Vec::new();
        let mut in_fence = false;
        let mut offset = 0;

        // Fence state depends on everything above, so scan from the top
        for line in self.text.split('\n') {
            let start = offset;
            let end = start + line.len();
            offset = end + 1;

            let fence = is_fence(line);
            let code = in_fence || fence;
            if fence {
                in_fence = !in_fence;
            }

            if end < range.start || line.is_empty() {
                continue;
            }
            if start > range.end {
                break;
            }

            let tags: &[&str] = if code { &["line", CODE_BLOCK_TAG] } else { &["line"] };
            tokens.push(SyntaxToken::new(start, end, tags));
        }

        Ok(tokens)
    }
}
