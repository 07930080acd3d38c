//! Error types for the live decoration engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    #[error("Change error: {0}")]
    Change(#[from] ChangeError),
}

/// Failures reading from a host buffer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Range {from}..{to} is outside the document (length {len})")]
    OutOfBounds { from: usize, to: usize, len: usize },

    #[error("Offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },

    #[error("Syntax tokenizer failed: {0}")]
    Tokenizer(String),
}

/// Invalid change sets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangeError {
    #[error("Change {from}..{to} is inverted")]
    Inverted { from: usize, to: usize },

    #[error("Change at {at} overlaps or precedes the previous change")]
    OutOfOrder { at: usize },

    #[error("Change {from}..{to} runs past the end of the document (length {len})")]
    BeyondDocument { from: usize, to: usize, len: usize },
}
