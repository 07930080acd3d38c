//! # attrmark Editor
//!
//! Live decorations for a text editor showing `{...}` annotations.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host: SyntaxBuffer + edit/selection events  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ engine: LiveDecorations                     │
//! │  - DecorationBuilder scans visible tokens   │
//! │  - cache shares decorations by raw text     │
//! │  - DecorationState remaps and filters       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ host renderer: marks + replaces             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use attrmark_editor::{LiveDecorations, MemoryBuffer, Selection, SyntaxBuffer};
//!
//! let buffer = MemoryBuffer::new("Hello {.note}");
//! let mut engine = LiveDecorations::default();
//! engine.viewport_changed(&buffer, vec![0..buffer.len()]);
//! assert_eq!(engine.replaces().len(), 1);
//!
//! // Caret inside the braces shows the raw text
//! engine.selection_changed(&buffer, Selection::cursor(9));
//! assert!(engine.replaces().is_empty());
//! ```

pub mod buffer;
pub mod builder;
pub mod changes;
pub mod engine;
pub mod errors;
pub mod selection;
pub mod state;

pub use buffer::{MemoryBuffer, SyntaxBuffer, SyntaxToken, CODE_BLOCK_TAG};
pub use builder::{
    BuilderOptions, Decoration, DecorationBuilder, DecorationRange, RevealScope,
    DEFAULT_CACHE_CAPACITY,
};
pub use changes::{Assoc, Change, ChangeSet};
pub use engine::{EngineOptions, LiveDecorations, RebuildMode};
pub use errors::{BufferError, ChangeError, EditorError};
pub use selection::{Selection, SelectionRange};
pub use state::{filter_by_selection, replace_all, DecorationSet, DecorationState, Transaction};
