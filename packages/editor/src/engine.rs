//! # Live Decorations
//!
//! Event entry point for a host editor. Every event updates the committed
//! decoration state right away; the rebuild either runs inline or waits for
//! the host to call [`LiveDecorations::flush`].

use crate::buffer::SyntaxBuffer;
use crate::builder::{BuilderOptions, DecorationBuilder};
use crate::changes::ChangeSet;
use crate::selection::Selection;
use crate::state::{DecorationSet, DecorationState, Transaction};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RebuildMode {
    /// Rebuild inside the event handler
    #[default]
    Immediate,
    /// Queue the rebuild until the next `flush`
    Deferred,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    #[serde(flatten)]
    pub builder: BuilderOptions,
    pub rebuild: RebuildMode,
}

/// Decorations for one live buffer
#[derive(Debug)]
pub struct LiveDecorations {
    builder: DecorationBuilder,
    state: DecorationState,
    rebuild: RebuildMode,
    visible: Vec<Range<usize>>,
    selection: Selection,
    pending: bool,
}

impl LiveDecorations {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            builder: DecorationBuilder::new(options.builder),
            state: DecorationState::new(),
            rebuild: options.rebuild,
            visible: Vec::new(),
            selection: Selection::default(),
            pending: false,
        }
    }

    pub fn marks(&self) -> &DecorationSet {
        self.state.marks()
    }

    pub fn replaces(&self) -> &DecorationSet {
        self.state.replaces()
    }

    pub fn visible(&self) -> &[Range<usize>] {
        &self.visible
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn has_pending_rebuild(&self) -> bool {
        self.pending
    }

    /// The buffer was edited; `buffer` already holds the new text
    pub fn document_changed<B: SyntaxBuffer + ?Sized>(
        &mut self,
        buffer: &B,
        changes: ChangeSet,
        selection: Selection,
    ) {
        debug!(changes = changes.changes().len(), "Document changed");

        let len = buffer.len();
        self.visible = self
            .visible
            .iter()
            .map(|range| {
                let mapped = changes.map_range_inclusive(range);
                mapped.start.min(len)..mapped.end.min(len)
            })
            .filter(|range| !range.is_empty())
            .collect();
        self.selection = selection;

        self.dispatch(buffer, changes);
    }

    pub fn viewport_changed<B: SyntaxBuffer + ?Sized>(
        &mut self,
        buffer: &B,
        visible: Vec<Range<usize>>,
    ) {
        debug!(ranges = visible.len(), "Viewport changed");
        self.visible = visible;
        self.dispatch(buffer, ChangeSet::empty(buffer.len()));
    }

    pub fn selection_changed<B: SyntaxBuffer + ?Sized>(&mut self, buffer: &B, selection: Selection) {
        self.selection = selection;
        self.dispatch(buffer, ChangeSet::empty(buffer.len()));
    }

    /// Run a queued rebuild, if any
    pub fn flush<B: SyntaxBuffer + ?Sized>(&mut self, buffer: &B) {
        if !self.pending {
            return;
        }
        self.pending = false;

        let built = self.builder.build_or_empty(buffer, &self.visible);
        let transaction = Transaction::new(ChangeSet::empty(buffer.len()), self.selection.clone())
            .with_rebuild(built);
        self.state.apply(&transaction);
    }

    fn dispatch<B: SyntaxBuffer + ?Sized>(&mut self, buffer: &B, changes: ChangeSet) {
        let mut transaction = Transaction::new(changes, self.selection.clone());

        match self.rebuild {
            RebuildMode::Immediate => {
                let built = self.builder.build_or_empty(buffer, &self.visible);
                transaction = transaction.with_rebuild(built);
            }
            // A queued rebuild reads the latest view when it runs
            RebuildMode::Deferred => self.pending = true,
        }

        self.state.apply(&transaction);
    }
}

impl Default for LiveDecorations {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}
