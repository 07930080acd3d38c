//! # Decoration Builder
//!
//! Scans the visible part of a buffer and produces two decorations per
//! annotation: a mark over the whole syntax token carrying the attributes,
//! and a replace over the `{...}` text that hides it.
//!
//! Decorations are shared through a cache keyed by the raw annotation text,
//! so rebuilding an unchanged view hands out the same `Rc`s again.

use crate::buffer::{SyntaxBuffer, CODE_BLOCK_TAG};
use crate::errors::BufferError;
use attrmark_parser::{scan_line, AnnotationMatch, Attribute};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;
use tracing::{debug, error, instrument};

pub const DEFAULT_CACHE_CAPACITY: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Decoration {
    /// Attributes applied to a span of text
    Mark { attributes: Vec<Attribute> },
    /// Hides the annotation text
    Replace { raw: String },
}

impl Decoration {
    pub fn is_mark(&self) -> bool {
        matches!(self, Decoration::Mark { .. })
    }

    pub fn is_replace(&self) -> bool {
        matches!(self, Decoration::Replace { .. })
    }
}

/// A decoration placed on the buffer.
///
/// `anchor` is the span a selection has to touch to reveal a replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationRange {
    pub from: usize,
    pub to: usize,
    pub anchor: Range<usize>,
    pub decoration: Rc<Decoration>,
}

impl DecorationRange {
    pub fn new(range: Range<usize>, anchor: Range<usize>, decoration: Rc<Decoration>) -> Self {
        Self {
            from: range.start,
            to: range.end,
            anchor,
            decoration,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }
}

/// What a selection has to touch to reveal hidden annotation text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevealScope {
    /// The `{...}` text itself
    #[default]
    Annotation,
    /// The whole syntax token the annotation ends
    Token,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuilderOptions {
    /// Tokens with a tag containing any of these are inside code
    pub code_markers: Vec<String>,
    /// Cache size above which entries unused by the last rebuild are dropped
    pub cache_capacity: usize,
    pub reveal: RevealScope,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            code_markers: vec![CODE_BLOCK_TAG.to_string()],
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            reveal: RevealScope::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    mark: Rc<Decoration>,
    replace: Rc<Decoration>,
    generation: u64,
}

/// Builds decorations for one buffer; owns that buffer's cache
#[derive(Debug, Default)]
pub struct DecorationBuilder {
    options: BuilderOptions,
    cache: HashMap<String, CacheEntry>,
    generation: u64,
}

impl DecorationBuilder {
    pub fn new(options: BuilderOptions) -> Self {
        Self {
            options,
            cache: HashMap::new(),
            generation: 0,
        }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Build decorations for the visible ranges, in document order.
    ///
    /// Nothing is returned unless the whole pass succeeds.
    #[instrument(skip_all, fields(ranges = visible.len()))]
    pub fn build<B: SyntaxBuffer + ?Sized>(
        &mut self,
        buffer: &B,
        visible: &[Range<usize>],
    ) -> Result<Vec<DecorationRange>, BufferError> {
        self.generation += 1;
        let mut built = Vec::new();

        for range in visible {
            for token in buffer.syntax_tokens(range.clone())? {
                if token.has_marker(&self.options.code_markers) {
                    continue;
                }

                let text = buffer.slice(token.range())?;
                if !text.contains('{') {
                    continue;
                }

                for annotation in scan_line(&text) {
                    if annotation.is_empty() {
                        debug!(raw = %annotation.raw, "Annotation without attributes; not decorated");
                        continue;
                    }

                    let span = annotation.span.start + token.from..annotation.span.end + token.from;
                    let anchor = match self.options.reveal {
                        RevealScope::Annotation => span.clone(),
                        RevealScope::Token => token.range(),
                    };
                    let entry = self.cached(&annotation);

                    built.push(DecorationRange::new(token.range(), token.range(), entry.mark));
                    built.push(DecorationRange::new(span, anchor, entry.replace));
                }
            }
        }

        self.evict();
        debug!(decorations = built.len(), cached = self.cache.len(), "Decorations built");
        Ok(built)
    }

    /// [`build`](Self::build), logging a failure and yielding nothing for
    /// this pass instead
    pub fn build_or_empty<B: SyntaxBuffer + ?Sized>(
        &mut self,
        buffer: &B,
        visible: &[Range<usize>],
    ) -> Vec<DecorationRange> {
        match self.build(buffer, visible) {
            Ok(built) => built,
            Err(err) => {
                error!(error = %err, "Failed to build decorations");
                Vec::new()
            }
        }
    }

    fn cached(&mut self, annotation: &AnnotationMatch) -> CacheEntry {
        let generation = self.generation;
        let entry = self
            .cache
            .entry(annotation.raw.clone())
            .or_insert_with(|| CacheEntry {
                mark: Rc::new(Decoration::Mark {
                    attributes: annotation.attributes.clone(),
                }),
                replace: Rc::new(Decoration::Replace {
                    raw: annotation.raw.clone(),
                }),
                generation,
            });
        entry.generation = generation;
        entry.clone()
    }

    fn evict(&mut self) {
        if self.cache.len() <= self.options.cache_capacity {
            return;
        }
        let generation = self.generation;
        let before = self.cache.len();
        self.cache.retain(|_, entry| entry.generation == generation);
        debug!(evicted = before - self.cache.len(), "Decoration cache trimmed");
    }
}
