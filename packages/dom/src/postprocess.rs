//! Per-block post-processing
//!
//! Some annotations never reach the rendered tree: a code block keeps only its
//! language from the fence line, and a table or math block drops the line that
//! follows it. For those blocks the annotation is recovered from the block's
//! source section and applied straight to the block element.
//!
//! A paragraph that holds nothing but an annotation was a block annotation
//! line for the block above it, so it is detached.

use crate::applier::{commit, Applier, Placement, TargetBinding};
use crate::tree::{DocumentTree, ElementKind};
use attrmark_parser::{find_first, parse_whole, probe_contains, probe_whole};
use tracing::debug;

/// Where a rendered block came from in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    /// First source line of the block (0-based)
    pub line_start: usize,
    /// Last source line of the block (0-based, inclusive)
    pub line_end: usize,
    /// Full source text the lines index into
    pub text: String,
}

/// Host lookup from a rendered block back to its source section
pub trait SectionLookup<N> {
    fn section_info(&self, block: N) -> Option<SectionInfo>;
}

impl<N, F> SectionLookup<N> for F
where
    F: Fn(N) -> Option<SectionInfo>,
{
    fn section_info(&self, block: N) -> Option<SectionInfo> {
        self(block)
    }
}

/// What happened to one rendered block
#[derive(Debug, Clone, PartialEq)]
pub enum BlockOutcome<N> {
    /// Nothing to do
    Untouched,
    /// The block's paragraph was only an annotation and has been removed
    Detached(N),
    /// Annotations applied within the block
    Applied(Vec<TargetBinding<N>>),
}

impl Applier {
    /// Process one rendered top-level block (the wrapper of a single block
    /// element), recovering annotations from its source where needed.
    pub fn process_block<T, L>(
        &self,
        tree: &mut T,
        block: T::NodeId,
        lookup: &L,
    ) -> BlockOutcome<T::NodeId>
    where
        T: DocumentTree,
        L: SectionLookup<T::NodeId> + ?Sized,
    {
        let Some(child) = tree.element_children(block).into_iter().next() else {
            return BlockOutcome::Untouched;
        };

        let mut applied = Vec::new();

        match self.classify(tree, child) {
            Some(ElementKind::CodeBlock) => {
                let Some(info) = lookup.section_info(block) else {
                    return BlockOutcome::Untouched;
                };
                // Only the fence line can carry attributes
                let line = source_line(&info.text, info.line_start).unwrap_or("");
                if let Some(annotation) = find_first(line) {
                    applied.extend(commit(tree, annotation, child, None, Placement::Section));
                }
            }
            Some(ElementKind::Table) | Some(ElementKind::MathBlock) => {
                let Some(info) = lookup.section_info(block) else {
                    return BlockOutcome::Untouched;
                };
                let line = source_line(&info.text, info.line_end + 1)
                    .map(str::trim)
                    .unwrap_or("");
                if let Some(annotation) = parse_whole(line) {
                    applied.extend(commit(tree, annotation, child, None, Placement::Section));
                }
            }
            Some(ElementKind::Paragraph) if tree.element_children(child).is_empty() => {
                if probe_whole(tree.text_content(child).trim()) {
                    debug!("Paragraph holds only an annotation; detaching");
                    tree.detach(child);
                    return BlockOutcome::Detached(child);
                }
            }
            _ => {}
        }

        if probe_contains(&tree.text_content(block)) {
            applied.extend(self.apply(tree, child));
        }

        if applied.is_empty() {
            BlockOutcome::Untouched
        } else {
            BlockOutcome::Applied(applied)
        }
    }
}

fn source_line(text: &str, index: usize) -> Option<&str> {
    text.split('\n').nth(index)
}
