//! # Tree Applier
//!
//! Walks a rendered element tree and moves every annotation from the text
//! onto the element it belongs to.
//!
//! ## Placement
//!
//! Each element is visited once, depth first, pre-order. Only the element's
//! *own* text (direct text children) is scanned; nested elements are scanned
//! when they are visited.
//!
//! - **Block**: the own text ends with an annotation on a line of its own.
//!   List items, children of a blockquote and callouts hand the annotation to
//!   their parent.
//! - **Inline**: an annotation anywhere in a text child. It goes to the
//!   element right before that text node, or to the current element when
//!   there is none.
//!
//! Code blocks are opaque: their content is never scanned.
//!
//! ## Failure
//!
//! If the host rejects any attribute of a match, the match is abandoned:
//! attributes already written stay, but the annotation text is left in place
//! so the author can see it.

use crate::tree::{DocumentTree, ElementKind, ElementMarkers};
use attrmark_parser::{
    find_first, scan_block_trailer, AnnotationMatch, AttributeError, AttributeResult,
};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, info, instrument, warn};

/// Value written for presence attributes (`{checked}`)
pub const PRESENCE_VALUE: &str = "true";

/// How an annotation found its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    /// Trailing line of a block
    Block,
    /// Inside a run of text
    Inline,
    /// Recovered from the source section of a block the renderer dropped it from
    Section,
}

/// An annotation together with the element it was applied to
#[derive(Debug, Clone, PartialEq)]
pub struct TargetBinding<N> {
    pub annotation: AnnotationMatch,
    pub target: N,
    /// Text node the annotation was stripped from (none for section annotations)
    pub text_node: Option<N>,
    pub placement: Placement,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplierOptions {
    pub markers: ElementMarkers,
}

/// Applies annotations found in a tree's text to its elements
#[derive(Debug, Clone, Default)]
pub struct Applier {
    options: ApplierOptions,
}

impl Applier {
    pub fn new(options: ApplierOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ApplierOptions {
        &self.options
    }

    pub(crate) fn classify<T: DocumentTree>(&self, tree: &T, node: T::NodeId) -> Option<ElementKind> {
        ElementKind::classify(tree, node, &self.options.markers)
    }

    /// Apply every annotation under `root`, mutating the tree in place.
    ///
    /// Returns the bindings that were applied; rejected matches are logged
    /// and left out.
    #[instrument(skip_all)]
    pub fn apply<T: DocumentTree>(&self, tree: &mut T, root: T::NodeId) -> Vec<TargetBinding<T::NodeId>> {
        let mut applied = Vec::new();
        self.visit(tree, root, &mut applied);
        info!(applied = applied.len(), "Annotations applied");
        applied
    }

    fn visit<T: DocumentTree>(
        &self,
        tree: &mut T,
        element: T::NodeId,
        applied: &mut Vec<TargetBinding<T::NodeId>>,
    ) {
        // Code never holds annotations, not even when handed in as the root
        if self.classify(tree, element) == Some(ElementKind::CodeBlock) {
            return;
        }

        self.scan_element(tree, element, applied);

        for child in tree.element_children(element) {
            if self.classify(tree, child) == Some(ElementKind::CodeBlock) {
                continue;
            }
            self.visit(tree, child, applied);
        }
    }

    fn scan_element<T: DocumentTree>(
        &self,
        tree: &mut T,
        element: T::NodeId,
        applied: &mut Vec<TargetBinding<T::NodeId>>,
    ) {
        let own_text = tree.own_text(element);
        if !own_text.contains('{') {
            return;
        }

        let kind = self.classify(tree, element);

        if let Some(annotation) = scan_block_trailer(&own_text) {
            let Some((text_node, range)) = locate_in_own_text(tree, element, &annotation.span) else {
                debug!(annotation = %annotation.raw, "Block annotation spans several text nodes; skipped");
                return;
            };

            let target = self.block_target(tree, element, kind);
            if let Some(binding) =
                commit(tree, annotation, target, Some((text_node, range)), Placement::Block)
            {
                applied.push(binding);

                // Stripping the trailer can expose inline annotations in the item
                if kind == Some(ElementKind::ListItem) {
                    self.scan_element(tree, element, applied);
                }
            }
            return;
        }

        let found = tree.children(element).into_iter().find_map(|child| {
            let annotation = find_first(tree.text(child)?)?;
            Some((child, annotation))
        });

        if let Some((text_node, annotation)) = found {
            let target = self.inline_target(tree, element, text_node);
            let range = annotation.span.clone();
            if let Some(binding) =
                commit(tree, annotation, target, Some((text_node, range)), Placement::Inline)
            {
                applied.push(binding);
            }
        }
    }

    fn block_target<T: DocumentTree>(
        &self,
        tree: &T,
        element: T::NodeId,
        kind: Option<ElementKind>,
    ) -> T::NodeId {
        let parent = tree.parent(element);
        let parent_is_quote = parent
            .map(|p| self.classify(tree, p) == Some(ElementKind::Blockquote))
            .unwrap_or(false);

        let retarget = matches!(kind, Some(ElementKind::ListItem) | Some(ElementKind::Callout))
            || parent_is_quote;

        match parent {
            Some(parent) if retarget => parent,
            _ => element,
        }
    }

    fn inline_target<T: DocumentTree>(
        &self,
        tree: &T,
        element: T::NodeId,
        text_node: T::NodeId,
    ) -> T::NodeId {
        let children = tree.children(element);
        let previous = children
            .iter()
            .position(|&c| c == text_node)
            .and_then(|i| i.checked_sub(1))
            .map(|i| children[i])
            .filter(|&prev| tree.is_element(prev));

        let Some(sibling) = previous else {
            return element;
        };

        match self.classify(tree, sibling) {
            Some(ElementKind::CollapseIndicator) | Some(ElementKind::LineBreak) => {
                tree.parent(sibling).unwrap_or(element)
            }
            _ => sibling,
        }
    }
}

/// Map a span of an element's own text to the text node that holds it
fn locate_in_own_text<T: DocumentTree>(
    tree: &T,
    element: T::NodeId,
    span: &Range<usize>,
) -> Option<(T::NodeId, Range<usize>)> {
    let mut offset = 0;
    for child in tree.children(element) {
        let Some(text) = tree.text(child) else {
            continue;
        };
        let end = offset + text.len();
        if span.start >= offset && span.end <= end {
            return Some((child, span.start - offset..span.end - offset));
        }
        offset = end;
    }
    None
}

/// Write an annotation's attributes to `target`.
///
/// Stops at the first rejection; earlier attributes stay written.
pub fn apply_attributes<T: DocumentTree>(
    tree: &mut T,
    target: T::NodeId,
    annotation: &AnnotationMatch,
) -> AttributeResult<()> {
    if annotation.attributes.is_empty() {
        return Err(AttributeError::empty(&annotation.raw));
    }

    for attribute in &annotation.attributes {
        if attribute.is_class() {
            let mut classes = attribute.class_names().peekable();
            if classes.peek().is_none() {
                return Err(AttributeError::invalid_class(
                    attribute.value.as_deref().unwrap_or(""),
                ));
            }
            for class in classes {
                tree.add_class(target, class)?;
            }
        } else {
            let value = attribute.value.as_deref().unwrap_or(PRESENCE_VALUE);
            tree.set_attribute(target, &attribute.key, value)?;
        }
    }

    Ok(())
}

/// Apply, then strip the annotation text; on rejection log and keep the text
pub(crate) fn commit<T: DocumentTree>(
    tree: &mut T,
    annotation: AnnotationMatch,
    target: T::NodeId,
    strip: Option<(T::NodeId, Range<usize>)>,
    placement: Placement,
) -> Option<TargetBinding<T::NodeId>> {
    if let Err(err) = apply_attributes(tree, target, &annotation) {
        warn!(
            annotation = %annotation.raw,
            error = %err,
            "Annotation rejected; leaving its text in place"
        );
        return None;
    }

    let text_node = strip.map(|(node, range)| {
        if let Some(text) = tree.text(node) {
            let stripped = format!("{}{}", &text[..range.start], &text[range.end..]);
            tree.set_text(node, stripped);
        }
        node
    });

    debug!(annotation = %annotation.raw, ?placement, ?target, "Annotation applied");

    Some(TargetBinding {
        annotation,
        target,
        text_node,
        placement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vdom::{VDocument, VNode};

    fn apply(root: VNode) -> (VDocument, Vec<TargetBinding<crate::NodeId>>) {
        let mut doc = VDocument::from_vnode(&root);
        let root = doc.root();
        let bindings = Applier::default().apply(&mut doc, root);
        (doc, bindings)
    }

    #[test]
    fn test_inline_on_paragraph() {
        let (doc, bindings) = apply(VNode::element("p").with_child(VNode::text("Hello {.note}")));

        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].placement, Placement::Inline);
        assert!(doc.has_class(doc.root(), "note"));
        assert_eq!(doc.text_content(doc.root()), "Hello ");
    }

    #[test]
    fn test_inline_targets_preceding_element() {
        let (doc, _) = apply(VNode::element("p").with_children(vec![
            VNode::text("Some "),
            VNode::element("strong").with_child(VNode::text("bold")),
            VNode::text("{.loud} text"),
        ]));

        let strong = doc.find_by_tag("strong")[0];
        assert!(doc.has_class(strong, "loud"));
        assert!(!doc.has_class(doc.root(), "loud"));
        assert_eq!(doc.to_html(), "<p>Some <strong class=\"loud\">bold</strong> text</p>");
    }

    #[test]
    fn test_line_break_sibling_walks_up() {
        let (doc, _) = apply(VNode::element("p").with_children(vec![
            VNode::text("line one"),
            VNode::element("br"),
            VNode::text("line two {.x}"),
        ]));

        assert!(doc.has_class(doc.root(), "x"));
        assert!(doc.classes(doc.find_by_tag("br")[0]).is_empty());
    }

    #[test]
    fn test_block_trailer_on_paragraph() {
        let (doc, bindings) =
            apply(VNode::element("p").with_child(VNode::text("Para text\n{: #intro .wide}")));

        assert_eq!(bindings[0].placement, Placement::Block);
        assert_eq!(doc.attribute(doc.root(), "id"), Some("intro"));
        assert!(doc.has_class(doc.root(), "wide"));
        assert_eq!(doc.text_content(doc.root()), "Para text\n");
    }

    #[test]
    fn test_block_trailer_in_blockquote_goes_to_quote() {
        let (doc, _) = apply(
            VNode::element("blockquote")
                .with_child(VNode::element("p").with_child(VNode::text("Quoted\n{.q}"))),
        );

        assert!(doc.has_class(doc.root(), "q"));
        assert!(doc.classes(doc.find_by_tag("p")[0]).is_empty());
    }

    #[test]
    fn test_callout_block_goes_to_parent() {
        let (doc, _) = apply(
            VNode::element("section").with_child(
                VNode::element("div")
                    .with_class("callout")
                    .with_child(VNode::text("Callout body\n{.tip}")),
            ),
        );

        assert!(doc.has_class(doc.root(), "tip"));
    }

    #[test]
    fn test_rejected_annotation_keeps_text() {
        let (doc, bindings) = apply(
            VNode::element("p").with_child(VNode::text("Hello {.ok 9lives}")),
        );

        assert!(bindings.is_empty());
        // Applied before the rejection
        assert!(doc.has_class(doc.root(), "ok"));
        assert_eq!(doc.text_content(doc.root()), "Hello {.ok 9lives}");
    }

    #[test]
    fn test_flag_and_key_value() {
        let (doc, _) = apply(
            VNode::element("p").with_child(VNode::text(r#"x {data-x="a b" checked}"#)),
        );

        assert_eq!(doc.attribute(doc.root(), "data-x"), Some("a b"));
        assert_eq!(doc.attribute(doc.root(), "checked"), Some(PRESENCE_VALUE));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let (doc, _) = apply(VNode::element("p").with_child(VNode::text("x {title=a title=b}")));
        assert_eq!(doc.attribute(doc.root(), "title"), Some("b"));
    }

    #[test]
    fn test_class_attribute_unions() {
        let (doc, _) = apply(
            VNode::element("p")
                .with_class("base")
                .with_child(VNode::text(r#"x {class="a b" .c}"#)),
        );
        assert_eq!(doc.classes(doc.root()), &["base", "a", "b", "c"]);
    }
}
