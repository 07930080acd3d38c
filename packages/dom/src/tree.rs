//! Host tree contract
//!
//! The applier never builds nodes. It only reads structure, mutates classes,
//! attributes and text, and detaches nodes, through [`DocumentTree`].

use attrmark_parser::AttributeResult;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A rendered element tree that annotations can be applied to
pub trait DocumentTree {
    type NodeId: Copy + Eq + Debug;

    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// Child nodes in document order, text and elements alike
    fn children(&self, node: Self::NodeId) -> Vec<Self::NodeId>;

    /// Content of a text node, `None` for elements
    fn text(&self, node: Self::NodeId) -> Option<&str>;

    /// Lowercase tag name of an element, `None` for text nodes
    fn tag_name(&self, node: Self::NodeId) -> Option<&str>;

    fn has_class(&self, node: Self::NodeId, class: &str) -> bool;

    fn add_class(&mut self, node: Self::NodeId, class: &str) -> AttributeResult<()>;

    fn set_attribute(&mut self, node: Self::NodeId, name: &str, value: &str) -> AttributeResult<()>;

    /// Replace the content of a text node; elements are left alone
    fn set_text(&mut self, node: Self::NodeId, text: String);

    /// Remove a node from its parent
    fn detach(&mut self, node: Self::NodeId);

    fn is_element(&self, node: Self::NodeId) -> bool {
        self.tag_name(node).is_some()
    }

    /// Concatenated text of the direct text children only
    fn own_text(&self, node: Self::NodeId) -> String {
        self.children(node)
            .into_iter()
            .filter_map(|child| self.text(child).map(str::to_string))
            .collect()
    }

    /// Concatenated text of every descendant text node
    fn text_content(&self, node: Self::NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text.to_string();
        }
        self.children(node)
            .into_iter()
            .map(|child| self.text_content(child))
            .collect()
    }

    /// Element children only
    fn element_children(&self, node: Self::NodeId) -> Vec<Self::NodeId> {
        self.children(node)
            .into_iter()
            .filter(|&child| self.is_element(child))
            .collect()
    }
}

/// Marker classes a host uses for elements that aren't told apart by tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementMarkers {
    pub callout: String,
    pub collapse_indicator: String,
    /// Every one of these classes must be present on a math block
    pub math_block: Vec<String>,
}

impl Default for ElementMarkers {
    fn default() -> Self {
        Self {
            callout: "callout".to_string(),
            collapse_indicator: "collapse-indicator".to_string(),
            math_block: vec!["math".to_string(), "math-block".to_string()],
        }
    }
}

/// What an element is, as far as annotation placement cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    ListItem,
    Blockquote,
    Callout,
    CodeBlock,
    Table,
    MathBlock,
    Paragraph,
    LineBreak,
    CollapseIndicator,
    Other,
}

impl ElementKind {
    /// Classify `node`; `None` for text nodes
    pub fn classify<T: DocumentTree>(
        tree: &T,
        node: T::NodeId,
        markers: &ElementMarkers,
    ) -> Option<Self> {
        let tag = tree.tag_name(node)?;

        if tree.has_class(node, &markers.callout) {
            return Some(ElementKind::Callout);
        }
        if tree.has_class(node, &markers.collapse_indicator) {
            return Some(ElementKind::CollapseIndicator);
        }
        if !markers.math_block.is_empty()
            && markers.math_block.iter().all(|class| tree.has_class(node, class))
        {
            return Some(ElementKind::MathBlock);
        }

        Some(match tag {
            "li" => ElementKind::ListItem,
            "blockquote" => ElementKind::Blockquote,
            "pre" => ElementKind::CodeBlock,
            "table" => ElementKind::Table,
            "p" => ElementKind::Paragraph,
            "br" => ElementKind::LineBreak,
            _ => ElementKind::Other,
        })
    }
}
