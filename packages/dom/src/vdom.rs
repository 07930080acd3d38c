use crate::tree::DocumentTree;
use attrmark_parser::{
    validate_attribute_name, validate_class_name, AttributeError, AttributeResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual DOM node as a renderer hands it over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        classes: Vec<String>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<VNode>,
    },

    /// Text node
    Text { content: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into().to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut classes, ..
        } = self
        {
            let class = class.into();
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }
}

/// Handle to a node inside a [`VDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: String,
        classes: Vec<String>,
        attributes: BTreeMap<String, String>,
        children: Vec<NodeId>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

/// Arena-backed element tree with strict attribute validation.
///
/// Attribute names and classes are checked the way a browser DOM checks them,
/// so a bad annotation is rejected rather than written.
#[derive(Debug, Clone)]
pub struct VDocument {
    nodes: Vec<Node>,
    root: NodeId,
}

impl VDocument {
    pub fn from_vnode(root: &VNode) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.insert(root, None);
        doc
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let root: VNode = serde_json::from_str(json)?;
        Ok(Self::from_vnode(&root))
    }

    fn insert(&mut self, vnode: &VNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());

        match vnode {
            VNode::Text { content } => {
                self.nodes.push(Node {
                    parent,
                    data: NodeData::Text(content.clone()),
                });
            }
            VNode::Element {
                tag,
                classes,
                attributes,
                children,
            } => {
                self.nodes.push(Node {
                    parent,
                    data: NodeData::Element {
                        tag: tag.to_ascii_lowercase(),
                        classes: classes.clone(),
                        attributes: attributes.clone(),
                        children: Vec::new(),
                    },
                });

                let child_ids: Vec<NodeId> = children
                    .iter()
                    .map(|child| self.insert(child, Some(id)))
                    .collect();

                if let NodeData::Element { children, .. } = &mut self.nodes[id.0].data {
                    *children = child_ids;
                }
            }
        }

        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn to_vnode(&self) -> VNode {
        self.node_to_vnode(self.root)
    }

    pub fn node_to_vnode(&self, id: NodeId) -> VNode {
        match &self.nodes[id.0].data {
            NodeData::Text(content) => VNode::text(content.clone()),
            NodeData::Element {
                tag,
                classes,
                attributes,
                children,
            } => VNode::Element {
                tag: tag.clone(),
                classes: classes.clone(),
                attributes: attributes.clone(),
                children: children.iter().map(|&c| self.node_to_vnode(c)).collect(),
            },
        }
    }

    pub fn classes(&self, id: NodeId) -> &[String] {
        match &self.nodes[id.0].data {
            NodeData::Element { classes, .. } => classes.as_slice(),
            NodeData::Text(_) => &[],
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    /// Elements with the given tag, in document order
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.collect_tag(self.root, tag, &mut found);
        found
    }

    fn collect_tag(&self, id: NodeId, tag: &str, found: &mut Vec<NodeId>) {
        if let NodeData::Element {
            tag: node_tag,
            children,
            ..
        } = &self.nodes[id.0].data
        {
            if node_tag == tag {
                found.push(id);
            }
            for &child in children {
                self.collect_tag(child, tag, found);
            }
        }
    }

    /// Serialize the tree (from the root) as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].data {
            NodeData::Text(content) => out.push_str(&escape_text(content)),
            NodeData::Element {
                tag,
                classes,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                if !classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", escape_attr(&classes.join(" "))));
                }
                for (key, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", key, escape_attr(value)));
                }
                out.push('>');

                if is_void(tag) {
                    return;
                }
                for &child in children {
                    self.write_html(child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "br" | "hr" | "img" | "input" | "meta" | "link" | "wbr")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

impl DocumentTree for VDocument {
    type NodeId = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        match &self.nodes[node.0].data {
            NodeData::Element { children, .. } => children.clone(),
            NodeData::Text(_) => Vec::new(),
        }
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Text(content) => Some(content.as_str()),
            NodeData::Element { .. } => None,
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element { tag, .. } => Some(tag.as_str()),
            NodeData::Text(_) => None,
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> AttributeResult<()> {
        validate_class_name(class)?;
        match &mut self.nodes[node.0].data {
            NodeData::Element { classes, .. } => {
                if !classes.iter().any(|c| c == class) {
                    classes.push(class.to_string());
                }
                Ok(())
            }
            NodeData::Text(_) => Err(AttributeError::NotAnElement),
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> AttributeResult<()> {
        validate_attribute_name(name)?;
        match &mut self.nodes[node.0].data {
            NodeData::Element {
                classes,
                attributes,
                ..
            } => {
                // `class` lives in the class list so both paths stay in sync
                if name.eq_ignore_ascii_case("class") {
                    *classes = value.split_whitespace().map(str::to_string).collect();
                } else {
                    attributes.insert(name.to_string(), value.to_string());
                }
                Ok(())
            }
            NodeData::Text(_) => Err(AttributeError::NotAnElement),
        }
    }

    fn set_text(&mut self, node: NodeId, text: String) {
        if let NodeData::Text(content) = &mut self.nodes[node.0].data {
            *content = text;
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            if let NodeData::Element { children, .. } = &mut self.nodes[parent.0].data {
                children.retain(|&c| c != node);
            }
        }
    }
}
