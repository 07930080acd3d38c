//! # attrmark DOM
//!
//! Applies `{...}` annotations to a rendered element tree.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: text → AnnotationMatch              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ dom: Applier walks a DocumentTree           │
//! │  - classify elements (ElementKind)          │
//! │  - block vs inline placement                │
//! │  - write attributes, strip annotation text  │
//! │  - recover annotations from source sections │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use attrmark_dom::{Applier, DocumentTree, VDocument, VNode};
//!
//! let mut doc = VDocument::from_vnode(
//!     &VNode::element("p").with_child(VNode::text("Hello {.note}")),
//! );
//! let root = doc.root();
//! Applier::default().apply(&mut doc, root);
//!
//! assert_eq!(doc.to_html(), "<p class=\"note\">Hello </p>");
//! ```
//!
//! Hosts with their own tree implement [`DocumentTree`] and hand it to the
//! same [`Applier`].

pub mod applier;
pub mod postprocess;
pub mod tree;
pub mod vdom;

pub use applier::{apply_attributes, Applier, ApplierOptions, Placement, TargetBinding, PRESENCE_VALUE};
pub use postprocess::{BlockOutcome, SectionInfo, SectionLookup};
pub use tree::{DocumentTree, ElementKind, ElementMarkers};
pub use vdom::{NodeId, VDocument, VNode};

// Re-export parser types that appear in this crate's API
pub use attrmark_parser::{AnnotationMatch, Attribute, AttributeError, AttributeResult};
