//! # attrmark parser
//!
//! Scans `{...}` attribute annotations out of text and turns them into
//! structured records.
//!
//! ```rust
//! use attrmark_parser::{scan_line, Attribute};
//!
//! let found = scan_line("A warning paragraph {.warning data-x=1}");
//! assert_eq!(found[0].raw, "{.warning data-x=1}");
//! assert_eq!(found[0].attributes[0], Attribute::new("class", "warning"));
//! ```

pub mod annotation;
pub mod error;
pub mod scanner;
pub mod tokenizer;

pub use annotation::{
    validate_attribute_name, validate_class_name, AnnotationMatch, Attribute, AttributeToken,
};
pub use error::{AttributeError, AttributeResult};
pub use scanner::{
    find_first, parse_whole, probe_contains, probe_whole, scan_block_trailer, scan_line,
};
pub use tokenizer::{strip_quotes, tokenize};
