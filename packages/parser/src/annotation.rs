//! Annotation records
//!
//! An annotation is the brace syntax an author writes after a block or a run
//! of text:
//! ```text
//! A paragraph with a trailing annotation {.warning #note data-x=1}
//! ```
//! Scanning turns each one into an [`AnnotationMatch`] holding the exact text
//! that was matched and the attributes it asks for, in source order.

use crate::error::{AttributeError, AttributeResult};
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One unit of an annotation's inner text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AttributeToken {
    /// `.name`
    Class { name: String },
    /// `#name`
    Id { name: String },
    /// `key=value`, split on the first `=`
    KeyValue { key: String, value: String },
    /// A bare unit
    Flag { name: String },
}

/// A key with an optional value; `None` is a presence attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    pub fn flag(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    pub fn is_class(&self) -> bool {
        self.key == "class"
    }

    /// Class names carried by a `class` attribute (whitespace separated)
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        let value = if self.is_class() {
            self.value.as_deref().unwrap_or("")
        } else {
            ""
        };
        value.split_whitespace()
    }
}

impl From<AttributeToken> for Attribute {
    fn from(token: AttributeToken) -> Self {
        match token {
            AttributeToken::Class { name } => Attribute::new("class", name),
            AttributeToken::Id { name } => Attribute::new("id", name),
            AttributeToken::KeyValue { key, value } => Attribute::new(key, value),
            AttributeToken::Flag { name } => Attribute::flag(name),
        }
    }
}

/// Result of scanning one annotation out of a text span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationMatch {
    /// Matched text including the braces
    pub raw: String,
    /// Text between the braces, after the optional colon and padding
    pub inner: String,
    /// Byte range of `raw` within the scanned text
    pub span: Range<usize>,
    pub attributes: Vec<Attribute>,
}

impl AnnotationMatch {
    pub(crate) fn from_ranges(text: &str, span: Range<usize>, inner: Range<usize>) -> Self {
        let inner = text[inner].to_string();
        let attributes = tokenize(&inner)
            .map(|tokens| tokens.into_iter().map(Attribute::from).collect())
            .unwrap_or_default();

        Self {
            raw: text[span.clone()].to_string(),
            inner,
            span,
            attributes,
        }
    }

    /// Shift the span by `offset` bytes (when the scanned text was a slice)
    pub fn offset_by(mut self, offset: usize) -> Self {
        self.span = self.span.start + offset..self.span.end + offset;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Check every attribute against the rules a strict host enforces
    pub fn validate(&self) -> AttributeResult<()> {
        if self.attributes.is_empty() {
            return Err(AttributeError::empty(&self.raw));
        }

        for attribute in &self.attributes {
            if attribute.is_class() {
                let value = attribute.value.as_deref().unwrap_or("");
                if value.trim().is_empty() {
                    return Err(AttributeError::invalid_class(value));
                }
                for class in attribute.class_names() {
                    validate_class_name(class)?;
                }
            } else {
                validate_attribute_name(&attribute.key)?;
            }
        }

        Ok(())
    }
}

/// Attribute names follow the XML `Name` shape: a letter, `_` or `:` first,
/// then letters, digits, `-`, `.`, `_` or `:`.
pub fn validate_attribute_name(name: &str) -> AttributeResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => chars
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':')),
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AttributeError::invalid_name(name))
    }
}

/// Class names must be non-empty and free of whitespace
pub fn validate_class_name(name: &str) -> AttributeResult<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        Err(AttributeError::invalid_class(name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_to_attribute() {
        let attr = Attribute::from(AttributeToken::Class {
            name: "note".to_string(),
        });
        assert_eq!(attr, Attribute::new("class", "note"));

        let attr = Attribute::from(AttributeToken::Id {
            name: "x".to_string(),
        });
        assert_eq!(attr, Attribute::new("id", "x"));

        let attr = Attribute::from(AttributeToken::Flag {
            name: "checked".to_string(),
        });
        assert_eq!(attr.value, None);
    }

    #[test]
    fn test_class_names_split_on_whitespace() {
        let attr = Attribute::new("class", "a  b c");
        assert_eq!(attr.class_names().collect::<Vec<_>>(), vec!["a", "b", "c"]);

        let attr = Attribute::new("title", "a b");
        assert_eq!(attr.class_names().count(), 0);
    }

    #[test]
    fn test_attribute_names() {
        assert!(validate_attribute_name("data-x").is_ok());
        assert!(validate_attribute_name("_private").is_ok());
        assert!(validate_attribute_name("xml:lang").is_ok());
        assert!(validate_attribute_name("").is_err());
        assert!(validate_attribute_name("1st").is_err());
        assert!(validate_attribute_name("#note").is_err());
        assert!(validate_attribute_name("a\"b").is_err());
        assert!(validate_attribute_name("=foo").is_err());
    }

    #[test]
    fn test_class_name_rules() {
        assert!(validate_class_name("warning").is_ok());
        assert!(validate_class_name("").is_err());
        assert!(validate_class_name("a b").is_err());
    }

    #[test]
    fn test_validate_rejects_empty_class() {
        let text = "{.}";
        let m = AnnotationMatch::from_ranges(text, 0..3, 1..2);
        assert_eq!(m.attributes, vec![Attribute::new("class", "")]);
        assert_eq!(m.validate(), Err(AttributeError::invalid_class("")));
    }

    #[test]
    fn test_offset_by() {
        let text = "{.a}";
        let m = AnnotationMatch::from_ranges(text, 0..4, 1..3).offset_by(10);
        assert_eq!(m.span, 10..14);
        assert_eq!(m.raw, "{.a}");
    }
}
