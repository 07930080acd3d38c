use thiserror::Error;

pub type AttributeResult<T> = Result<T, AttributeError>;

/// Why a host refused to take an attribute from an annotation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    #[error("Invalid attribute name `{name}`")]
    InvalidName { name: String },

    #[error("Invalid class name `{name}`")]
    InvalidClass { name: String },

    #[error("Annotation `{raw}` carries no attributes")]
    Empty { raw: String },

    #[error("Node is not an element")]
    NotAnElement,
}

impl AttributeError {
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    pub fn invalid_class(name: impl Into<String>) -> Self {
        Self::InvalidClass { name: name.into() }
    }

    pub fn empty(raw: impl Into<String>) -> Self {
        Self::Empty { raw: raw.into() }
    }
}
