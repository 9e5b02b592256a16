#![allow(missing_docs)]

use std::{borrow::Cow, error::Error, fmt, sync::Arc};

use crate::CodecValue;

#[derive(Debug, Clone)]
pub struct ValueTypeError {
    pub expected: Cow<'static, str>,
    pub actual: CodecValue,
}

impl fmt::Display for ValueTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected value of type {}, found {}",
            self.expected, self.actual
        )
    }
}

impl Error for ValueTypeError {}

#[derive(Debug, Clone)]
pub struct UnknownClassError {
    pub id: String,
}

impl fmt::Display for UnknownClassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown class id '{}'", self.id)
    }
}

impl Error for UnknownClassError {}

/// A node-level schema failure, qualified by the path and depth of the node
/// at which it occurred.
#[derive(Debug, Clone)]
pub struct CodecError {
    pub path: String,
    pub depth: usize,
    pub kind: CodecErrorKind,
}

#[derive(Debug, Clone)]
pub enum CodecErrorKind {
    SchemaMismatch {
        expected: Cow<'static, str>,
        actual: Cow<'static, str>,
    },
    TupleLenMismatch {
        expected: usize,
        actual: usize,
    },
    UnresolvedClassTag {
        expected: String,
        tag: String,
    },
    AmbiguousClassTag {
        tag: String,
    },
    UnknownClass {
        id: String,
    },
    MissingField {
        name: String,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}', depth {}: {}", self.path, self.depth, self.kind)
    }
}

impl Error for CodecError {}

impl fmt::Display for CodecErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecErrorKind::SchemaMismatch { expected, actual } => {
                write!(f, "expected {}, found {}", expected, actual)
            }
            CodecErrorKind::TupleLenMismatch { expected, actual } => write!(
                f,
                "tuple length {} does not match template length {}",
                actual, expected
            ),
            CodecErrorKind::UnresolvedClassTag { expected, tag } => write!(
                f,
                "type tag '{}' is not '{}' or a registered descendant",
                tag, expected
            ),
            CodecErrorKind::AmbiguousClassTag { tag } => {
                write!(f, "type tag '{}' matches multiple registered classes", tag)
            }
            CodecErrorKind::UnknownClass { id } => write!(f, "unknown class id '{}'", id),
            CodecErrorKind::MissingField { name } => write!(f, "missing field '{}'", name),
        }
    }
}

impl Error for CodecErrorKind {}

#[derive(Debug, Clone)]
pub enum JsonError {
    ParseError(Arc<serde_json::Error>),
    MissingClassTag,
    NonStringClassTag,
    NonFiniteFloat,
    UnsupportedNumber(String),
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonError::ParseError(error) => write!(f, "json error: {}", error),
            JsonError::MissingClassTag => {
                write!(f, "json object is missing the class tag field")
            }
            JsonError::NonStringClassTag => {
                write!(f, "json object's class tag field is not a string")
            }
            JsonError::NonFiniteFloat => {
                write!(f, "float value cannot be represented in json")
            }
            JsonError::UnsupportedNumber(repr) => {
                write!(f, "unsupported json number: {}", repr)
            }
        }
    }
}

impl Error for JsonError {}

impl From<serde_json::Error> for JsonError {
    fn from(v: serde_json::Error) -> Self {
        Self::ParseError(Arc::new(v))
    }
}
