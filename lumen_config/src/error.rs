#![allow(missing_docs)]

use std::{error::Error, fmt};

use lumen_codec::ValueTypeError;

use crate::ObjectId;

#[derive(Debug, Clone)]
pub enum ConfigError {
    ValueTypeError(ValueTypeError),
    UnexpectedClass {
        expected: &'static str,
        actual: String,
    },
    MissingField(String),
    FieldOutOfRange {
        field: &'static str,
        value: i64,
    },
    ChannelOutOfRange(f64),
    UnknownObject(ObjectId),
    WrongKind {
        id: ObjectId,
        expected: &'static str,
        actual: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ValueTypeError(error) => write!(f, "{}", error),
            ConfigError::UnexpectedClass { expected, actual } => {
                write!(f, "expected class {}, found {}", expected, actual)
            }
            ConfigError::MissingField(name) => write!(f, "missing field '{}'", name),
            ConfigError::FieldOutOfRange { field, value } => {
                write!(f, "field '{}' is out of range: {}", field, value)
            }
            ConfigError::ChannelOutOfRange(value) => {
                write!(f, "color channel must be between 0.0 and 1.0: {}", value)
            }
            ConfigError::UnknownObject(id) => write!(f, "no object with id {}", id),
            ConfigError::WrongKind {
                id,
                expected,
                actual,
            } => write!(f, "object {} is a {}, expected a {}", id, actual, expected),
        }
    }
}

impl Error for ConfigError {}

impl From<ValueTypeError> for ConfigError {
    fn from(v: ValueTypeError) -> Self {
        Self::ValueTypeError(v)
    }
}
