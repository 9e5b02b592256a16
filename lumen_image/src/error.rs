#![allow(missing_docs)]

use std::{error::Error, fmt};

use lumen_config::ObjectId;

#[derive(Debug, Clone)]
pub enum CompileError {
    GraphUnresolvable,
    ImageTooLarge {
        size: usize,
        budget: usize,
    },
    TooManyEntries {
        kind: &'static str,
        len: usize,
    },
    UnresolvedReference(ObjectId),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::GraphUnresolvable => {
                write!(
                    f,
                    "compile pass made no progress; the graph has a cyclic or dangling reference"
                )
            }
            CompileError::ImageTooLarge { size, budget } => write!(
                f,
                "image is {} bytes, exceeding the {} byte budget by {}",
                size,
                budget,
                size - budget
            ),
            CompileError::TooManyEntries { kind, len } => {
                write!(f, "{} has {} entries; the limit is 255", kind, len)
            }
            CompileError::UnresolvedReference(id) => {
                write!(f, "reference to object {} has no assigned address", id)
            }
        }
    }
}

impl Error for CompileError {}
