#![allow(missing_docs)]

use std::{error::Error, fmt, io, sync::Arc};

use lumen_codec::{CodecError, JsonError};
use lumen_config::ConfigError;
use lumen_image::CompileError;

/// A failure in the transport seam.
///
/// Transport implementations wrap their own I/O failures in
/// [TransportError::IoError] and negative device responses in
/// [TransportError::DeviceError].
#[derive(Debug, Clone)]
pub enum TransportError {
    IoError(Arc<io::Error>),
    DeviceError(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::IoError(error) => write!(f, "transport i/o error: {}", error),
            TransportError::DeviceError(message) => {
                write!(f, "device reported an error: {}", message)
            }
        }
    }
}

impl Error for TransportError {}

impl From<io::Error> for TransportError {
    fn from(v: io::Error) -> Self {
        Self::IoError(Arc::new(v))
    }
}

#[derive(Debug, Clone)]
pub enum LumenError {
    CodecError(CodecError),
    JsonError(JsonError),
    ConfigError(ConfigError),
    CompileError(CompileError),
    TransportError(TransportError),
    IoError(Arc<io::Error>),
}

impl fmt::Display for LumenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LumenError::CodecError(error) => write!(f, "{}", error),
            LumenError::JsonError(error) => write!(f, "{}", error),
            LumenError::ConfigError(error) => write!(f, "{}", error),
            LumenError::CompileError(error) => write!(f, "{}", error),
            LumenError::TransportError(error) => write!(f, "{}", error),
            LumenError::IoError(error) => write!(f, "{}", error),
        }
    }
}

impl Error for LumenError {}

impl From<CodecError> for LumenError {
    fn from(v: CodecError) -> Self {
        Self::CodecError(v)
    }
}

impl From<JsonError> for LumenError {
    fn from(v: JsonError) -> Self {
        Self::JsonError(v)
    }
}

impl From<ConfigError> for LumenError {
    fn from(v: ConfigError) -> Self {
        Self::ConfigError(v)
    }
}

impl From<CompileError> for LumenError {
    fn from(v: CompileError) -> Self {
        Self::CompileError(v)
    }
}

impl From<TransportError> for LumenError {
    fn from(v: TransportError) -> Self {
        Self::TransportError(v)
    }
}

impl From<io::Error> for LumenError {
    fn from(v: io::Error) -> Self {
        Self::IoError(Arc::new(v))
    }
}
