// Tue Jan 13 2026 - Alex

use crate::structure::StructureError;
use crate::symbol::SymbolError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),
    #[error("Bitfields are not allowed in union {0}")]
    UnionBitfieldViolation(String),
    #[error("Invalid symbol graph: {0}")]
    InvalidGraph(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SymbolError> for ExtractError {
    fn from(err: SymbolError) -> Self {
        match err {
            SymbolError::FileNotFound(path) => Self::FileNotFound(path),
            SymbolError::InvalidGraph(message) => Self::InvalidGraph(message),
            SymbolError::Parse(e) => Self::InvalidGraph(e.to_string()),
            SymbolError::Io(e) => Self::Io(e),
        }
    }
}

impl From<StructureError> for ExtractError {
    fn from(err: StructureError) -> Self {
        match err {
            StructureError::UnionBitfieldViolation { name } => Self::UnionBitfieldViolation(name),
            StructureError::Io(e) => Self::Io(e),
        }
    }
}
