// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("Bitfields are not allowed in union {name}")]
    UnionBitfieldViolation { name: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
