// Tue Jan 13 2026 - Alex

pub mod basic;
pub mod error;
pub mod graph;
pub mod reader;

pub use basic::{basic_type_string, BaseKind};
pub use error::SymbolError;
pub use graph::{GraphBuilder, SymbolGraph};
pub use reader::{JsonGraphReader, SymbolSource};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a symbol inside the `SymbolGraph` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolTag {
    BaseType,
    Pointer,
    Array,
    Function,
    Enum,
    UserDefinedType,
    Typedef,
    EnumValue,
}

impl fmt::Display for SymbolTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BaseType => "base type",
            Self::Pointer => "pointer",
            Self::Array => "array",
            Self::Function => "function",
            Self::Enum => "enum",
            Self::UserDefinedType => "udt",
            Self::Typedef => "typedef",
            Self::EnumValue => "enum value",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UdtKind {
    Struct,
    Union,
    Class,
}

impl UdtKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Class => "class",
        }
    }

    /// Keyword used in emitted C text. Classes are declared as structs.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Union => "union",
            Self::Struct | Self::Class => "struct",
        }
    }

    pub fn is_union(self) -> bool {
        matches!(self, Self::Union)
    }
}

/// Bit placement of a bitfield member inside its storage unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitRange {
    pub position: u32,
    pub length: u32,
}

impl BitRange {
    pub fn new(position: u32, length: u32) -> Self {
        Self { position, length }
    }

    pub fn end(self) -> u32 {
        self.position.saturating_add(self.length)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdtMember {
    pub name: Option<String>,
    pub symbol: SymbolId,
    pub offset: u64,
    pub bits: Option<BitRange>,
}

impl UdtMember {
    pub fn new(name: &str, symbol: SymbolId, offset: u64) -> Self {
        Self {
            name: Some(name.to_string()),
            symbol,
            offset,
            bits: None,
        }
    }

    pub fn anonymous(symbol: SymbolId, offset: u64) -> Self {
        Self {
            name: None,
            symbol,
            offset,
            bits: None,
        }
    }

    pub fn with_bits(mut self, position: u32, length: u32) -> Self {
        self.bits = Some(BitRange::new(position, length));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn is_bitfield(&self) -> bool {
        self.bits.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolData {
    Base(BaseKind),
    Pointer { child: SymbolId },
    Array { child: SymbolId, element_count: u64 },
    Function { return_type: Option<SymbolId> },
    Enum { underlying: Option<SymbolId>, values: Vec<SymbolId> },
    Udt { kind: UdtKind, members: Vec<UdtMember> },
    Typedef { child: SymbolId },
    EnumValue { value: i64 },
}

/// One node of the type graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: Option<String>,
    pub size: u64,
    pub data: SymbolData,
}

impl Symbol {
    pub fn new(name: Option<&str>, size: u64, data: SymbolData) -> Self {
        Self {
            name: name.map(|n| n.to_string()),
            size,
            data,
        }
    }

    pub fn tag(&self) -> SymbolTag {
        match self.data {
            SymbolData::Base(_) => SymbolTag::BaseType,
            SymbolData::Pointer { .. } => SymbolTag::Pointer,
            SymbolData::Array { .. } => SymbolTag::Array,
            SymbolData::Function { .. } => SymbolTag::Function,
            SymbolData::Enum { .. } => SymbolTag::Enum,
            SymbolData::Udt { .. } => SymbolTag::UserDefinedType,
            SymbolData::Typedef { .. } => SymbolTag::Typedef,
            SymbolData::EnumValue { .. } => SymbolTag::EnumValue,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn child(&self) -> Option<SymbolId> {
        match self.data {
            SymbolData::Pointer { child }
            | SymbolData::Array { child, .. }
            | SymbolData::Typedef { child } => Some(child),
            _ => None,
        }
    }

    pub fn members(&self) -> &[UdtMember] {
        match &self.data {
            SymbolData::Udt { members, .. } => members,
            _ => &[],
        }
    }

    pub fn udt_kind(&self) -> Option<UdtKind> {
        match self.data {
            SymbolData::Udt { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn element_count(&self) -> Option<u64> {
        match self.data {
            SymbolData::Array { element_count, .. } => Some(element_count),
            _ => None,
        }
    }

    pub fn enum_values(&self) -> &[SymbolId] {
        match &self.data {
            SymbolData::Enum { values, .. } => values,
            _ => &[],
        }
    }

    pub fn is_udt(&self) -> bool {
        matches!(self.data, SymbolData::Udt { .. })
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.data, SymbolData::Enum { .. })
    }

    /// UDTs and enums are the only symbols that receive a definition of their own.
    pub fn is_aggregate(&self) -> bool {
        self.is_udt() || self.is_enum()
    }
}

/// Whether the symbol carries no usable name.
///
/// Debug databases spell anonymous types with compiler-generated placeholders,
/// which are treated the same as a missing name.
pub fn is_unnamed(symbol: &Symbol) -> bool {
    match symbol.name() {
        None => true,
        Some(name) => {
            name.contains("<unnamed-")
                || name.contains("<anonymous-")
                || name.starts_with("__unnamed")
                || name.starts_with("<lambda_")
        }
    }
}

pub fn udt_kind_string(kind: UdtKind) -> &'static str {
    kind.as_str()
}
