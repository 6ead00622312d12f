// Tue Jan 13 2026 - Alex

use crate::symbol::{Symbol, SymbolData};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive type families as recorded in debug databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseKind {
    NoType,
    Void,
    Char,
    #[serde(rename = "wchar")]
    WChar,
    Char8,
    Char16,
    Char32,
    Int,
    #[serde(rename = "uint")]
    UInt,
    Float,
    Bool,
    Long,
    #[serde(rename = "ulong")]
    ULong,
    Hresult,
}

impl BaseKind {
    /// Spelling of a primitive of this family with the given byte size.
    pub fn spelling(self, size: u64, use_stdint: bool) -> &'static str {
        match self {
            Self::NoType | Self::Void => "void",
            Self::Char => "char",
            Self::WChar => "wchar_t",
            Self::Bool => "bool",
            Self::Char8 => if use_stdint { "uint8_t" } else { "unsigned char" },
            Self::Char16 => if use_stdint { "uint16_t" } else { "unsigned short" },
            Self::Char32 => if use_stdint { "uint32_t" } else { "unsigned int" },
            Self::Long | Self::Hresult => if use_stdint { "int32_t" } else { "long" },
            Self::ULong => if use_stdint { "uint32_t" } else { "unsigned long" },
            Self::Int => match (size, use_stdint) {
                (1, false) => "char",
                (1, true) => "int8_t",
                (2, false) => "short",
                (2, true) => "int16_t",
                (8, false) => "long long",
                (8, true) => "int64_t",
                (16, _) => "__int128",
                (_, false) => "int",
                (_, true) => "int32_t",
            },
            Self::UInt => match (size, use_stdint) {
                (1, false) => "unsigned char",
                (1, true) => "uint8_t",
                (2, false) => "unsigned short",
                (2, true) => "uint16_t",
                (8, false) => "unsigned long long",
                (8, true) => "uint64_t",
                (16, _) => "unsigned __int128",
                (_, false) => "unsigned int",
                (_, true) => "uint32_t",
            },
            Self::Float => match size {
                4 => "float",
                8 => "double",
                _ => "long double",
            },
        }
    }
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Canonical spelling of a base-type symbol. Non-base symbols spell as `void`.
pub fn basic_type_string(symbol: &Symbol, use_stdint: bool) -> &'static str {
    match symbol.data {
        SymbolData::Base(kind) => kind.spelling(symbol.size, use_stdint),
        _ => "void",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_spellings() {
        assert_eq!(BaseKind::Int.spelling(4, false), "int");
        assert_eq!(BaseKind::UInt.spelling(8, false), "unsigned long long");
        assert_eq!(BaseKind::ULong.spelling(4, false), "unsigned long");
        assert_eq!(BaseKind::Float.spelling(8, false), "double");
    }

    #[test]
    fn test_stdint_spellings() {
        assert_eq!(BaseKind::Int.spelling(2, true), "int16_t");
        assert_eq!(BaseKind::UInt.spelling(1, true), "uint8_t");
        assert_eq!(BaseKind::Long.spelling(4, true), "int32_t");
        assert_eq!(BaseKind::Char.spelling(1, true), "char");
    }

    #[test]
    fn test_basic_type_string_of_symbol() {
        let symbol = Symbol::new(None, 2, SymbolData::Base(BaseKind::UInt));
        assert_eq!(basic_type_string(&symbol, false), "unsigned short");
        assert_eq!(basic_type_string(&symbol, true), "uint16_t");
    }
}
