// Tue Jan 15 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// How nested aggregate members are printed inside their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberExpansion {
    /// Only the requested type is expanded; nested aggregates are referenced by name.
    None,
    /// Anonymous nested aggregates are printed in place.
    InlineUnnamed,
    /// Every nested aggregate is printed in place.
    InlineAll,
}

impl MemberExpansion {
    /// Parses the single-letter switch value. Unknown letters fall back to `InlineUnnamed`.
    pub fn from_letter(value: &str) -> Self {
        match value.chars().next() {
            Some('n') => Self::None,
            Some('a') => Self::InlineAll,
            _ => Self::InlineUnnamed,
        }
    }
}

impl Default for MemberExpansion {
    fn default() -> Self {
        Self::InlineUnnamed
    }
}

impl fmt::Display for MemberExpansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::InlineUnnamed => "inline unnamed",
            Self::InlineAll => "inline all",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructorSettings {
    pub expansion: MemberExpansion,
    pub anonymous_struct_prefix: String,
    pub anonymous_union_prefix: String,
    pub anonymous_enum_prefix: String,
    pub symbol_prefix: String,
    pub symbol_suffix: String,
    pub create_padding_members: bool,
    pub show_offsets: bool,
    pub microsoft_typedefs: bool,
    pub allow_bitfields_in_union: bool,
    pub allow_anonymous_data_types: bool,
}

impl Default for ReconstructorSettings {
    fn default() -> Self {
        Self {
            expansion: MemberExpansion::InlineUnnamed,
            anonymous_struct_prefix: "_s".to_string(),
            anonymous_union_prefix: "_u".to_string(),
            anonymous_enum_prefix: "_e".to_string(),
            symbol_prefix: String::new(),
            symbol_suffix: String::new(),
            create_padding_members: true,
            show_offsets: true,
            microsoft_typedefs: true,
            allow_bitfields_in_union: false,
            allow_anonymous_data_types: true,
        }
    }
}

impl ReconstructorSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expansion(mut self, expansion: MemberExpansion) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn with_padding(mut self, enabled: bool) -> Self {
        self.create_padding_members = enabled;
        self
    }

    pub fn with_offsets(mut self, enabled: bool) -> Self {
        self.show_offsets = enabled;
        self
    }

    pub fn with_microsoft_typedefs(mut self, enabled: bool) -> Self {
        self.microsoft_typedefs = enabled;
        self
    }

    pub fn with_bitfields_in_union(mut self, enabled: bool) -> Self {
        self.allow_bitfields_in_union = enabled;
        self
    }

    pub fn with_anonymous_data_types(mut self, enabled: bool) -> Self {
        self.allow_anonymous_data_types = enabled;
        self
    }

    pub fn with_symbol_affixes(mut self, prefix: &str, suffix: &str) -> Self {
        self.symbol_prefix = prefix.to_string();
        self.symbol_suffix = suffix.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion_letters() {
        assert_eq!(MemberExpansion::from_letter("n"), MemberExpansion::None);
        assert_eq!(MemberExpansion::from_letter("i"), MemberExpansion::InlineUnnamed);
        assert_eq!(MemberExpansion::from_letter("a"), MemberExpansion::InlineAll);
        assert_eq!(MemberExpansion::from_letter("q"), MemberExpansion::InlineUnnamed);
    }

    #[test]
    fn test_defaults() {
        let settings = ReconstructorSettings::default();
        assert!(settings.create_padding_members);
        assert!(settings.show_offsets);
        assert!(settings.microsoft_typedefs);
        assert!(!settings.allow_bitfields_in_union);
        assert!(settings.allow_anonymous_data_types);
    }
}
