// Tue Jan 15 2026 - Alex

use crate::structure::{MemberExpansion, ReconstructorSettings};
use crate::symbol::{is_unnamed, SymbolData, SymbolGraph, SymbolId, UdtKind};
use std::collections::HashMap;
use std::io::{self, Write};

/// Expected `sizeof` of a type that received a standalone definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeCheck {
    pub type_expr: String,
    pub display_name: String,
    pub size: u64,
}

/// Writes C text for the events produced while a type is walked.
///
/// Owns the naming state of one run: synthetic names for anonymous types are
/// handed out once per symbol and stay stable across every later reference.
pub struct HeaderReconstructor<'g> {
    graph: &'g SymbolGraph,
    settings: ReconstructorSettings,
    anonymous_names: HashMap<SymbolId, String>,
    anonymous_counter: u32,
    padding_counter: u32,
    size_checks: Vec<SizeCheck>,
}

impl<'g> HeaderReconstructor<'g> {
    pub fn new(graph: &'g SymbolGraph, settings: ReconstructorSettings) -> Self {
        Self {
            graph,
            settings,
            anonymous_names: HashMap::new(),
            anonymous_counter: 0,
            padding_counter: 0,
            size_checks: Vec::new(),
        }
    }

    pub fn settings(&self) -> &ReconstructorSettings {
        &self.settings
    }

    fn anonymous_prefix(&self, id: SymbolId) -> &str {
        match &self.graph[id].data {
            SymbolData::Udt { kind: UdtKind::Union, .. } => &self.settings.anonymous_union_prefix,
            SymbolData::Enum { .. } => &self.settings.anonymous_enum_prefix,
            _ => &self.settings.anonymous_struct_prefix,
        }
    }

    fn next_synthetic(&mut self, prefix: &str) -> String {
        let name = format!("{}{:03}", prefix, self.anonymous_counter);
        self.anonymous_counter += 1;
        name
    }

    fn base_name(&mut self, id: SymbolId) -> String {
        let symbol = &self.graph[id];
        if !is_unnamed(symbol) {
            return symbol.name().unwrap_or_default().to_string();
        }
        if let Some(name) = self.anonymous_names.get(&id) {
            return name.clone();
        }
        let prefix = self.anonymous_prefix(id).to_string();
        let name = self.next_synthetic(&prefix);
        self.anonymous_names.insert(id, name.clone());
        name
    }

    /// Name used wherever the type is referenced or defined.
    pub fn corrected_name(&mut self, id: SymbolId) -> String {
        let base = self.base_name(id);
        format!("{}{}{}", self.settings.symbol_prefix, base, self.settings.symbol_suffix)
    }

    /// Typedef alias: the base name without one leading underscore.
    pub fn type_alias(&mut self, id: SymbolId) -> String {
        let base = self.base_name(id);
        let stripped = match base.strip_prefix('_') {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => base,
        };
        format!("{}{}{}", self.settings.symbol_prefix, stripped, self.settings.symbol_suffix)
    }

    /// Member name for an anonymous aggregate printed in place without anonymous types.
    pub fn synthetic_member_name(&mut self, id: SymbolId) -> String {
        let tag = self.corrected_name(id);
        tag.trim_start_matches('_').to_string()
    }

    /// Tag and member name for a reconstructed group that cannot stay anonymous.
    pub fn synthetic_group_names(&mut self, kind: UdtKind) -> (String, String) {
        let prefix = if kind.is_union() {
            self.settings.anonymous_union_prefix.clone()
        } else {
            self.settings.anonymous_struct_prefix.clone()
        };
        let tag = self.next_synthetic(&prefix);
        let member = tag.trim_start_matches('_').to_string();
        (tag, member)
    }

    /// Whether a by-value reference to `id` is printed in place.
    pub fn should_inline(&self, id: SymbolId) -> bool {
        match self.settings.expansion {
            MemberExpansion::None => false,
            MemberExpansion::InlineUnnamed => is_unnamed(&self.graph[id]),
            MemberExpansion::InlineAll => true,
        }
    }

    /// Whether `id` gets a definition of its own when every type is dumped.
    pub fn is_standalone(&self, id: SymbolId) -> bool {
        let symbol = &self.graph[id];
        symbol.is_aggregate()
            && (self.settings.expansion == MemberExpansion::None || !is_unnamed(symbol))
    }

    fn keyword(&self, id: SymbolId) -> &'static str {
        match &self.graph[id].data {
            SymbolData::Udt { kind, .. } => kind.keyword(),
            SymbolData::Enum { .. } => "enum",
            _ => "struct",
        }
    }

    /// Opening keyword of an aggregate printed in place.
    pub fn inline_header(&mut self, id: SymbolId) -> String {
        let keyword = self.keyword(id);
        if !is_unnamed(&self.graph[id]) {
            format!("{} /* {} */", keyword, self.corrected_name(id))
        } else if self.settings.allow_anonymous_data_types {
            keyword.to_string()
        } else {
            format!("{} {}", keyword, self.corrected_name(id))
        }
    }

    fn indent(depth: usize) -> String {
        "  ".repeat(depth)
    }

    fn offset_comment(&self, offset: u64) -> String {
        if self.settings.show_offsets {
            format!("/* 0x{:04x} */ ", offset)
        } else {
            String::new()
        }
    }

    fn size_comment(&self, size: u64) -> String {
        if self.settings.show_offsets {
            format!(" /* size: 0x{:04x} */", size)
        } else {
            String::new()
        }
    }

    pub fn write_declaration(&mut self, out: &mut dyn Write, id: SymbolId) -> io::Result<()> {
        let keyword = self.keyword(id);
        let name = self.corrected_name(id);
        writeln!(out, "{} {};", keyword, name)
    }

    pub fn begin_definition(&mut self, out: &mut dyn Write, id: SymbolId) -> io::Result<()> {
        self.padding_counter = 0;
        let keyword = self.keyword(id);
        let name = self.corrected_name(id);
        if self.settings.microsoft_typedefs {
            writeln!(out, "typedef {} {}", keyword, name)?;
        } else {
            writeln!(out, "{} {}", keyword, name)?;
        }
        writeln!(out, "{{")
    }

    pub fn end_definition(&mut self, out: &mut dyn Write, id: SymbolId) -> io::Result<()> {
        let symbol = &self.graph[id];
        let size = symbol.size;
        let is_udt = symbol.is_udt();
        let keyword = self.keyword(id);
        let name = self.corrected_name(id);

        let (closing, type_expr, display_name) = if self.settings.microsoft_typedefs {
            let alias = self.type_alias(id);
            (format!("}} {}, *P{};", alias, alias), alias.clone(), alias)
        } else {
            ("};".to_string(), format!("{} {}", keyword, name), name)
        };

        if is_udt {
            writeln!(out, "{}{}", closing, self.size_comment(size))?;
            self.size_checks.push(SizeCheck {
                type_expr,
                display_name,
                size,
            });
        } else {
            writeln!(out, "{}", closing)?;
        }
        writeln!(out)
    }

    pub fn write_field(&mut self, out: &mut dyn Write, depth: usize, offset: u64, text: &str, bit_position: Option<u32>) -> io::Result<()> {
        let bits = match bit_position {
            Some(position) if self.settings.show_offsets => format!(" /* bit position: {} */", position),
            _ => String::new(),
        };
        writeln!(out, "{}{}{};{}", Self::indent(depth), self.offset_comment(offset), text, bits)
    }

    pub fn write_padding(&mut self, out: &mut dyn Write, depth: usize, offset: u64, size: u64) -> io::Result<()> {
        let name = format!("Padding_{}", self.padding_counter);
        self.padding_counter += 1;
        writeln!(out, "{}{}char {}[{}];", Self::indent(depth), self.offset_comment(offset), name, size)
    }

    pub fn write_enum_value(&mut self, out: &mut dyn Write, depth: usize, name: &str, value: i64) -> io::Result<()> {
        writeln!(out, "{}{} = {},", Self::indent(depth), name, value)
    }

    pub fn begin_inline(&mut self, out: &mut dyn Write, depth: usize, offset: u64, header: &str) -> io::Result<()> {
        let indent = Self::indent(depth);
        writeln!(out, "{}{}{}", indent, self.offset_comment(offset), header)?;
        writeln!(out, "{}{{", indent)
    }

    pub fn end_inline(&mut self, out: &mut dyn Write, depth: usize, declarator: &str, size: Option<u64>) -> io::Result<()> {
        let closing = if declarator.is_empty() {
            "};".to_string()
        } else {
            format!("}} {};", declarator)
        };
        let comment = size.map(|s| self.size_comment(s)).unwrap_or_default();
        writeln!(out, "{}{}{}", Self::indent(depth), closing, comment)
    }

    pub fn size_checks(&self) -> &[SizeCheck] {
        &self.size_checks
    }

    pub fn take_size_checks(&mut self) -> Vec<SizeCheck> {
        std::mem::take(&mut self.size_checks)
    }
}
