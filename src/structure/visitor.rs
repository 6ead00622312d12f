// Tue Jan 15 2026 - Alex

use crate::structure::layout::{BitfieldSlot, LayoutItem, LayoutPlanner, OverlapGroup, StorageUnit, UnitKind};
use crate::structure::{FieldDefinition, HeaderReconstructor, ReconstructorSettings, StructureError};
use crate::symbol::{SymbolData, SymbolGraph, SymbolId, UdtKind, UdtMember};
use std::io::Write;

/// Where a member's type chain ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainEnd {
    /// An aggregate to print in place.
    Inline(SymbolId),
    /// An aggregate referenced by its tag.
    Tagged(SymbolId),
    Plain,
}

/// Walks one type and emits its C definition.
///
/// Member declarators are built by `F`; everything else (layout, padding,
/// nesting) is decided here and written through the reconstructor.
pub struct SymbolVisitor<'g, F: FieldDefinition> {
    graph: &'g SymbolGraph,
    reconstructor: HeaderReconstructor<'g>,
    field_settings: F::Settings,
    expanding: Vec<SymbolId>,
}

impl<'g, F: FieldDefinition> SymbolVisitor<'g, F> {
    pub fn new(graph: &'g SymbolGraph, settings: ReconstructorSettings, field_settings: F::Settings) -> Self {
        Self {
            graph,
            reconstructor: HeaderReconstructor::new(graph, settings),
            field_settings,
            expanding: Vec::new(),
        }
    }

    pub fn reconstructor(&self) -> &HeaderReconstructor<'g> {
        &self.reconstructor
    }

    pub fn reconstructor_mut(&mut self) -> &mut HeaderReconstructor<'g> {
        &mut self.reconstructor
    }

    /// Emits the full definition of `id` and returns whether anything was written.
    /// Symbols that are not aggregates (after typedef resolution) produce no output.
    pub fn run(&mut self, id: SymbolId, out: &mut dyn Write) -> Result<bool, StructureError> {
        let graph = self.graph;
        let resolved = graph.resolve_typedefs(id);
        let symbol = &graph[resolved];

        match &symbol.data {
            SymbolData::Udt { .. } => self.define_udt(resolved, out).map(|_| true),
            SymbolData::Enum { .. } => self.define_enum(resolved, out).map(|_| true),
            _ => {
                log::debug!("{} {} has no definition to emit", symbol.tag(), symbol.name().unwrap_or("<anonymous>"));
                Ok(false)
            }
        }
    }

    /// Emits a forward declaration for a UDT. Returns whether anything was written.
    pub fn declare(&mut self, id: SymbolId, out: &mut dyn Write) -> Result<bool, StructureError> {
        if !self.graph[id].is_udt() {
            return Ok(false);
        }
        self.reconstructor.write_declaration(out, id)?;
        Ok(true)
    }

    fn define_udt(&mut self, id: SymbolId, out: &mut dyn Write) -> Result<(), StructureError> {
        let planner = LayoutPlanner::new(self.graph, self.reconstructor.settings());
        let layout = planner.plan(id)?;

        self.reconstructor.begin_definition(out, id)?;
        self.expanding.push(id);
        let result = self.emit_items(&layout.items, 1, 0, out);
        self.expanding.pop();
        result?;
        self.reconstructor.end_definition(out, id)?;
        Ok(())
    }

    fn define_enum(&mut self, id: SymbolId, out: &mut dyn Write) -> Result<(), StructureError> {
        self.reconstructor.begin_definition(out, id)?;
        self.emit_enum_values(id, 1, out)?;
        self.reconstructor.end_definition(out, id)?;
        Ok(())
    }

    fn emit_enum_values(&mut self, id: SymbolId, depth: usize, out: &mut dyn Write) -> Result<(), StructureError> {
        let graph = self.graph;
        for &value_id in graph[id].enum_values() {
            let constant = &graph[value_id];
            if let SymbolData::EnumValue { value } = constant.data {
                self.reconstructor
                    .write_enum_value(out, depth, constant.name().unwrap_or("_"), value)?;
            }
        }
        Ok(())
    }

    fn emit_items(&mut self, items: &[LayoutItem<'g>], depth: usize, base: u64, out: &mut dyn Write) -> Result<(), StructureError> {
        for item in items {
            match item {
                LayoutItem::Unit(unit) => self.emit_unit(unit, depth, base, out)?,
                LayoutItem::Padding { offset, size } => {
                    self.reconstructor.write_padding(out, depth, base + offset, *size)?
                }
                LayoutItem::Union(group) => self.emit_group(group, depth, base, out)?,
            }
        }
        Ok(())
    }

    fn emit_unit(&mut self, unit: &StorageUnit<'g>, depth: usize, base: u64, out: &mut dyn Write) -> Result<(), StructureError> {
        match &unit.kind {
            UnitKind::Field(member) => self.emit_member(member, depth, base, out),
            UnitKind::Bitfield(slots) => {
                let offset = base + unit.offset;
                let storage = unit.leading_member().map(|member| member.symbol);
                for slot in slots {
                    match slot {
                        BitfieldSlot::Member(member) => {
                            let mut def = F::new(&self.field_settings);
                            self.describe(&mut def, member.symbol, false);
                            def.set_member_name(member.name().unwrap_or(""));
                            let bits = member.bits.unwrap_or_default();
                            let text = format!("{} : {}", def.render(), bits.length);
                            self.reconstructor.write_field(out, depth, offset, &text, Some(bits.position))?;
                        }
                        BitfieldSlot::Gap { position, length } => {
                            let Some(storage) = storage else { continue };
                            let mut def = F::new(&self.field_settings);
                            self.describe(&mut def, storage, false);
                            let text = format!("{} : {}", def.render(), length);
                            self.reconstructor.write_field(out, depth, offset, &text, Some(*position))?;
                        }
                    }
                }
                Ok(())
            }
        }
    }

    fn emit_member(&mut self, member: &UdtMember, depth: usize, base: u64, out: &mut dyn Write) -> Result<(), StructureError> {
        let offset = base + member.offset;
        let mut def = F::new(&self.field_settings);
        let end = self.describe(&mut def, member.symbol, true);

        let name = match (member.name(), end) {
            (Some(name), _) => name.to_string(),
            (None, ChainEnd::Inline(target) | ChainEnd::Tagged(target))
                if !self.reconstructor.settings().allow_anonymous_data_types =>
            {
                self.reconstructor.synthetic_member_name(target)
            }
            (None, _) => String::new(),
        };
        def.set_member_name(&name);

        match end {
            ChainEnd::Inline(target) => self.emit_inline(target, &def.render(), offset, depth, out),
            ChainEnd::Tagged(_) | ChainEnd::Plain => {
                self.reconstructor.write_field(out, depth, offset, &def.render(), None)?;
                Ok(())
            }
        }
    }

    /// Feeds the type chain of `id` to `def`, outermost wrapper first.
    /// Reports whether the chain ends in an aggregate and how it is printed.
    fn describe(&mut self, def: &mut F, id: SymbolId, allow_inline: bool) -> ChainEnd {
        let graph = self.graph;
        let mut current = id;
        let mut through_pointer = false;

        for _ in 0..=graph.len() {
            let symbol = &graph[current];
            match &symbol.data {
                SymbolData::Typedef { child } => current = *child,
                SymbolData::Pointer { child } => {
                    def.visit_pointer_end(symbol);
                    through_pointer = true;
                    current = *child;
                }
                SymbolData::Array { child, .. } => {
                    def.visit_array_end(symbol);
                    current = *child;
                }
                SymbolData::Function { .. } => {
                    def.visit_function_end(symbol);
                    return ChainEnd::Plain;
                }
                SymbolData::Base(_) | SymbolData::EnumValue { .. } => {
                    def.visit_base_type(symbol);
                    return ChainEnd::Plain;
                }
                SymbolData::Udt { .. } | SymbolData::Enum { .. } => {
                    if allow_inline
                        && !through_pointer
                        && !self.expanding.contains(&current)
                        && self.reconstructor.should_inline(current)
                    {
                        return ChainEnd::Inline(current);
                    }
                    let keyword = match symbol.udt_kind() {
                        Some(kind) => kind.keyword(),
                        None => "enum",
                    };
                    let name = self.reconstructor.corrected_name(current);
                    def.visit_named_type(keyword, &name);
                    return ChainEnd::Tagged(current);
                }
            }
        }

        log::warn!("type chain of {} does not terminate", id);
        ChainEnd::Plain
    }

    fn emit_inline(&mut self, target: SymbolId, declarator: &str, offset: u64, depth: usize, out: &mut dyn Write) -> Result<(), StructureError> {
        let header = self.reconstructor.inline_header(target);
        let size = self.graph[target].size;

        self.reconstructor.begin_inline(out, depth, offset, &header)?;
        if self.graph[target].is_enum() {
            self.emit_enum_values(target, depth + 1, out)?;
        } else {
            let planner = LayoutPlanner::new(self.graph, self.reconstructor.settings());
            let layout = planner.plan(target)?;
            self.expanding.push(target);
            let result = self.emit_items(&layout.items, depth + 1, offset, out);
            self.expanding.pop();
            result?;
        }
        self.reconstructor.end_inline(out, depth, declarator, Some(size))?;
        Ok(())
    }

    /// Overlapping struct members, printed as an anonymous union of alternatives.
    fn emit_group(&mut self, group: &OverlapGroup<'g>, depth: usize, base: u64, out: &mut dyn Write) -> Result<(), StructureError> {
        let anonymous = self.reconstructor.settings().allow_anonymous_data_types;
        let offset = base + group.offset;

        let (header, member) = if anonymous {
            ("union".to_string(), String::new())
        } else {
            let (tag, member) = self.reconstructor.synthetic_group_names(UdtKind::Union);
            (format!("union {}", tag), member)
        };
        self.reconstructor.begin_inline(out, depth, offset, &header)?;

        for alternative in &group.alternatives {
            if alternative.is_single_field() {
                self.emit_items(&alternative.items, depth + 1, base, out)?;
                continue;
            }

            let bitfield_only = matches!(
                alternative.items.as_slice(),
                [LayoutItem::Unit(unit)] if unit.is_bitfield()
            );
            let keyword = if bitfield_only { "struct /* bitfield */" } else { "struct" };
            let (header, member) = if anonymous {
                (keyword.to_string(), String::new())
            } else {
                let (tag, member) = self.reconstructor.synthetic_group_names(UdtKind::Struct);
                (format!("struct {}", tag), member)
            };
            let start = alternative.items.first().map(|item| item.offset()).unwrap_or(group.offset);
            let end = alternative.items.last().map(|item| item.end()).unwrap_or(start);

            self.reconstructor.begin_inline(out, depth + 1, base + start, &header)?;
            self.emit_items(&alternative.items, depth + 2, base, out)?;
            self.reconstructor.end_inline(out, depth + 1, &member, Some(end - start))?;
        }

        self.reconstructor.end_inline(out, depth, &member, Some(group.size))?;
        Ok(())
    }
}
