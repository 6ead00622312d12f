// Tue Jan 13 2026 - Alex

use crate::structure::{ReconstructorSettings, StructureError};
use crate::symbol::{SymbolGraph, SymbolId, UdtKind, UdtMember};
use itertools::Itertools;

/// One entry of a bitfield storage unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitfieldSlot<'a> {
    Member(&'a UdtMember),
    /// Unnamed filler keeping the following bitfield at its recorded position.
    Gap { position: u32, length: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind<'a> {
    Field(&'a UdtMember),
    Bitfield(Vec<BitfieldSlot<'a>>),
}

/// A member, or a run of bitfields sharing one storage slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUnit<'a> {
    pub offset: u64,
    pub size: u64,
    pub kind: UnitKind<'a>,
}

impl<'a> StorageUnit<'a> {
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    pub fn is_bitfield(&self) -> bool {
        matches!(self.kind, UnitKind::Bitfield(_))
    }

    /// Member whose type spells the storage unit.
    pub fn leading_member(&self) -> Option<&'a UdtMember> {
        match &self.kind {
            UnitKind::Field(member) => Some(*member),
            UnitKind::Bitfield(slots) => slots.iter().find_map(|slot| match slot {
                BitfieldSlot::Member(member) => Some(*member),
                BitfieldSlot::Gap { .. } => None,
            }),
        }
    }
}

/// Members of a struct that overlap each other, printed as an anonymous union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapGroup<'a> {
    pub offset: u64,
    pub size: u64,
    pub alternatives: Vec<Alternative<'a>>,
}

/// One arm of an overlap group: a lone unit or a struct of consecutive units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative<'a> {
    pub items: Vec<LayoutItem<'a>>,
}

impl<'a> Alternative<'a> {
    /// A lone plain member is printed without a wrapping struct.
    pub fn is_single_field(&self) -> bool {
        matches!(
            self.items.as_slice(),
            [LayoutItem::Unit(StorageUnit { kind: UnitKind::Field(_), .. })]
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutItem<'a> {
    Unit(StorageUnit<'a>),
    Padding { offset: u64, size: u64 },
    Union(OverlapGroup<'a>),
}

impl<'a> LayoutItem<'a> {
    pub fn offset(&self) -> u64 {
        match self {
            Self::Unit(unit) => unit.offset,
            Self::Padding { offset, .. } => *offset,
            Self::Union(group) => group.offset,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Self::Unit(unit) => unit.size,
            Self::Padding { size, .. } => *size,
            Self::Union(group) => group.size,
        }
    }

    pub fn end(&self) -> u64 {
        self.offset() + self.size()
    }

    pub fn is_padding(&self) -> bool {
        matches!(self, Self::Padding { .. })
    }
}

/// Planned member layout of one UDT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdtLayout<'a> {
    pub kind: UdtKind,
    pub size: u64,
    pub items: Vec<LayoutItem<'a>>,
}

impl<'a> UdtLayout<'a> {
    /// Bytes accounted for by the planned items of a struct.
    pub fn covered_size(&self) -> u64 {
        match self.kind {
            UdtKind::Union => self.items.iter().map(|item| item.end()).max().unwrap_or(0),
            UdtKind::Struct | UdtKind::Class => self.items.iter().map(|item| item.size()).sum(),
        }
    }

    pub fn padding_bytes(&self) -> u64 {
        self.items
            .iter()
            .filter(|item| item.is_padding())
            .map(|item| item.size())
            .sum()
    }
}

pub struct LayoutPlanner<'g> {
    graph: &'g SymbolGraph,
    create_padding: bool,
    allow_bitfields_in_union: bool,
}

impl<'g> LayoutPlanner<'g> {
    pub fn new(graph: &'g SymbolGraph, settings: &ReconstructorSettings) -> Self {
        Self {
            graph,
            create_padding: settings.create_padding_members,
            allow_bitfields_in_union: settings.allow_bitfields_in_union,
        }
    }

    pub fn member_size(&self, member: &UdtMember) -> u64 {
        self.graph[self.graph.resolve_typedefs(member.symbol)].size
    }

    pub fn plan(&self, id: SymbolId) -> Result<UdtLayout<'g>, StructureError> {
        let graph = self.graph;
        let symbol = &graph[id];
        let kind = symbol.udt_kind().unwrap_or(UdtKind::Struct);
        let members: Vec<&'g UdtMember> = symbol
            .members()
            .iter()
            .sorted_by_key(|member| member.offset)
            .collect();

        let items = if kind.is_union() {
            self.plan_union(symbol.name().unwrap_or("<anonymous>"), symbol.size, members)?
        } else {
            self.plan_struct(symbol.size, members)
        };

        Ok(UdtLayout {
            kind,
            size: symbol.size,
            items,
        })
    }

    fn plan_union(&self, name: &str, size: u64, members: Vec<&'g UdtMember>) -> Result<Vec<LayoutItem<'g>>, StructureError> {
        if !self.allow_bitfields_in_union && members.iter().any(|member| member.is_bitfield()) {
            return Err(StructureError::UnionBitfieldViolation { name: name.to_string() });
        }

        let mut items: Vec<LayoutItem<'g>> = members
            .into_iter()
            .map(|member| {
                let kind = if member.is_bitfield() {
                    UnitKind::Bitfield(vec![BitfieldSlot::Member(member)])
                } else {
                    UnitKind::Field(member)
                };
                LayoutItem::Unit(StorageUnit {
                    offset: member.offset,
                    size: self.member_size(member),
                    kind,
                })
            })
            .collect();

        let widest = items.iter().map(|item| item.end()).max().unwrap_or(0);
        if self.create_padding && widest < size {
            items.push(LayoutItem::Padding { offset: 0, size });
        }
        Ok(items)
    }

    fn plan_struct(&self, size: u64, members: Vec<&'g UdtMember>) -> Vec<LayoutItem<'g>> {
        let units = self.storage_units(members);
        let grouped = self.group_overlaps(units);

        let mut items = Vec::with_capacity(grouped.len());
        let mut cursor = 0u64;
        for item in grouped {
            if self.create_padding && item.offset() > cursor {
                items.push(LayoutItem::Padding {
                    offset: cursor,
                    size: item.offset() - cursor,
                });
            }
            cursor = cursor.max(item.end());
            items.push(item);
        }

        if cursor > size {
            log::warn!("members end at 0x{:x}, past the declared size 0x{:x}", cursor, size);
        } else if self.create_padding && size > cursor {
            items.push(LayoutItem::Padding {
                offset: cursor,
                size: size - cursor,
            });
        }
        items
    }

    /// Folds consecutive bitfields sharing one storage slot into a single unit.
    fn storage_units(&self, members: Vec<&'g UdtMember>) -> Vec<StorageUnit<'g>> {
        let mut units = Vec::with_capacity(members.len());
        let mut members = members.into_iter().peekable();

        while let Some(member) = members.next() {
            let size = self.member_size(member);
            let Some(bits) = member.bits else {
                units.push(StorageUnit {
                    offset: member.offset,
                    size,
                    kind: UnitKind::Field(member),
                });
                continue;
            };

            let mut slots = Vec::new();
            if self.create_padding && bits.position > 0 {
                slots.push(BitfieldSlot::Gap { position: 0, length: bits.position });
            }
            slots.push(BitfieldSlot::Member(member));

            let mut bit_end = bits.end();
            while let Some(next) = members.peek() {
                let next_bits = match next.bits {
                    Some(next_bits)
                        if next.offset == member.offset
                            && self.member_size(next) == size
                            && next_bits.position >= bit_end =>
                    {
                        next_bits
                    }
                    _ => break,
                };

                if self.create_padding && next_bits.position > bit_end {
                    slots.push(BitfieldSlot::Gap {
                        position: bit_end,
                        length: next_bits.position - bit_end,
                    });
                }
                slots.push(BitfieldSlot::Member(next));
                bit_end = next_bits.end();
                members.next();
            }

            units.push(StorageUnit {
                offset: member.offset,
                size,
                kind: UnitKind::Bitfield(slots),
            });
        }
        units
    }

    fn group_overlaps(&self, units: Vec<StorageUnit<'g>>) -> Vec<LayoutItem<'g>> {
        let mut items = Vec::new();
        let mut run: Vec<StorageUnit<'g>> = Vec::new();
        let mut run_end = 0u64;

        for unit in units {
            if !run.is_empty() && unit.offset < run_end {
                run_end = run_end.max(unit.end());
                run.push(unit);
                continue;
            }
            if !run.is_empty() {
                items.push(self.finish_run(std::mem::take(&mut run), run_end));
            }
            run_end = unit.end();
            run.push(unit);
        }
        if !run.is_empty() {
            items.push(self.finish_run(run, run_end));
        }
        items
    }

    fn finish_run(&self, mut run: Vec<StorageUnit<'g>>, run_end: u64) -> LayoutItem<'g> {
        if run.len() == 1 {
            if let Some(unit) = run.pop() {
                return LayoutItem::Unit(unit);
            }
        }

        let start = run.first().map(|unit| unit.offset).unwrap_or(0);
        let mut arms: Vec<(u64, Vec<StorageUnit<'g>>)> = Vec::new();
        for unit in run {
            let slot = if unit.offset == start {
                None
            } else {
                arms.iter().rposition(|(end, _)| *end <= unit.offset)
            };
            match slot {
                Some(index) => {
                    arms[index].0 = unit.end();
                    arms[index].1.push(unit);
                }
                None => arms.push((unit.end(), vec![unit])),
            }
        }

        let alternatives = arms
            .into_iter()
            .map(|(_, units)| Alternative {
                items: self.pad_sequence(start, units),
            })
            .collect();

        LayoutItem::Union(OverlapGroup {
            offset: start,
            size: run_end - start,
            alternatives,
        })
    }

    fn pad_sequence(&self, start: u64, units: Vec<StorageUnit<'g>>) -> Vec<LayoutItem<'g>> {
        let mut items = Vec::with_capacity(units.len());
        let mut cursor = start;
        for unit in units {
            if self.create_padding && unit.offset > cursor {
                items.push(LayoutItem::Padding {
                    offset: cursor,
                    size: unit.offset - cursor,
                });
            }
            cursor = unit.end();
            items.push(LayoutItem::Unit(unit));
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{BaseKind, GraphBuilder};

    fn planner_for(graph: &SymbolGraph) -> LayoutPlanner<'_> {
        LayoutPlanner::new(graph, &ReconstructorSettings::default())
    }

    #[test]
    fn test_gap_gets_padding() {
        let mut builder = GraphBuilder::new();
        let int = builder.base(BaseKind::Int, 4);
        let s = builder.udt(Some("S"), UdtKind::Struct, 12, vec![
            UdtMember::new("a", int, 0),
            UdtMember::new("b", int, 8),
        ]);
        let graph = builder.build().unwrap();
        let layout = planner_for(&graph).plan(s).unwrap();

        assert_eq!(layout.items.len(), 3);
        assert_eq!(layout.items[1], LayoutItem::Padding { offset: 4, size: 4 });
        assert_eq!(layout.items[2].offset(), 8);
        assert_eq!(layout.covered_size(), 12);
    }

    #[test]
    fn test_trailing_padding() {
        let mut builder = GraphBuilder::new();
        let long = builder.base(BaseKind::Int, 8);
        let byte = builder.base(BaseKind::Char, 1);
        let s = builder.udt(Some("S"), UdtKind::Struct, 16, vec![
            UdtMember::new("value", long, 0),
            UdtMember::new("tag", byte, 8),
        ]);
        let graph = builder.build().unwrap();
        let layout = planner_for(&graph).plan(s).unwrap();

        assert_eq!(layout.items.last(), Some(&LayoutItem::Padding { offset: 9, size: 7 }));
        assert_eq!(layout.padding_bytes(), 7);
        assert_eq!(layout.covered_size(), 16);
    }

    #[test]
    fn test_members_sorted_by_offset() {
        let mut builder = GraphBuilder::new();
        let int = builder.base(BaseKind::Int, 4);
        let s = builder.udt(Some("S"), UdtKind::Struct, 8, vec![
            UdtMember::new("second", int, 4),
            UdtMember::new("first", int, 0),
        ]);
        let graph = builder.build().unwrap();
        let layout = planner_for(&graph).plan(s).unwrap();

        let names: Vec<_> = layout
            .items
            .iter()
            .filter_map(|item| match item {
                LayoutItem::Unit(unit) => unit.leading_member().and_then(|m| m.name()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_bitfields_share_storage_unit() {
        let mut builder = GraphBuilder::new();
        let ulong = builder.base(BaseKind::ULong, 4);
        let s = builder.udt(Some("FLAGS"), UdtKind::Struct, 8, vec![
            UdtMember::new("A", ulong, 0).with_bits(0, 1),
            UdtMember::new("B", ulong, 0).with_bits(1, 3),
            UdtMember::new("C", ulong, 0).with_bits(8, 24),
            UdtMember::new("Next", ulong, 4),
        ]);
        let graph = builder.build().unwrap();
        let layout = planner_for(&graph).plan(s).unwrap();

        assert_eq!(layout.items.len(), 2);
        let LayoutItem::Unit(unit) = &layout.items[0] else { panic!("expected a storage unit") };
        let UnitKind::Bitfield(slots) = &unit.kind else { panic!("expected bitfields") };
        assert_eq!(unit.size, 4);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[2], BitfieldSlot::Gap { position: 4, length: 4 });
        assert!(!layout.items.iter().any(|item| item.is_padding()));
    }

    #[test]
    fn test_overlapping_bitfields_start_new_unit() {
        let mut builder = GraphBuilder::new();
        let ulong = builder.base(BaseKind::ULong, 4);
        let s = builder.udt(Some("HEADER"), UdtKind::Struct, 4, vec![
            UdtMember::new("Lock", ulong, 0).with_bits(0, 1),
            UdtMember::new("Rest", ulong, 0).with_bits(1, 31),
            UdtMember::new("Value", ulong, 0),
        ]);
        let graph = builder.build().unwrap();
        let layout = planner_for(&graph).plan(s).unwrap();

        assert_eq!(layout.items.len(), 1);
        let LayoutItem::Union(group) = &layout.items[0] else { panic!("expected an overlap group") };
        assert_eq!(group.size, 4);
        assert_eq!(group.alternatives.len(), 2);
        assert!(!group.alternatives[0].is_single_field());
        assert!(group.alternatives[1].is_single_field());
        assert_eq!(layout.covered_size(), 4);
    }

    #[test]
    fn test_overlap_alternative_collects_following_members() {
        let mut builder = GraphBuilder::new();
        let int = builder.base(BaseKind::Int, 4);
        let long = builder.base(BaseKind::Int, 8);
        let s = builder.udt(Some("LARGE"), UdtKind::Struct, 8, vec![
            UdtMember::new("LowPart", int, 0),
            UdtMember::new("HighPart", int, 4),
            UdtMember::new("QuadPart", long, 0),
        ]);
        let graph = builder.build().unwrap();
        let layout = planner_for(&graph).plan(s).unwrap();

        let LayoutItem::Union(group) = &layout.items[0] else { panic!("expected an overlap group") };
        assert_eq!(group.alternatives.len(), 2);
        assert_eq!(group.alternatives[0].items.len(), 2);
        assert!(group.alternatives[1].is_single_field());
    }

    #[test]
    fn test_union_bitfields_rejected() {
        let mut builder = GraphBuilder::new();
        let ulong = builder.base(BaseKind::ULong, 4);
        let u = builder.udt(Some("_U"), UdtKind::Union, 4, vec![
            UdtMember::new("Bits", ulong, 0).with_bits(0, 4),
            UdtMember::new("Value", ulong, 0),
        ]);
        let graph = builder.build().unwrap();

        let result = planner_for(&graph).plan(u);
        assert!(matches!(result, Err(StructureError::UnionBitfieldViolation { .. })));

        let settings = ReconstructorSettings::default().with_bitfields_in_union(true);
        let layout = LayoutPlanner::new(&graph, &settings).plan(u).unwrap();
        assert_eq!(layout.items.len(), 2);
    }

    #[test]
    fn test_union_gets_no_gap_padding() {
        let mut builder = GraphBuilder::new();
        let int = builder.base(BaseKind::Int, 4);
        let byte = builder.base(BaseKind::Char, 1);
        let u = builder.udt(Some("_U"), UdtKind::Union, 4, vec![
            UdtMember::new("Value", int, 0),
            UdtMember::new("Byte", byte, 0),
        ]);
        let graph = builder.build().unwrap();
        let layout = planner_for(&graph).plan(u).unwrap();

        assert_eq!(layout.items.len(), 2);
        assert_eq!(layout.padding_bytes(), 0);
    }

    #[test]
    fn test_padding_disabled() {
        let mut builder = GraphBuilder::new();
        let int = builder.base(BaseKind::Int, 4);
        let s = builder.udt(Some("S"), UdtKind::Struct, 16, vec![
            UdtMember::new("a", int, 0),
            UdtMember::new("b", int, 8),
        ]);
        let graph = builder.build().unwrap();
        let settings = ReconstructorSettings::default().with_padding(false);
        let layout = LayoutPlanner::new(&graph, &settings).plan(s).unwrap();

        assert_eq!(layout.items.len(), 2);
        assert_eq!(layout.padding_bytes(), 0);
    }
}
