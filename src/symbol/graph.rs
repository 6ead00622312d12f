// Tue Jan 13 2026 - Alex

use crate::symbol::{BaseKind, Symbol, SymbolData, SymbolError, SymbolId, UdtKind, UdtMember};
use indexmap::IndexMap;
use std::ops::Index;

/// Arena holding every symbol of one debug database.
///
/// Pointer, array and typedef edges are indices into the arena, so shared and
/// self-referencing types need no ownership juggling.
#[derive(Debug, Clone, Default)]
pub struct SymbolGraph {
    symbols: Vec<Symbol>,
    top_level: Vec<SymbolId>,
    names: IndexMap<String, SymbolId>,
}

impl SymbolGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| (SymbolId::new(index), symbol))
    }

    /// Top-level symbols in database order.
    pub fn symbol_map(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.top_level.iter().map(move |&id| (id, self.get(id)))
    }

    pub fn top_level_count(&self) -> usize {
        self.top_level.len()
    }

    /// First top-level symbol carrying `name`.
    pub fn lookup_by_name(&self, name: &str) -> Option<SymbolId> {
        self.names.get(name).copied()
    }

    /// Follows typedef edges until a non-typedef symbol is reached.
    pub fn resolve_typedefs(&self, mut id: SymbolId) -> SymbolId {
        let mut hops = 0;
        while let SymbolData::Typedef { child } = self.get(id).data {
            id = child;
            hops += 1;
            if hops > self.symbols.len() {
                break;
            }
        }
        id
    }

    /// Applies the in-place corrections required before layout.
    ///
    /// Zero-element arrays get a stored size of 1 so that the member they belong
    /// to still occupies a storage slot. Returns how many symbols were changed;
    /// reapplying the pass changes nothing.
    pub fn normalize(&mut self, coerce_zero_length_arrays: bool) -> usize {
        if !coerce_zero_length_arrays {
            return 0;
        }

        let mut changed = 0;
        for symbol in &mut self.symbols {
            if let SymbolData::Array { element_count: 0, .. } = symbol.data {
                if symbol.size != 1 {
                    log::debug!(
                        "coercing zero-length array {} to a pointer",
                        symbol.name().unwrap_or("<anonymous>")
                    );
                    symbol.size = 1;
                    changed += 1;
                }
            }
        }
        changed
    }
}

impl Index<SymbolId> for SymbolGraph {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        self.get(id)
    }
}

/// Incremental constructor for `SymbolGraph`, validated on `build`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    symbols: Vec<Symbol>,
    top_level: Vec<SymbolId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn add(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::new(self.symbols.len());
        self.symbols.push(symbol);
        id
    }

    pub fn add_top_level(&mut self, symbol: Symbol) -> SymbolId {
        let id = self.add(symbol);
        self.top_level.push(id);
        id
    }

    pub fn mark_top_level(&mut self, id: SymbolId) {
        if !self.top_level.contains(&id) {
            self.top_level.push(id);
        }
    }

    pub fn base(&mut self, kind: BaseKind, size: u64) -> SymbolId {
        self.add(Symbol::new(None, size, SymbolData::Base(kind)))
    }

    pub fn pointer(&mut self, child: SymbolId, size: u64) -> SymbolId {
        self.add(Symbol::new(None, size, SymbolData::Pointer { child }))
    }

    pub fn array(&mut self, child: SymbolId, element_count: u64) -> SymbolId {
        let size = self.symbols.get(child.index()).map(|s| s.size).unwrap_or(0) * element_count;
        self.add(Symbol::new(None, size, SymbolData::Array { child, element_count }))
    }

    pub fn function(&mut self, return_type: Option<SymbolId>) -> SymbolId {
        self.add(Symbol::new(None, 0, SymbolData::Function { return_type }))
    }

    pub fn typedef(&mut self, name: &str, child: SymbolId) -> SymbolId {
        let size = self.symbols.get(child.index()).map(|s| s.size).unwrap_or(0);
        self.add_top_level(Symbol::new(Some(name), size, SymbolData::Typedef { child }))
    }

    pub fn udt(&mut self, name: Option<&str>, kind: UdtKind, size: u64, members: Vec<UdtMember>) -> SymbolId {
        self.add_top_level(Symbol::new(name, size, SymbolData::Udt { kind, members }))
    }

    pub fn enumeration(&mut self, name: Option<&str>, size: u64, values: &[(&str, i64)]) -> SymbolId {
        let id = self.add_top_level(Symbol::new(
            name,
            size,
            SymbolData::Enum { underlying: None, values: Vec::new() },
        ));
        let value_ids = values
            .iter()
            .map(|(value_name, value)| {
                self.add(Symbol::new(Some(value_name), 0, SymbolData::EnumValue { value: *value }))
            })
            .collect();
        self.set_enum_values(id, value_ids);
        id
    }

    /// Replaces the member list of a UDT, used to close self-referencing types.
    pub fn set_members(&mut self, id: SymbolId, new_members: Vec<UdtMember>) {
        if let Some(Symbol { data: SymbolData::Udt { members, .. }, .. }) = self.symbols.get_mut(id.index()) {
            *members = new_members;
        }
    }

    pub fn set_enum_values(&mut self, id: SymbolId, new_values: Vec<SymbolId>) {
        if let Some(Symbol { data: SymbolData::Enum { values, .. }, .. }) = self.symbols.get_mut(id.index()) {
            *values = new_values;
        }
    }

    pub fn build(self) -> Result<SymbolGraph, SymbolError> {
        let count = self.symbols.len();
        let check = |owner: usize, id: SymbolId| -> Result<(), SymbolError> {
            if id.index() < count {
                Ok(())
            } else {
                Err(SymbolError::InvalidGraph(format!(
                    "symbol #{} references missing symbol {}",
                    owner, id
                )))
            }
        };

        for (index, symbol) in self.symbols.iter().enumerate() {
            match &symbol.data {
                SymbolData::Pointer { child }
                | SymbolData::Array { child, .. }
                | SymbolData::Typedef { child } => check(index, *child)?,
                SymbolData::Function { return_type } => {
                    if let Some(id) = return_type {
                        check(index, *id)?;
                    }
                }
                SymbolData::Enum { underlying, values } => {
                    if let Some(id) = underlying {
                        check(index, *id)?;
                    }
                    for value in values {
                        check(index, *value)?;
                        if !matches!(self.symbols[value.index()].data, SymbolData::EnumValue { .. }) {
                            return Err(SymbolError::InvalidGraph(format!(
                                "enum #{} lists non-constant symbol {}",
                                index, value
                            )));
                        }
                    }
                }
                SymbolData::Udt { members, .. } => {
                    for member in members {
                        check(index, member.symbol)?;
                    }
                }
                SymbolData::Base(_) | SymbolData::EnumValue { .. } => {}
            }
        }

        let mut names = IndexMap::new();
        for &id in &self.top_level {
            check(id.index(), id)?;
            if let Some(name) = self.symbols[id.index()].name() {
                names.entry(name.to_string()).or_insert(id);
            }
        }

        Ok(SymbolGraph {
            symbols: self.symbols,
            top_level: self.top_level,
            names,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_entry_graph() -> (SymbolGraph, SymbolId) {
        let mut builder = GraphBuilder::new();
        let entry = builder.udt(Some("_LIST_ENTRY"), UdtKind::Struct, 16, Vec::new());
        let ptr = builder.pointer(entry, 8);
        builder.set_members(entry, vec![
            UdtMember::new("Flink", ptr, 0),
            UdtMember::new("Blink", ptr, 8),
        ]);
        (builder.build().unwrap(), entry)
    }

    #[test]
    fn test_self_reference_through_pointer() {
        let (graph, entry) = list_entry_graph();
        let members = graph[entry].members();
        assert_eq!(members.len(), 2);
        assert_eq!(graph[members[0].symbol].child(), Some(entry));
    }

    #[test]
    fn test_lookup_by_name_first_wins() {
        let mut builder = GraphBuilder::new();
        let first = builder.udt(Some("_DUP"), UdtKind::Struct, 4, Vec::new());
        builder.udt(Some("_DUP"), UdtKind::Struct, 8, Vec::new());
        let graph = builder.build().unwrap();

        assert_eq!(graph.lookup_by_name("_DUP"), Some(first));
        assert_eq!(graph.lookup_by_name("NoSuchType"), None);
        assert_eq!(graph.top_level_count(), 2);
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let mut builder = GraphBuilder::new();
        builder.pointer(SymbolId::new(42), 8);
        assert!(matches!(builder.build(), Err(SymbolError::InvalidGraph(_))));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut builder = GraphBuilder::new();
        let int = builder.base(BaseKind::Int, 4);
        let empty = builder.array(int, 0);
        let mut graph = builder.build().unwrap();

        assert_eq!(graph[empty].size, 0);
        assert_eq!(graph.normalize(true), 1);
        assert_eq!(graph[empty].size, 1);
        assert_eq!(graph.normalize(true), 0);
        assert_eq!(graph[empty].size, 1);
    }

    #[test]
    fn test_normalize_disabled() {
        let mut builder = GraphBuilder::new();
        let int = builder.base(BaseKind::Int, 4);
        let empty = builder.array(int, 0);
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.normalize(false), 0);
        assert_eq!(graph[empty].size, 0);
    }

    #[test]
    fn test_resolve_typedefs() {
        let mut builder = GraphBuilder::new();
        let int = builder.base(BaseKind::ULong, 4);
        let alias = builder.typedef("ULONG", int);
        let graph = builder.build().unwrap();

        assert_eq!(graph.resolve_typedefs(alias), int);
        assert_eq!(graph.lookup_by_name("ULONG"), Some(alias));
    }
}
