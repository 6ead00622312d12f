// Tue Jan 15 2026 - Alex

use crate::symbol::{SymbolData, SymbolGraph, SymbolId};
use indexmap::IndexSet;
use std::collections::{HashSet, VecDeque};
use std::fmt;

/// Pointer width observed while walking the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageArchitecture {
    #[default]
    None,
    X86,
    X64,
}

impl ImageArchitecture {
    pub fn from_pointer_size(size: u64) -> Self {
        match size {
            4 => Self::X86,
            8 => Self::X64,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::X86 => "x86",
            Self::X64 => "x64",
        }
    }
}

impl fmt::Display for ImageArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Orders aggregates so that every by-value dependency precedes its user.
///
/// Pointer targets do not constrain the order; they are queued and visited
/// after the current root, which keeps self-referencing types from looping.
pub struct SymbolSorter<'g> {
    graph: &'g SymbolGraph,
    visited: HashSet<SymbolId>,
    sorted: IndexSet<SymbolId>,
    deferred: VecDeque<SymbolId>,
    architecture: ImageArchitecture,
}

impl<'g> SymbolSorter<'g> {
    pub fn new(graph: &'g SymbolGraph) -> Self {
        Self {
            graph,
            visited: HashSet::new(),
            sorted: IndexSet::new(),
            deferred: VecDeque::new(),
            architecture: ImageArchitecture::None,
        }
    }

    pub fn visit(&mut self, id: SymbolId) {
        self.visit_by_value(id);
        while let Some(next) = self.deferred.pop_front() {
            self.visit_by_value(next);
        }
    }

    fn visit_by_value(&mut self, id: SymbolId) {
        if !self.visited.insert(id) {
            return;
        }

        let graph = self.graph;
        let symbol = &graph[id];
        match &symbol.data {
            SymbolData::Pointer { child } => {
                if self.architecture == ImageArchitecture::None {
                    self.architecture = ImageArchitecture::from_pointer_size(symbol.size);
                }
                if !self.visited.contains(child) {
                    self.deferred.push_back(*child);
                }
            }
            SymbolData::Array { child, .. } | SymbolData::Typedef { child } => self.visit_by_value(*child),
            SymbolData::Udt { members, .. } => {
                for member in members {
                    self.visit_by_value(member.symbol);
                }
                self.sorted.insert(id);
            }
            SymbolData::Enum { .. } => {
                self.sorted.insert(id);
            }
            SymbolData::Base(_) | SymbolData::Function { .. } | SymbolData::EnumValue { .. } => {}
        }
    }

    /// Aggregates in dependency order.
    pub fn sorted_symbols(&self) -> &IndexSet<SymbolId> {
        &self.sorted
    }

    pub fn image_architecture(&self) -> ImageArchitecture {
        self.architecture
    }

    /// Forgets every visited symbol. The detected architecture is kept.
    pub fn clear(&mut self) {
        self.visited.clear();
        self.sorted.clear();
        self.deferred.clear();
    }
}
