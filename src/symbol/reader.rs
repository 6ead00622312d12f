// Tue Jan 13 2026 - Alex

use crate::symbol::{BaseKind, GraphBuilder, Symbol, SymbolData, SymbolError, SymbolGraph, SymbolId, UdtKind, UdtMember};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Producer of a symbol graph from some on-disk debug database.
pub trait SymbolSource {
    fn open(&self, path: &Path) -> Result<SymbolGraph, SymbolError>;
}

/// Reads symbol graphs dumped as JSON documents.
///
/// ```json
/// { "symbols": [
///     { "id": 1, "size": 4, "kind": { "base": "int" } },
///     { "id": 2, "name": "_S", "size": 8, "kind": { "udt": { "kind": "struct",
///       "members": [ { "name": "a", "type": 1, "offset": 0 } ] } } }
/// ] }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGraphReader;

impl JsonGraphReader {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, text: &str) -> Result<SymbolGraph, SymbolError> {
        let document: GraphDocument = serde_json::from_str(text)?;
        document.into_graph()
    }
}

impl SymbolSource for JsonGraphReader {
    fn open(&self, path: &Path) -> Result<SymbolGraph, SymbolError> {
        if !path.is_file() {
            return Err(SymbolError::FileNotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path)?;
        let graph = self.parse(&text)?;
        log::info!("loaded {} symbols ({} top-level) from {}", graph.len(), graph.top_level_count(), path.display());
        Ok(graph)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub symbols: Vec<SymbolRecord>,
    #[serde(default)]
    pub top_level: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: u64,
    pub kind: KindRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindRecord {
    Base(BaseKind),
    Pointer {
        child: u64,
    },
    Array {
        child: u64,
        count: u64,
    },
    Function {
        #[serde(default)]
        return_type: Option<u64>,
    },
    Enum {
        #[serde(default)]
        underlying: Option<u64>,
        #[serde(default)]
        values: Vec<EnumValueRecord>,
    },
    Udt {
        kind: UdtKind,
        #[serde(default)]
        members: Vec<MemberRecord>,
    },
    Typedef {
        child: u64,
    },
}

impl KindRecord {
    fn is_declarable(&self) -> bool {
        matches!(self, Self::Udt { .. } | Self::Enum { .. } | Self::Typedef { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumValueRecord {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: u64,
    pub offset: u64,
    #[serde(default)]
    pub bit_position: Option<u32>,
    #[serde(default)]
    pub bit_length: Option<u32>,
}

impl GraphDocument {
    pub fn into_graph(self) -> Result<SymbolGraph, SymbolError> {
        let mut ids = HashMap::with_capacity(self.symbols.len());
        for (index, record) in self.symbols.iter().enumerate() {
            if ids.insert(record.id, SymbolId::new(index)).is_some() {
                return Err(SymbolError::InvalidGraph(format!("duplicate symbol id {}", record.id)));
            }
        }

        let resolve = |id: u64| -> Result<SymbolId, SymbolError> {
            ids.get(&id)
                .copied()
                .ok_or_else(|| SymbolError::InvalidGraph(format!("reference to unknown symbol id {}", id)))
        };

        let mut builder = GraphBuilder::new();
        let mut pending_values = Vec::new();

        for record in &self.symbols {
            let data = match &record.kind {
                KindRecord::Base(kind) => SymbolData::Base(*kind),
                KindRecord::Pointer { child } => SymbolData::Pointer { child: resolve(*child)? },
                KindRecord::Array { child, count } => SymbolData::Array {
                    child: resolve(*child)?,
                    element_count: *count,
                },
                KindRecord::Function { return_type } => SymbolData::Function {
                    return_type: return_type.map(&resolve).transpose()?,
                },
                KindRecord::Enum { underlying, values } => {
                    pending_values.push((SymbolId::new(builder.len()), values.clone()));
                    SymbolData::Enum {
                        underlying: underlying.map(&resolve).transpose()?,
                        values: Vec::new(),
                    }
                }
                KindRecord::Udt { kind, members } => {
                    let members = members
                        .iter()
                        .map(|m| {
                            let mut member = UdtMember {
                                name: m.name.clone(),
                                symbol: resolve(m.ty)?,
                                offset: m.offset,
                                bits: None,
                            };
                            if let (Some(position), Some(length)) = (m.bit_position, m.bit_length) {
                                member = member.with_bits(position, length);
                            }
                            Ok(member)
                        })
                        .collect::<Result<Vec<_>, SymbolError>>()?;
                    SymbolData::Udt { kind: *kind, members }
                }
                KindRecord::Typedef { child } => SymbolData::Typedef { child: resolve(*child)? },
            };

            builder.add(Symbol {
                name: record.name.clone(),
                size: record.size,
                data,
            });
        }

        for (enum_id, values) in pending_values {
            let value_ids = values
                .iter()
                .map(|v| builder.add(Symbol::new(Some(&v.name), 0, SymbolData::EnumValue { value: v.value })))
                .collect();
            builder.set_enum_values(enum_id, value_ids);
        }

        match &self.top_level {
            Some(top_level) => {
                for id in top_level {
                    builder.mark_top_level(resolve(*id)?);
                }
            }
            None => {
                for (index, record) in self.symbols.iter().enumerate() {
                    if record.kind.is_declarable() {
                        builder.mark_top_level(SymbolId::new(index));
                    }
                }
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTag;

    const SAMPLE: &str = r#"{
        "symbols": [
            { "id": 10, "size": 4, "kind": { "base": "int" } },
            { "id": 11, "size": 4, "kind": { "base": "ulong" } },
            { "id": 20, "name": "_SAMPLE", "size": 16, "kind": { "udt": { "kind": "struct", "members": [
                { "name": "a", "type": 10, "offset": 0 },
                { "name": "Flag", "type": 11, "offset": 4, "bit_position": 0, "bit_length": 1 },
                { "name": "next", "type": 21, "offset": 8 }
            ] } } },
            { "id": 21, "size": 8, "kind": { "pointer": { "child": 20 } } },
            { "id": 30, "name": "_COLOR", "size": 4, "kind": { "enum": { "values": [
                { "name": "Red", "value": 0 },
                { "name": "Green", "value": 1 }
            ] } } }
        ]
    }"#;

    #[test]
    fn test_parse_sample_graph() {
        let graph = JsonGraphReader::new().parse(SAMPLE).unwrap();
        let sample = graph.lookup_by_name("_SAMPLE").unwrap();
        let members = graph[sample].members();

        assert_eq!(graph[sample].tag(), SymbolTag::UserDefinedType);
        assert_eq!(members.len(), 3);
        assert!(members[1].is_bitfield());
        assert_eq!(graph[members[2].symbol].child(), Some(sample));
        assert_eq!(graph.top_level_count(), 2);
    }

    #[test]
    fn test_enum_values_become_constants() {
        let graph = JsonGraphReader::new().parse(SAMPLE).unwrap();
        let color = graph.lookup_by_name("_COLOR").unwrap();
        let values = graph[color].enum_values();

        assert_eq!(values.len(), 2);
        assert_eq!(graph[values[1]].name(), Some("Green"));
        assert_eq!(graph[values[1]].data, SymbolData::EnumValue { value: 1 });
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let text = r#"{ "symbols": [ { "id": 1, "size": 8, "kind": { "pointer": { "child": 99 } } } ] }"#;
        let result = JsonGraphReader::new().parse(text);
        assert!(matches!(result, Err(SymbolError::InvalidGraph(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = JsonGraphReader::new().open(Path::new("/nonexistent/graph.json"));
        assert!(matches!(result, Err(SymbolError::FileNotFound(_))));
    }
}
