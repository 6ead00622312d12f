// Tue Jan 13 2026 - Alex

pub mod error;

pub use error::ExtractError;

use crate::config::Config;
use crate::output::{file_banner, test_harness, OutputManager};
use crate::structure::{CFieldDefinition, ImageArchitecture, MemberExpansion, SymbolSorter, SymbolVisitor};
use crate::symbol::{SymbolGraph, SymbolId, SymbolSource};
use indexmap::IndexSet;
use std::io::Write;
use std::path::Path;

type CVisitor<'g> = SymbolVisitor<'g, CFieldDefinition>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub architecture: ImageArchitecture,
    pub declarations: usize,
    pub definitions: usize,
}

/// Drives one reconstruction run from a loaded graph to the output files.
pub struct Extractor {
    config: Config,
}

impl Extractor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self, source: &dyn SymbolSource) -> Result<ExtractSummary, ExtractError> {
        self.config.validate().map_err(ExtractError::InvalidParameters)?;

        let mut graph = source.open(&self.config.graph_path)?;
        let coerced = graph.normalize(self.config.field.coerce_zero_length_arrays);
        if coerced > 0 {
            log::debug!("normalized {} zero-length arrays", coerced);
        }

        // Resolved before any output file is created so a bad name truncates nothing.
        let target = self.resolve_target(&graph)?;

        let mut output = OutputManager::open(
            self.config.output_file.as_deref(),
            self.config.test_file.as_deref(),
        )?;
        let summary = self.generate(&graph, target, &mut output)?;
        output.flush()?;

        log::info!(
            "wrote {} declarations and {} definitions ({})",
            summary.declarations,
            summary.definitions,
            summary.architecture
        );
        Ok(summary)
    }

    /// `None` selects every top-level symbol.
    pub fn resolve_target(&self, graph: &SymbolGraph) -> Result<Option<SymbolId>, ExtractError> {
        if self.config.dumps_all() {
            return Ok(None);
        }
        graph
            .lookup_by_name(&self.config.symbol_name)
            .map(Some)
            .ok_or_else(|| ExtractError::SymbolNotFound(self.config.symbol_name.clone()))
    }

    pub fn generate(&self, graph: &SymbolGraph, target: Option<SymbolId>, output: &mut OutputManager) -> Result<ExtractSummary, ExtractError> {
        let mut summary = ExtractSummary {
            architecture: detect_architecture(graph),
            ..ExtractSummary::default()
        };

        if self.config.print_header {
            let banner = file_banner(&self.config.graph_path, summary.architecture);
            output.header().write_all(banner.as_bytes())?;
        }

        let mut visitor = CVisitor::new(graph, self.config.reconstructor.clone(), self.config.field.clone());
        let mut sorter = SymbolSorter::new(graph);

        match target {
            None => {
                for (id, _) in graph.symbol_map() {
                    sorter.visit(id);
                }
                self.emit_sorted(sorter.sorted_symbols(), None, &mut visitor, output.header(), &mut summary)?;
            }
            Some(id) if self.config.print_referenced_types
                && self.config.reconstructor.expansion != MemberExpansion::InlineAll =>
            {
                sorter.visit(id);
                let requested = graph.resolve_typedefs(id);
                self.emit_sorted(sorter.sorted_symbols(), Some(requested), &mut visitor, output.header(), &mut summary)?;
            }
            Some(id) => {
                if self.config.print_definitions && visitor.run(id, output.header())? {
                    summary.definitions += 1;
                }
            }
        }

        if let Some(test) = output.test() {
            let include = self.config.output_file.as_deref().unwrap_or(Path::new("header.h"));
            let harness = test_harness(include, visitor.reconstructor().size_checks());
            test.write_all(harness.as_bytes())?;
        }

        Ok(summary)
    }

    fn emit_sorted(
        &self,
        sorted: &IndexSet<SymbolId>,
        requested: Option<SymbolId>,
        visitor: &mut CVisitor<'_>,
        out: &mut dyn Write,
        summary: &mut ExtractSummary,
    ) -> Result<(), ExtractError> {
        let standalone: Vec<SymbolId> = sorted
            .iter()
            .copied()
            .filter(|&id| visitor.reconstructor().is_standalone(id) || Some(id) == requested)
            .collect();

        if self.config.print_declarations {
            for &id in &standalone {
                if visitor.declare(id, out)? {
                    summary.declarations += 1;
                }
            }
            if summary.declarations > 0 {
                writeln!(out)?;
            }
        }

        if self.config.print_definitions {
            for &id in &standalone {
                if visitor.run(id, out)? {
                    summary.definitions += 1;
                }
            }
        }
        Ok(())
    }
}

/// Walks top-level symbols until a pointer reveals the image's word size.
pub fn detect_architecture(graph: &SymbolGraph) -> ImageArchitecture {
    let mut sorter = SymbolSorter::new(graph);
    for (id, _) in graph.symbol_map() {
        sorter.visit(id);
        if sorter.image_architecture() != ImageArchitecture::None {
            break;
        }
    }
    let architecture = sorter.image_architecture();
    sorter.clear();
    architecture
}
