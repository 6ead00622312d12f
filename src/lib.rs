// Tue Jan 15 2026 - Alex

pub mod config;
pub mod extractor;
pub mod output;
pub mod structure;
pub mod symbol;
pub mod ui;

pub use config::Config;
pub use extractor::{ExtractError, ExtractSummary, Extractor};
pub use structure::{HeaderReconstructor, SymbolSorter, SymbolVisitor};
pub use symbol::{JsonGraphReader, SymbolGraph, SymbolSource};
