// Tue Jan 13 2026 - Alex

use crate::structure::{FieldSettings, ReconstructorSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Symbol name that selects every top-level type.
pub const ALL_SYMBOLS: &str = "*";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub symbol_name: String,
    pub graph_path: PathBuf,
    pub output_file: Option<PathBuf>,
    pub test_file: Option<PathBuf>,
    pub print_referenced_types: bool,
    pub print_header: bool,
    pub print_declarations: bool,
    pub print_definitions: bool,
    pub reconstructor: ReconstructorSettings,
    pub field: FieldSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbol_name: String::new(),
            graph_path: PathBuf::new(),
            output_file: None,
            test_file: None,
            print_referenced_types: true,
            print_header: true,
            print_declarations: true,
            print_definitions: true,
            reconstructor: ReconstructorSettings::default(),
            field: FieldSettings::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON config; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
        serde_json::from_str(&text).map_err(|e| format!("malformed config {}: {}", path.display(), e))
    }

    pub fn with_symbol(mut self, name: &str) -> Self {
        self.symbol_name = name.to_string();
        self
    }

    pub fn with_graph_path(mut self, path: PathBuf) -> Self {
        self.graph_path = path;
        self
    }

    pub fn with_output_file(mut self, path: PathBuf) -> Self {
        self.output_file = Some(path);
        self
    }

    pub fn with_test_file(mut self, path: PathBuf) -> Self {
        self.test_file = Some(path);
        self
    }

    pub fn with_reconstructor(mut self, settings: ReconstructorSettings) -> Self {
        self.reconstructor = settings;
        self
    }

    pub fn with_field(mut self, settings: FieldSettings) -> Self {
        self.field = settings;
        self
    }

    pub fn dumps_all(&self) -> bool {
        self.symbol_name == ALL_SYMBOLS
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.symbol_name.is_empty() {
            return Err("a symbol name or '*' is required".to_string());
        }
        if self.graph_path.as_os_str().is_empty() {
            return Err("a symbol graph path is required".to_string());
        }
        if self.test_file.is_some() && self.output_file.is_none() {
            return Err("a test file requires an output file to include".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::MemberExpansion;

    #[test]
    fn test_defaults_print_everything() {
        let config = Config::default();
        assert!(config.print_header);
        assert!(config.print_declarations);
        assert!(config.print_definitions);
        assert!(config.print_referenced_types);
        assert!(config.field.coerce_zero_length_arrays);
    }

    #[test]
    fn test_validate() {
        assert!(Config::new().validate().is_err());

        let config = Config::new()
            .with_symbol("_FOO")
            .with_graph_path(PathBuf::from("types.json"));
        assert!(config.validate().is_ok());
        assert!(!config.dumps_all());

        let config = config.with_test_file(PathBuf::from("test.c"));
        assert!(config.validate().is_err());

        let config = config.with_output_file(PathBuf::from("out.h")).with_symbol(ALL_SYMBOLS);
        assert!(config.validate().is_ok());
        assert!(config.dumps_all());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let text = r#"{ "symbol_name": "*", "reconstructor": { "expansion": "inline_all", "show_offsets": false } }"#;
        let config: Config = serde_json::from_str(text).unwrap();

        assert!(config.dumps_all());
        assert_eq!(config.reconstructor.expansion, MemberExpansion::InlineAll);
        assert!(!config.reconstructor.show_offsets);
        assert!(config.reconstructor.create_padding_members);
        assert_eq!(config.reconstructor.anonymous_union_prefix, "_u");
    }
}
