// Wed Jan 15 2026 - Alex

use crate::config::Config;
use crate::structure::MemberExpansion;
use clap::Parser;
use std::path::PathBuf;

/// Parses the optional attachment of a switch: bare `-p` is on, `-p-` is off.
fn parse_toggle(value: &str) -> Result<bool, String> {
    match value {
        "+" | "" => Ok(true),
        "-" => Ok(false),
        other => Err(format!("expected '-' to turn the option off, got '{}'", other)),
    }
}

#[derive(Parser, Debug)]
#[command(name = "header-reconstructor")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Reconstructs C type declarations from a debug symbol graph", long_about = None)]
#[command(after_help = "Switches -p -x -m -b -d -i -j -k -n -l -z can be turned off with a trailing '-', e.g. -p-")]
pub struct Args {
    #[arg(help = "Symbol name to extract, or '*' to extract every symbol")]
    pub symbol: String,

    #[arg(help = "Path to the symbol graph")]
    pub path: PathBuf,

    #[arg(short = 'o', value_name = "FILE", help = "Output file (stdout)")]
    pub output: Option<PathBuf>,

    #[arg(short = 't', value_name = "FILE", help = "Compile-check test file (off)")]
    pub test_file: Option<PathBuf>,

    #[arg(short = 'e', value_name = "n|i|a", help = "Expansion of nested types: none, inline unnamed, inline all (i)")]
    pub expansion: Option<String>,

    #[arg(short = 'u', value_name = "PREFIX", help = "Unnamed union prefix, used with -d-")]
    pub union_prefix: Option<String>,

    #[arg(short = 's', value_name = "PREFIX", help = "Unnamed struct prefix, used with -d-")]
    pub struct_prefix: Option<String>,

    #[arg(short = 'r', value_name = "PREFIX", help = "Prefix for all symbols")]
    pub symbol_prefix: Option<String>,

    #[arg(short = 'g', value_name = "SUFFIX", help = "Suffix for all symbols")]
    pub symbol_suffix: Option<String>,

    #[arg(short = 'p', num_args = 0..=1, default_missing_value = "+", value_parser = parse_toggle, value_name = "-", help = "Create padding members (T)")]
    pub padding: Option<bool>,

    #[arg(short = 'x', num_args = 0..=1, default_missing_value = "+", value_parser = parse_toggle, value_name = "-", help = "Show offsets (T)")]
    pub offsets: Option<bool>,

    #[arg(short = 'm', num_args = 0..=1, default_missing_value = "+", value_parser = parse_toggle, value_name = "-", help = "Create Microsoft typedefs (T)")]
    pub microsoft_typedefs: Option<bool>,

    #[arg(short = 'b', num_args = 0..=1, default_missing_value = "+", value_parser = parse_toggle, value_name = "-", help = "Allow bitfields in union (F)")]
    pub bitfields_in_union: Option<bool>,

    #[arg(short = 'd', num_args = 0..=1, default_missing_value = "+", value_parser = parse_toggle, value_name = "-", help = "Allow unnamed data types (T)")]
    pub anonymous_types: Option<bool>,

    #[arg(short = 'i', num_args = 0..=1, default_missing_value = "+", value_parser = parse_toggle, value_name = "-", help = "Use stdint.h types instead of native types (F)")]
    pub stdint: Option<bool>,

    #[arg(short = 'j', num_args = 0..=1, default_missing_value = "+", value_parser = parse_toggle, value_name = "-", help = "Print definitions of referenced types (T)")]
    pub referenced_types: Option<bool>,

    #[arg(short = 'k', num_args = 0..=1, default_missing_value = "+", value_parser = parse_toggle, value_name = "-", help = "Print header (T)")]
    pub header: Option<bool>,

    #[arg(short = 'n', num_args = 0..=1, default_missing_value = "+", value_parser = parse_toggle, value_name = "-", help = "Print declarations (T)")]
    pub declarations: Option<bool>,

    #[arg(short = 'l', num_args = 0..=1, default_missing_value = "+", value_parser = parse_toggle, value_name = "-", help = "Print definitions (T)")]
    pub definitions: Option<bool>,

    #[arg(short = 'z', num_args = 0..=1, default_missing_value = "+", value_parser = parse_toggle, value_name = "-", help = "Turn zero-length arrays into pointers (T)")]
    pub zero_length_arrays: Option<bool>,

    #[arg(long, value_name = "FILE", help = "JSON config providing defaults for every option")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Args {
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.is_empty() {
            return Err("Symbol name must not be empty".to_string());
        }
        if self.test_file.is_some() && self.output.is_none() {
            return Err("-t requires -o".to_string());
        }
        Ok(())
    }

    /// Layers the explicitly given switches over `base`.
    pub fn apply(&self, base: Config) -> Config {
        let mut config = base
            .with_symbol(&self.symbol)
            .with_graph_path(self.path.clone());

        if let Some(path) = &self.output {
            config.output_file = Some(path.clone());
        }
        if let Some(path) = &self.test_file {
            config.test_file = Some(path.clone());
        }

        let settings = &mut config.reconstructor;
        if let Some(letter) = &self.expansion {
            settings.expansion = MemberExpansion::from_letter(letter);
        }
        if let Some(prefix) = &self.union_prefix {
            settings.anonymous_union_prefix = prefix.clone();
        }
        if let Some(prefix) = &self.struct_prefix {
            settings.anonymous_struct_prefix = prefix.clone();
        }
        if let Some(prefix) = &self.symbol_prefix {
            settings.symbol_prefix = prefix.clone();
        }
        if let Some(suffix) = &self.symbol_suffix {
            settings.symbol_suffix = suffix.clone();
        }

        let toggles = [
            (self.padding, &mut settings.create_padding_members),
            (self.offsets, &mut settings.show_offsets),
            (self.microsoft_typedefs, &mut settings.microsoft_typedefs),
            (self.bitfields_in_union, &mut settings.allow_bitfields_in_union),
            (self.anonymous_types, &mut settings.allow_anonymous_data_types),
        ];
        for (value, slot) in toggles {
            if let Some(value) = value {
                *slot = value;
            }
        }

        let toggles = [
            (self.stdint, &mut config.field.use_stdint),
            (self.zero_length_arrays, &mut config.field.coerce_zero_length_arrays),
            (self.referenced_types, &mut config.print_referenced_types),
            (self.header, &mut config.print_header),
            (self.declarations, &mut config.print_declarations),
            (self.definitions, &mut config.print_definitions),
        ];
        for (value, slot) in toggles {
            if let Some(value) = value {
                *slot = value;
            }
        }

        config
    }
}
