// Tue Jan 13 2026 - Alex

use crate::symbol::{basic_type_string, Symbol};
use serde::{Deserialize, Serialize};

/// Accumulates the text of one member declaration while a type chain is walked.
///
/// Callbacks arrive outermost wrapper first: a pointer to an array of structs
/// sees `visit_pointer_end`, then `visit_array_end`, then the struct reference.
/// Alternate output dialects implement this trait; the traversal never changes.
pub trait FieldDefinition {
    type Settings: Clone + Default;

    fn new(settings: &Self::Settings) -> Self
    where
        Self: Sized;

    fn visit_base_type(&mut self, symbol: &Symbol);

    fn visit_pointer_end(&mut self, symbol: &Symbol);

    fn visit_array_end(&mut self, symbol: &Symbol);

    fn visit_function_end(&mut self, symbol: &Symbol);

    /// Reference to an aggregate or enum by its (corrected) name.
    fn visit_named_type(&mut self, keyword: &str, name: &str);

    fn set_member_name(&mut self, name: &str);

    fn render(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub use_stdint: bool,
    pub coerce_zero_length_arrays: bool,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            use_stdint: false,
            coerce_zero_length_arrays: true,
        }
    }
}

/// C declarator dialect: `int* a`, `char b[4]`, `int (*c)[4]`.
#[derive(Debug, Clone, Default)]
pub struct CFieldDefinition {
    settings: FieldSettings,
    type_prefix: String,
    declarator: String,
    type_suffix: String,
    member_name: String,
    comment: String,
    last_was_pointer: bool,
}

impl CFieldDefinition {
    fn push_pointer(&mut self) {
        self.declarator.insert(0, '*');
        self.last_was_pointer = true;
    }

    fn push_dimension(&mut self, text: &str) {
        if self.last_was_pointer {
            self.declarator.insert(0, '(');
            self.type_suffix.push(')');
        }
        self.type_suffix.push_str(text);
        self.last_was_pointer = false;
    }
}

impl FieldDefinition for CFieldDefinition {
    type Settings = FieldSettings;

    fn new(settings: &FieldSettings) -> Self {
        Self {
            settings: settings.clone(),
            ..Self::default()
        }
    }

    fn visit_base_type(&mut self, symbol: &Symbol) {
        self.type_prefix.push_str(basic_type_string(symbol, self.settings.use_stdint));
    }

    fn visit_pointer_end(&mut self, _symbol: &Symbol) {
        self.push_pointer();
    }

    fn visit_array_end(&mut self, symbol: &Symbol) {
        let count = symbol.element_count().unwrap_or(0);
        if count == 0 && self.settings.coerce_zero_length_arrays {
            // `T name[0]` does not compile everywhere; the storage slot becomes a pointer.
            self.push_pointer();
        } else {
            self.push_dimension(&format!("[{}]", count));
        }
    }

    fn visit_function_end(&mut self, _symbol: &Symbol) {
        self.type_prefix.push_str("void");
        if !self.declarator.contains('*') {
            self.push_pointer();
        }
        self.comment = " /* function */".to_string();
    }

    fn visit_named_type(&mut self, keyword: &str, name: &str) {
        self.type_prefix.push_str(keyword);
        self.type_prefix.push(' ');
        self.type_prefix.push_str(name);
    }

    fn set_member_name(&mut self, name: &str) {
        self.member_name = name.to_string();
    }

    fn render(&self) -> String {
        let bare_pointers = self.declarator.chars().all(|c| c == '*');
        let (mut text, declarator) = if bare_pointers {
            (
                format!("{}{}", self.type_prefix, self.declarator),
                format!("{}{}", self.member_name, self.type_suffix),
            )
        } else {
            (
                self.type_prefix.clone(),
                format!("{}{}{}", self.declarator, self.member_name, self.type_suffix),
            )
        };

        if !declarator.is_empty() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&declarator);
        }
        text.push_str(&self.comment);
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{BaseKind, SymbolData, SymbolId};

    fn base(kind: BaseKind, size: u64) -> Symbol {
        Symbol::new(None, size, SymbolData::Base(kind))
    }

    fn pointer() -> Symbol {
        Symbol::new(None, 8, SymbolData::Pointer { child: SymbolId::new(0) })
    }

    fn array(count: u64) -> Symbol {
        Symbol::new(None, count * 4, SymbolData::Array { child: SymbolId::new(0), element_count: count })
    }

    fn field() -> CFieldDefinition {
        CFieldDefinition::new(&FieldSettings::default())
    }

    #[test]
    fn test_plain_member() {
        let mut def = field();
        def.visit_base_type(&base(BaseKind::Int, 4));
        def.set_member_name("a");
        assert_eq!(def.render(), "int a");
    }

    #[test]
    fn test_pointer_attaches_to_type() {
        let mut def = field();
        def.visit_pointer_end(&pointer());
        def.visit_pointer_end(&pointer());
        def.visit_base_type(&base(BaseKind::Char, 1));
        def.set_member_name("argv");
        assert_eq!(def.render(), "char** argv");
    }

    #[test]
    fn test_multi_dimensional_array_order() {
        let mut def = field();
        def.visit_array_end(&array(2));
        def.visit_array_end(&array(3));
        def.visit_base_type(&base(BaseKind::Int, 4));
        def.set_member_name("grid");
        assert_eq!(def.render(), "int grid[2][3]");
    }

    #[test]
    fn test_pointer_to_array_is_parenthesized() {
        let mut def = field();
        def.visit_pointer_end(&pointer());
        def.visit_array_end(&array(4));
        def.visit_base_type(&base(BaseKind::Int, 4));
        def.set_member_name("rows");
        assert_eq!(def.render(), "int (*rows)[4]");
    }

    #[test]
    fn test_array_of_pointers() {
        let mut def = field();
        def.visit_array_end(&array(4));
        def.visit_pointer_end(&pointer());
        def.visit_base_type(&base(BaseKind::Int, 4));
        def.set_member_name("slots");
        assert_eq!(def.render(), "int* slots[4]");
    }

    #[test]
    fn test_zero_length_array_becomes_pointer() {
        let mut def = field();
        def.visit_array_end(&array(0));
        def.visit_base_type(&base(BaseKind::UInt, 1));
        def.set_member_name("Data");
        let text = def.render();
        assert_eq!(text, "unsigned char* Data");
        assert!(!text.contains("[0]"));
    }

    #[test]
    fn test_zero_length_array_kept_when_disabled() {
        let settings = FieldSettings { coerce_zero_length_arrays: false, ..FieldSettings::default() };
        let mut def = CFieldDefinition::new(&settings);
        def.visit_array_end(&array(0));
        def.visit_base_type(&base(BaseKind::UInt, 1));
        def.set_member_name("Data");
        assert_eq!(def.render(), "unsigned char Data[0]");
    }

    #[test]
    fn test_function_pointer_degrades() {
        let function = Symbol::new(None, 0, SymbolData::Function { return_type: None });
        let mut def = field();
        def.visit_pointer_end(&pointer());
        def.visit_function_end(&function);
        def.set_member_name("Callback");
        assert_eq!(def.render(), "void* Callback /* function */");
    }

    #[test]
    fn test_bare_function_gets_pointer_level() {
        let function = Symbol::new(None, 0, SymbolData::Function { return_type: None });
        let mut def = field();
        def.visit_function_end(&function);
        def.set_member_name("Routine");
        assert_eq!(def.render(), "void* Routine /* function */");
    }

    #[test]
    fn test_named_type_and_stdint() {
        let settings = FieldSettings { use_stdint: true, ..FieldSettings::default() };
        let mut def = CFieldDefinition::new(&settings);
        def.visit_pointer_end(&pointer());
        def.visit_named_type("struct", "_LIST_ENTRY");
        def.set_member_name("Flink");
        assert_eq!(def.render(), "struct _LIST_ENTRY* Flink");

        let mut def = CFieldDefinition::new(&settings);
        def.visit_base_type(&base(BaseKind::UInt, 8));
        def.set_member_name("Value");
        assert_eq!(def.render(), "uint64_t Value");
    }

    #[test]
    fn test_inline_aggregate_renders_declarator_only() {
        let mut def = field();
        def.visit_array_end(&array(2));
        def.set_member_name("Entries");
        assert_eq!(def.render(), "Entries[2]");

        let anonymous = field();
        assert_eq!(anonymous.render(), "");
    }
}
