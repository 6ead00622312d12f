// Tue Jan 13 2026 - Alex

use crate::structure::{ImageArchitecture, SizeCheck};
use std::fmt::Write;
use std::path::Path;

pub const TOOL_NAME: &str = env!("CARGO_PKG_NAME");
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

const TEST_FILE_HEADER: &str = "#include <stdio.h>\n\
#include <stddef.h>\n\
#include <stdint.h>\n\
#include <stdbool.h>\n\
\n\
#include \"{include}\"\n\
\n\
int main()\n\
{\n";

const TEST_FILE_FOOTER: &str = "\n\treturn 0;\n}\n\n";

/// Comment block opening every generated header.
pub fn file_banner(graph_path: &Path, architecture: ImageArchitecture) -> String {
    format!(
        "/*\n * Symbol graph: {}\n * Image architecture: {}\n *\n * Dumped by {} v{}\n */\n\n",
        graph_path.display(),
        architecture,
        TOOL_NAME,
        TOOL_VERSION
    )
}

/// C program that includes the header and checks every recorded `sizeof`.
pub fn test_harness(include: &Path, checks: &[SizeCheck]) -> String {
    let include = include.display().to_string().replace('\\', "/");
    let mut text = TEST_FILE_HEADER.replace("{include}", &include);

    for check in checks {
        let _ = writeln!(
            text,
            "\tprintf(\"%-48s %s\\n\", \"{}\", sizeof({}) == 0x{:04x} ? \"ok\" : \"SIZE MISMATCH\");",
            check.display_name, check.type_expr, check.size
        );
    }

    text.push_str(TEST_FILE_FOOTER);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_names_architecture() {
        let banner = file_banner(Path::new("ntdll.json"), ImageArchitecture::X64);
        assert!(banner.starts_with("/*\n * Symbol graph: ntdll.json\n * Image architecture: x64\n"));
        assert!(banner.ends_with(" */\n\n"));
    }

    #[test]
    fn test_harness_layout() {
        let checks = vec![SizeCheck {
            type_expr: "FOO".to_string(),
            display_name: "FOO".to_string(),
            size: 12,
        }];
        let text = test_harness(Path::new("out.h"), &checks);

        assert!(text.starts_with("#include <stdio.h>\n"));
        assert!(text.contains("#include \"out.h\"\n\nint main()\n{\n"));
        assert!(text.contains("sizeof(FOO) == 0x000c"));
        assert!(text.ends_with("\treturn 0;\n}\n\n"));
    }
}
