//! Syntax-tree rendering for `ast` chunks.
//!
//! Chunk content is JS/TS source built by plugins. Rendering parses it with oxc and prints it
//! back through oxc's codegen, which normalizes quoting, spacing and semicolons. Fragments oxc
//! cannot parse are emitted as-is.

use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;

pub fn render_js(source: &str) -> String {
    if source.trim().is_empty() {
        return String::new();
    }

    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true);
    let ret = Parser::new(&allocator, source, source_type).parse();

    if !ret.errors.is_empty() {
        tracing::warn!(
            errors = ret.errors.len(),
            "ast chunk could not be parsed, emitting source unchanged"
        );
        return source.to_string();
    }

    Codegen::new().build(&ret.program).code.trim_end().to_string()
}

/// Source of one import declaration. Default and named specifiers may be combined.
pub fn import_declaration(default: Option<&str>, named: &[String], path: &str) -> String {
    let mut specifiers = Vec::new();
    if let Some(default) = default {
        specifiers.push(default.to_string());
    }
    if !named.is_empty() {
        specifiers.push(format!("{{ {} }}", named.join(", ")));
    }
    if specifiers.is_empty() {
        format!("import '{}'", path)
    } else {
        format!("import {} from '{}'", specifiers.join(", "), path)
    }
}
