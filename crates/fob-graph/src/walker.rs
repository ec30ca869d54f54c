//! The Dependency Walker (§4.5): parses a compiled source file's import/export statements
//! and classifies every specifier it carries as relative, bare, or JSON.

use oxc_allocator::Allocator;
use oxc_ast::ast::{Program, Statement};
use oxc_parser::Parser;
use oxc_span::SourceType;

/// A specifier discovered in a module, plus the shape the Dependency Walker derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveredSpecifier {
    /// Begins with `.` — resolved relative to the requesting file's directory.
    Relative(String),
    /// Any other specifier, to be handed to the Resolver.
    Bare(String),
}

impl DiscoveredSpecifier {
    pub fn raw(&self) -> &str {
        match self {
            DiscoveredSpecifier::Relative(s) | DiscoveredSpecifier::Bare(s) => s,
        }
    }

    pub fn is_json(&self) -> bool {
        self.raw().ends_with(".json")
    }

    fn classify(specifier: &str) -> Self {
        if specifier.starts_with('.') {
            DiscoveredSpecifier::Relative(specifier.to_string())
        } else {
            DiscoveredSpecifier::Bare(specifier.to_string())
        }
    }
}

/// Parse `source` as JS/JSX source and return every import/export specifier referenced by
/// a top-level `import` or `export ... from` declaration, in source order.
///
/// By the time the walker runs, the typed-source compiler has already lowered TypeScript
/// syntax away (§4.5), so parsing is always performed over plain JS/JSX.
pub fn walk_specifiers(source: &str) -> Vec<DiscoveredSpecifier> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let parsed = Parser::new(&allocator, source, source_type).parse();
    collect_from_program(&parsed.program)
}

fn collect_from_program(program: &Program) -> Vec<DiscoveredSpecifier> {
    let mut out = Vec::new();
    for stmt in &program.body {
        collect_from_statement(stmt, &mut out);
    }
    out
}

fn collect_from_statement(stmt: &Statement, out: &mut Vec<DiscoveredSpecifier>) {
    match stmt {
        Statement::ImportDeclaration(decl) => {
            out.push(DiscoveredSpecifier::classify(decl.source.value.as_str()));
        }
        Statement::ExportNamedDeclaration(decl) => {
            if let Some(source) = &decl.source {
                out.push(DiscoveredSpecifier::classify(source.value.as_str()));
            }
        }
        Statement::ExportAllDeclaration(decl) => {
            out.push(DiscoveredSpecifier::classify(decl.source.value.as_str()));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_import_export_and_reexport_specifiers() {
        let src = r#"
            import { a } from "./a.js";
            import b from "left-pad";
            export { c } from "./c.json";
            export * from "events";
        "#;
        let specs = walk_specifiers(src);
        assert_eq!(
            specs,
            vec![
                DiscoveredSpecifier::Relative("./a.js".into()),
                DiscoveredSpecifier::Bare("left-pad".into()),
                DiscoveredSpecifier::Relative("./c.json".into()),
                DiscoveredSpecifier::Bare("events".into()),
            ]
        );
    }

    #[test]
    fn json_specifiers_are_flagged() {
        let specs = walk_specifiers(r#"import d from "./data.json";"#);
        assert!(specs[0].is_json());
    }

    #[test]
    fn bare_export_without_source_is_ignored() {
        let specs = walk_specifiers("export const x = 1;");
        assert!(specs.is_empty());
    }
}
