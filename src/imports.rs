//! Import declarations: extraction from a syntax tree and rendering back to text.

use crate::syntax::SourceFile;
use tree_sitter::Node;

/// One specifier inside `{ ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedImport {
    pub name: String,
    pub alias: Option<String>,
    pub type_only: bool,
}

impl NamedImport {
    pub fn new(name: &str) -> Self {
        NamedImport {
            name: name.to_string(),
            alias: None,
            type_only: false,
        }
    }

    /// The binding this specifier introduces into the file.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    fn render(&self, with_type: bool) -> String {
        let prefix = if with_type && self.type_only { "type " } else { "" };
        match &self.alias {
            Some(alias) => format!("{}{} as {}", prefix, self.name, alias),
            None => format!("{}{}", prefix, self.name),
        }
    }
}

/// Formatting details copied from the statement being rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStyle {
    pub quote: char,
    pub semicolon: bool,
}

impl Default for ImportStyle {
    fn default() -> Self {
        ImportStyle {
            quote: '"',
            semicolon: false,
        }
    }
}

/// A single `import ... from "module"` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub module: String,
    pub default_import: Option<String>,
    pub namespace_import: Option<String>,
    pub named: Vec<NamedImport>,
    /// `import type ...` at statement level.
    pub type_only: bool,
    pub style: ImportStyle,
    pub start: usize,
    pub end: usize,
}

impl ImportDecl {
    /// An empty declaration for `module`, formatted like `style`.
    pub fn empty(module: &str, style: ImportStyle) -> Self {
        ImportDecl {
            module: module.to_string(),
            default_import: None,
            namespace_import: None,
            named: Vec::new(),
            type_only: false,
            style,
            start: 0,
            end: 0,
        }
    }

    /// True for `import "module"`.
    pub fn is_side_effect(&self) -> bool {
        self.default_import.is_none() && self.namespace_import.is_none() && self.named.is_empty()
    }

    /// Renders the declaration on a single line.
    ///
    /// A namespace import cannot share a statement with named imports, so that
    /// combination renders as two statements.
    pub fn render(&self) -> String {
        let quote = self.style.quote;
        let semi = if self.style.semicolon { ";" } else { "" };
        let source = format!("{quote}{}{quote}", self.module);

        let hoist = if self.named.is_empty() {
            self.type_only
        } else {
            self.default_import.is_none()
                && self.namespace_import.is_none()
                && self.named.iter().all(|n| n.type_only)
        };
        let keyword = if hoist { "import type " } else { "import " };

        let specifiers: Vec<String> = self.named.iter().map(|n| n.render(!hoist)).collect();
        let named_clause = (!specifiers.is_empty()).then(|| format!("{{{}}}", specifiers.join(", ")));

        let mut head: Vec<String> = self.default_import.iter().cloned().collect();
        if let Some(ns) = &self.namespace_import {
            head.push(format!("* as {ns}"));
        }

        let mut bindings = Vec::new();
        match named_clause {
            Some(clause) if self.namespace_import.is_some() => {
                bindings.push(head.join(", "));
                bindings.push(clause);
            }
            Some(clause) => {
                head.push(clause);
                bindings.push(head.join(", "));
            }
            None if !head.is_empty() => bindings.push(head.join(", ")),
            None => {}
        }

        if bindings.is_empty() {
            return format!("import {source}{semi}");
        }
        bindings
            .iter()
            .map(|b| format!("{keyword}{b} from {source}{semi}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Collects every top-level or nested `import` statement that has a module source.
///
/// `import x = require("y")` has no source at statement level and is skipped.
pub fn collect_imports(file: &SourceFile) -> Vec<ImportDecl> {
    file.nodes_of_kind(&["import_statement"])
        .into_iter()
        .filter_map(|node| import_decl(file, node))
        .collect()
}

/// Like [`collect_imports`] but only statements directly under the program root.
pub fn collect_top_level_imports(file: &SourceFile) -> Vec<ImportDecl> {
    file.nodes_of_kind(&["import_statement"])
        .into_iter()
        .filter(|node| node.parent().is_some_and(|p| p.kind() == "program"))
        .filter_map(|node| import_decl(file, node))
        .collect()
}

fn import_decl(file: &SourceFile, node: Node<'_>) -> Option<ImportDecl> {
    let source = node.child_by_field_name("source")?;
    let raw = file.node_text(source);
    let quote = raw.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let module = raw.trim_matches(quote).to_string();

    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    let type_only = children
        .iter()
        .any(|c| !c.is_named() && matches!(c.kind(), "type" | "typeof"));

    let mut decl = ImportDecl {
        module,
        default_import: None,
        namespace_import: None,
        named: Vec::new(),
        type_only,
        style: ImportStyle {
            quote,
            semicolon: file.node_text(node).trim_end().ends_with(';'),
        },
        start: node.start_byte(),
        end: node.end_byte(),
    };

    let Some(clause) = children.iter().find(|c| c.kind() == "import_clause") else {
        return Some(decl);
    };

    let mut clause_cursor = clause.walk();
    for part in clause.named_children(&mut clause_cursor) {
        match part.kind() {
            "identifier" => decl.default_import = Some(file.node_text(part).to_string()),
            "namespace_import" => {
                let mut ns_cursor = part.walk();
                decl.namespace_import = part
                    .named_children(&mut ns_cursor)
                    .find(|c| c.kind() == "identifier")
                    .map(|c| file.node_text(c).to_string());
            }
            "named_imports" => {
                let mut named_cursor = part.walk();
                for spec in part
                    .named_children(&mut named_cursor)
                    .filter(|c| c.kind() == "import_specifier")
                {
                    if let Some(named) = named_import(file, spec, type_only) {
                        decl.named.push(named);
                    }
                }
            }
            _ => {}
        }
    }

    Some(decl)
}

fn named_import(file: &SourceFile, spec: Node<'_>, statement_type: bool) -> Option<NamedImport> {
    let name = spec.child_by_field_name("name")?;
    let alias = spec.child_by_field_name("alias");
    let mut cursor = spec.walk();
    let type_only = statement_type
        || spec
            .children(&mut cursor)
            .any(|c| !c.is_named() && matches!(c.kind(), "type" | "typeof"));
    Some(NamedImport {
        name: file.node_text(name).to_string(),
        alias: alias.map(|a| file.node_text(a).to_string()),
        type_only,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imports_of(source: &str) -> Vec<ImportDecl> {
        let file = SourceFile::parse("test.tsx", source.to_string()).unwrap();
        collect_imports(&file)
    }

    #[test]
    fn collects_all_binding_forms() {
        let decls = imports_of(
            "import React, {useState as useS, type FC} from 'react';\nimport * as path from \"path\"\nimport \"./styles.css\"\n",
        );
        assert_eq!(decls.len(), 3);

        let react = &decls[0];
        assert_eq!(react.module, "react");
        assert_eq!(react.default_import.as_deref(), Some("React"));
        assert_eq!(react.named.len(), 2);
        assert_eq!(react.named[0].name, "useState");
        assert_eq!(react.named[0].local_name(), "useS");
        assert!(react.named[1].type_only);
        assert_eq!(react.style.quote, '\'');
        assert!(react.style.semicolon);

        assert_eq!(decls[1].namespace_import.as_deref(), Some("path"));
        assert!(decls[2].is_side_effect());
    }

    #[test]
    fn statement_type_marks_every_specifier() {
        let decls = imports_of("import type {A, B} from \"x\"\n");
        assert!(decls[0].type_only);
        assert!(decls[0].named.iter().all(|n| n.type_only));
        assert_eq!(decls[0].render(), "import type {A, B} from \"x\"");
    }

    #[test]
    fn renders_mixed_type_specifiers_inline() {
        let mut decl = ImportDecl::empty("@qui/utils", ImportStyle::default());
        decl.named.push(NamedImport::new("clsx"));
        decl.named.push(NamedImport {
            name: "Props".to_string(),
            alias: Some("P".to_string()),
            type_only: true,
        });
        assert_eq!(decl.render(), "import {clsx, type Props as P} from \"@qui/utils\"");
    }

    #[test]
    fn renders_namespace_with_named_as_two_statements() {
        let mut decl = ImportDecl::empty("m", ImportStyle {
            quote: '\'',
            semicolon: true,
        });
        decl.namespace_import = Some("ns".to_string());
        decl.named.push(NamedImport::new("a"));
        assert_eq!(
            decl.render(),
            "import * as ns from 'm';\nimport {a} from 'm';"
        );
    }

    #[test]
    fn renders_bare_import_without_bindings() {
        let decl = ImportDecl::empty("./polyfill", ImportStyle::default());
        assert_eq!(decl.render(), "import \"./polyfill\"");
    }

    #[test]
    fn skips_require_imports() {
        let file = SourceFile::parse("legacy.ts", "import fs = require(\"fs\")\n".to_string()).unwrap();
        assert!(collect_imports(&file).is_empty());
    }
}
