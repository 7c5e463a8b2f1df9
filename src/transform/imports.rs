//! Moves named imports from a rule's source package to its target package.

use super::TransformContext;
use crate::error::Result;
use crate::imports::{ImportDecl, NamedImport, collect_imports};
use crate::rules::{ImportAction, MigrationRule};
use crate::syntax::{Edit, SourceFile, line_indent, statement_removal};

/// Named imports of one declaration, split by what the rule does with them.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub moved: Vec<NamedImport>,
    pub kept: Vec<NamedImport>,
    pub removed: Vec<NamedImport>,
}

pub fn partition(named: &[NamedImport], rule: &MigrationRule) -> Partition {
    let mut part = Partition::default();
    for import in named {
        let bucket = match rule.classify(&import.name) {
            ImportAction::Move => &mut part.moved,
            ImportAction::Keep => &mut part.kept,
            ImportAction::Remove => &mut part.removed,
        };
        bucket.push(import.clone());
    }
    part
}

/// The declarations that replace `decl`, target first.
///
/// `None` means the rule does not touch this declaration. An empty list means
/// the declaration is deleted.
pub fn replacement_for(decl: &ImportDecl, rule: &MigrationRule) -> Option<Vec<ImportDecl>> {
    let part = partition(&decl.named, rule);
    if part.moved.is_empty() && part.removed.is_empty() {
        return None;
    }

    let mut replacement = Vec::new();
    if !part.moved.is_empty() {
        let mut target = ImportDecl::empty(&rule.target_package, decl.style);
        target.named = dedupe(part.moved.into_iter().map(|n| renamed(n, rule)));
        replacement.push(target);
    }

    let source = ImportDecl {
        named: part.kept,
        ..decl.clone()
    };
    if !source.is_side_effect() {
        replacement.push(source);
    }
    Some(replacement)
}

fn renamed(mut import: NamedImport, rule: &MigrationRule) -> NamedImport {
    if let Some(new_name) = rule.rename_for(&import.name) {
        import.name = new_name.to_string();
    }
    if import.alias.as_deref() == Some(import.name.as_str()) {
        import.alias = None;
    }
    import
}

/// Drops repeated `(name, alias)` pairs; a value import beats a type-only one.
pub fn dedupe(imports: impl IntoIterator<Item = NamedImport>) -> Vec<NamedImport> {
    let mut unique: Vec<NamedImport> = Vec::new();
    for import in imports {
        match unique
            .iter_mut()
            .find(|u| u.name == import.name && u.alias == import.alias)
        {
            Some(existing) => existing.type_only &= import.type_only,
            None => unique.push(import),
        }
    }
    unique
}

pub fn run(file: &mut SourceFile, ctx: &TransformContext<'_>) -> Result<bool> {
    let rule = ctx.rule;
    let mut edits = Vec::new();

    for decl in collect_imports(file)
        .iter()
        .filter(|d| d.module == rule.source_package)
    {
        let Some(replacement) = replacement_for(decl, rule) else {
            continue;
        };
        if replacement.is_empty() {
            edits.push(statement_removal(file.text(), decl.start, decl.end));
            continue;
        }
        let separator = format!("\n{}", line_indent(file.text(), decl.start));
        let new_text = replacement
            .iter()
            .map(ImportDecl::render)
            .collect::<Vec<_>>()
            .join(&separator);
        edits.push(Edit {
            start: decl.start,
            end: decl.end,
            new_text,
        });
    }

    file.apply_edits(edits)
}
