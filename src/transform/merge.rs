//! Collapses repeated imports of the same module into one declaration.

use super::imports::dedupe;
use crate::error::Result;
use crate::imports::{ImportDecl, collect_top_level_imports};
use crate::syntax::{Edit, SourceFile, statement_removal};

/// Merges top-level imports that share a module. Returns whether anything changed.
pub fn merge_imports(file: &mut SourceFile) -> Result<bool> {
    let decls = collect_top_level_imports(file);

    let mut groups: Vec<Vec<&ImportDecl>> = Vec::new();
    for decl in &decls {
        match groups.iter_mut().find(|g| g[0].module == decl.module) {
            Some(group) => group.push(decl),
            None => groups.push(vec![decl]),
        }
    }

    let mut edits = Vec::new();
    for group in groups.iter().filter(|g| g.len() > 1) {
        let Some(merged) = merge_group(group) else {
            continue;
        };
        let first = group[0];
        edits.push(Edit {
            start: first.start,
            end: first.end,
            new_text: merged.render(),
        });
        for later in &group[1..] {
            edits.push(statement_removal(file.text(), later.start, later.end));
        }
    }

    file.apply_edits(edits)
}

/// Combines declarations of one module, or `None` when their default or
/// namespace bindings disagree.
fn merge_group(group: &[&ImportDecl]) -> Option<ImportDecl> {
    let first = group[0];
    let mut merged = ImportDecl::empty(&first.module, first.style);
    merged.start = first.start;
    merged.end = first.end;
    merged.type_only = group.iter().all(|d| d.type_only);

    for decl in group {
        merged.default_import = merge_binding(&merged.default_import, &decl.default_import)?;
        merged.namespace_import = merge_binding(&merged.namespace_import, &decl.namespace_import)?;
    }
    merged.named = dedupe(group.iter().flat_map(|d| d.named.iter().cloned()));
    Some(merged)
}

fn merge_binding(current: &Option<String>, next: &Option<String>) -> Option<Option<String>> {
    match (current, next) {
        (Some(a), Some(b)) if a != b => None,
        (Some(a), _) => Some(Some(a.clone())),
        (None, b) => Some(b.clone()),
    }
}
