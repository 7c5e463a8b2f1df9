//! The TypeScript/TSX transform pipeline.
//!
//! Each rule runs the stages in [`Stage::PIPELINE`] order against the same
//! in-memory [`SourceFile`]. Once any stage reports a change, duplicate
//! imports are merged and the file is written back.

pub mod imports;
pub mod jsx;
pub mod merge;
pub mod variables;

use crate::error::{CodemodError, Result};
use crate::imports::collect_imports;
use crate::rules::MigrationRule;
use crate::syntax::SourceFile;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Per-file, per-rule lookup of how source-package imports are bound locally.
///
/// Built before the import stage runs, so later stages still know the
/// original alias after the import itself has moved.
#[derive(Debug)]
pub struct TransformContext<'r> {
    pub rule: &'r MigrationRule,
    aliases: BTreeMap<String, String>,
}

impl<'r> TransformContext<'r> {
    pub fn new(file: &SourceFile, rule: &'r MigrationRule) -> Self {
        let aliases = collect_imports(file)
            .into_iter()
            .filter(|decl| decl.module == rule.source_package)
            .flat_map(|decl| decl.named)
            .map(|named| (named.name.clone(), named.local_name().to_string()))
            .collect();
        TransformContext { rule, aliases }
    }

    /// Local binding for an imported `name`, if the file imports it from the source package.
    pub fn local_name(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }
}

/// One pass over a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Imports,
    Variables,
    JsxWrappers,
}

impl Stage {
    pub const PIPELINE: [Stage; 3] = [Stage::Imports, Stage::Variables, Stage::JsxWrappers];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Imports => "imports",
            Stage::Variables => "variables",
            Stage::JsxWrappers => "jsx-wrappers",
        }
    }

    pub fn run(self, file: &mut SourceFile, ctx: &TransformContext<'_>) -> Result<bool> {
        match self {
            Stage::Imports => imports::run(file, ctx),
            Stage::Variables => variables::run(file, ctx),
            Stage::JsxWrappers => jsx::run(file, ctx),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    pub dry_run: bool,
}

/// Runs every rule's stages over `file`. Returns whether the text changed.
pub fn transform_source(file: &mut SourceFile, rules: &[MigrationRule]) -> Result<bool> {
    let mut needs_save = false;

    for rule in rules {
        let ctx = TransformContext::new(file, rule);
        for stage in Stage::PIPELINE {
            if stage.run(file, &ctx)? {
                debug!(
                    file = %file.path().display(),
                    stage = stage.name(),
                    target = %rule.target_package,
                    "stage rewrote file"
                );
                needs_save = true;
            }
        }
    }

    if needs_save {
        merge::merge_imports(file)?;
    }
    Ok(needs_save)
}

/// Parses `text` as the file at `path` and transforms it in memory.
///
/// Returns the new text, or `None` when no rule applied.
pub fn transform_text(path: &Path, text: String, rules: &[MigrationRule]) -> Result<Option<String>> {
    let mut file = SourceFile::parse(path, text)?;
    let changed = transform_source(&mut file, rules)?;
    Ok(changed.then(|| file.into_text()))
}

/// Reads, transforms and (unless dry-run) rewrites a `.ts`/`.tsx` file.
pub async fn transform_ts(
    path: &Path,
    rules: &[MigrationRule],
    options: &TransformOptions,
) -> Result<bool> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CodemodError::io(path, e))?;

    let Some(updated) = transform_text(path, text, rules)? else {
        return Ok(false);
    };

    if !options.dry_run {
        tokio::fs::write(path, updated)
            .await
            .map_err(|e| CodemodError::io(path, e))?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleEntry, create_entries};

    fn run(source: &str, rules: &[MigrationRule]) -> Option<String> {
        transform_text(Path::new("test.tsx"), source.to_string(), rules).unwrap()
    }

    #[test]
    fn pipeline_order_is_fixed() {
        let names: Vec<_> = Stage::PIPELINE.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["imports", "variables", "jsx-wrappers"]);
    }

    #[test]
    fn context_records_aliases_for_source_package_only() {
        let file = SourceFile::parse(
            "a.tsx",
            "import {QTable as T, QTr} from \"@qui/react-table\"\nimport {QTd} from \"other\"\n"
                .to_string(),
        )
        .unwrap();
        let rule = MigrationRule {
            source_package: "@qui/react-table".to_string(),
            target_package: "x".to_string(),
            ..Default::default()
        };
        let ctx = TransformContext::new(&file, &rule);
        assert_eq!(ctx.local_name("QTable"), Some("T"));
        assert_eq!(ctx.local_name("QTr"), Some("QTr"));
        assert_eq!(ctx.local_name("QTd"), None);
    }

    #[test]
    fn untouched_file_reports_no_change() {
        let rules = create_entries("@qui/base", vec![RuleEntry::new("@qui/utils")]);
        assert_eq!(run("import {a} from \"elsewhere\"\nconst b = a\n", &rules), None);
    }

    #[test]
    fn later_rules_see_earlier_rewrites() {
        let rules = create_entries(
            "@qui/react-table",
            vec![
                RuleEntry::new("@qualcomm-ui/core/table").imports(["createColumnHelper"]),
                RuleEntry::new("@qualcomm-ui/react/table")
                    .imports(["flexRender"])
                    .rename("QTr", "Table")
                    .rename_variable("QTr", "Table.Row"),
            ],
        );
        let source = "import {createColumnHelper, flexRender, QTr} from \"@qui/react-table\"\n\nconst row = <QTr />\n";
        let out = run(source, &rules).unwrap();
        assert_eq!(
            out,
            "import {createColumnHelper} from \"@qualcomm-ui/core/table\"\nimport {flexRender, Table} from \"@qualcomm-ui/react/table\"\n\nconst row = <Table.Row />\n"
        );
    }

    #[test]
    fn running_twice_is_idempotent() {
        let rules = create_entries(
            "@qui/mdx-docs",
            vec![RuleEntry::new("@qualcomm-ui/react-mdx/docs-layout")],
        );
        let once = run("import {DocsLayout} from \"@qui/mdx-docs\"\n", &rules).unwrap();
        assert_eq!(run(&once, &rules), None);
    }
}
