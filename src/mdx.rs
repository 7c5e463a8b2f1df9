//! Import rewriting for MDX documents.
//!
//! MDX is handled as text: the document is split into frontmatter, the
//! leading block of `import`/`export` lines and the markdown content. Import
//! lines are rewritten one at a time; identifiers in the content are renamed
//! with word-boundary matching.

use crate::error::{CodemodError, Result};
use crate::rules::{ImportAction, MigrationRule};
use crate::transform::TransformOptions;
use regex::{NoExpand, Regex};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

static NAMED_IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*)import\s*\{\s*([^}]+)\s*\}\s*from\s*(['"`])([^'"`]+)['"`]\s*(;?)\s*$"#)
        .expect("named import line pattern")
});
static TYPE_IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*)import\s+type\s*\{\s*([^}]+)\s*\}\s*from\s*(['"`])([^'"`]+)['"`]\s*(;?)\s*$"#)
        .expect("type import line pattern")
});
static ALIAS_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+as\s+(\w+)$").expect("alias suffix pattern"));
static TYPE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^type\s+").expect("type prefix pattern"));

/// The three parts of an MDX document. Concatenated they give back the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MdxSections<'a> {
    pub frontmatter: &'a str,
    pub imports: &'a str,
    pub content: &'a str,
}

/// Splits `content` into frontmatter, leading import/export block and body.
pub fn extract_mdx_sections(content: &str) -> MdxSections<'_> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let offset_of = |line: usize| -> usize { lines[..line].iter().map(|l| l.len()).sum() };

    let mut frontmatter_end = 0;
    if let Some(first) = lines.first().map(|l| l.trim()) {
        if first == "---" || first == "+++" {
            if let Some(close) = lines.iter().skip(1).position(|l| l.trim() == first) {
                frontmatter_end = close + 2;
            }
        }
    }

    let mut imports_end = frontmatter_end;
    let mut in_comment = false;
    for (i, raw) in lines.iter().enumerate().skip(frontmatter_end) {
        let line = raw.trim();
        if in_comment {
            imports_end = i + 1;
            if line.contains("*/") {
                in_comment = false;
            }
            continue;
        }
        if line.contains("/*") && !line.contains("*/") {
            in_comment = true;
            imports_end = i + 1;
            continue;
        }
        if line.is_empty()
            || line.starts_with("//")
            || line.starts_with("import ")
            || line.starts_with("export ")
            || (line.starts_with("/*") && line.ends_with("*/"))
        {
            imports_end = i + 1;
            continue;
        }
        break;
    }

    let fm = offset_of(frontmatter_end);
    let im = offset_of(imports_end);
    MdxSections {
        frontmatter: &content[..fm],
        imports: &content[fm..im],
        content: &content[im..],
    }
}

/// A parsed `{ ... }` item from a single-line import.
struct ImportItem<'a> {
    raw: &'a str,
    name: &'a str,
    alias: Option<&'a str>,
    type_prefix: bool,
}

fn parse_item(raw: &str) -> ImportItem<'_> {
    let type_prefix = TYPE_PREFIX.is_match(raw);
    let without_type = TYPE_PREFIX
        .find(raw)
        .map_or(raw, |m| &raw[m.end()..]);
    let (name, alias) = match ALIAS_SUFFIX.captures(without_type) {
        Some(caps) => {
            let whole = caps.get(0).map_or(without_type.len(), |m| m.start());
            (&without_type[..whole], caps.get(1).map(|m| m.as_str()))
        }
        None => (without_type, None),
    };
    ImportItem {
        raw,
        name: name.trim(),
        alias,
        type_prefix,
    }
}

fn import_line_captures(line: &str) -> Option<regex::Captures<'_>> {
    NAMED_IMPORT_LINE
        .captures(line)
        .or_else(|| TYPE_IMPORT_LINE.captures(line))
}

/// Names imported from `source_package` in an imports section.
pub fn imported_names(imports: &str, source_package: &str) -> BTreeSet<String> {
    imports
        .lines()
        .filter_map(|line| import_line_captures(line.trim()))
        .filter(|caps| &caps[4] == source_package)
        .flat_map(|caps| {
            caps[2]
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| parse_item(item).name.to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Rewrites a single import line. `None` when the rule does not apply.
pub fn transform_import_line(line: &str, rule: &MigrationRule) -> Option<Vec<String>> {
    let caps = import_line_captures(line)?;
    if caps[4] != rule.source_package {
        return None;
    }

    let indent = &caps[1];
    let quote = &caps[3];
    let semi = &caps[5];
    let type_keyword = if line.contains("import type") { "type " } else { "" };

    let items: Vec<&str> = caps[2]
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect();

    let mut moved = Vec::new();
    let mut kept = Vec::new();
    let mut removed = 0;
    for raw in items {
        let item = parse_item(raw);
        match rule.classify(item.name) {
            ImportAction::Remove => removed += 1,
            ImportAction::Keep => kept.push(item.raw.to_string()),
            ImportAction::Move => moved.push(match rule.rename_for(item.name) {
                Some(new_name) => {
                    let prefix = if item.type_prefix { "type " } else { "" };
                    match item.alias.filter(|a| *a != new_name) {
                        Some(alias) => format!("{prefix}{new_name} as {alias}"),
                        None => format!("{prefix}{new_name}"),
                    }
                }
                None => item.raw.to_string(),
            }),
        }
    }

    if moved.is_empty() && removed == 0 {
        return None;
    }

    let render = |names: &[String], package: &str| {
        format!(
            "{indent}import {type_keyword}{{{}}} from {quote}{package}{quote}{semi}",
            names.join(", ")
        )
    };
    let mut lines = Vec::new();
    if !moved.is_empty() {
        lines.push(render(&moved, &rule.target_package));
    }
    if !kept.is_empty() {
        lines.push(render(&kept, &rule.source_package));
    }
    Some(lines)
}

/// Rewrites every matching import line of an imports section.
pub fn transform_imports_section(imports: &str, rule: &MigrationRule) -> Option<String> {
    let mut changed = false;
    let mut out = Vec::new();
    for line in imports.split('\n') {
        let trimmed = line.trim();
        let candidate = trimmed.starts_with("import") && trimmed.contains(&rule.source_package);
        match candidate.then(|| transform_import_line(line, rule)).flatten() {
            Some(lines) => {
                changed = true;
                out.extend(lines);
            }
            None => out.push(line.to_string()),
        }
    }
    changed.then(|| out.join("\n"))
}

/// Applies one rule to an MDX document. Returns the new text if anything changed.
pub fn transform_mdx_imports(content: &str, rule: &MigrationRule) -> Option<String> {
    let sections = extract_mdx_sections(content);
    if !sections.imports.contains(&rule.source_package) {
        return None;
    }

    let imported = imported_names(sections.imports, &rule.source_package);
    let imports = transform_imports_section(sections.imports, rule);

    let mut body = sections.content.to_string();
    let mut body_changed = false;
    for transformer in &rule.variable_transformers {
        if !imported.contains(&transformer.name) {
            continue;
        }
        let Ok(word) = Regex::new(&format!(r"\b{}\b", regex::escape(&transformer.name))) else {
            continue;
        };
        let renamed = word
            .replace_all(&body, NoExpand(&transformer.rename_to))
            .into_owned();
        if renamed != body {
            body = renamed;
            body_changed = true;
        }
    }

    if imports.is_none() && !body_changed {
        return None;
    }
    Some(format!(
        "{}{}{}",
        sections.frontmatter,
        imports.as_deref().unwrap_or(sections.imports),
        body
    ))
}

/// Reads, rewrites and (unless dry-run) writes back an `.mdx` file.
pub async fn transform_mdx(
    path: &Path,
    rules: &[MigrationRule],
    options: &TransformOptions,
) -> Result<bool> {
    let mut content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CodemodError::io(path, e))?;

    let mut changed = false;
    for rule in rules {
        if let Some(updated) = transform_mdx_imports(&content, rule) {
            content = updated;
            changed = true;
        }
    }

    if changed && !options.dry_run {
        tokio::fs::write(path, &content)
            .await
            .map_err(|e| CodemodError::io(path, e))?;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleEntry, create_entries};

    const DOC: &str = "\
---
title: Tables
---

import {QTable, QTr} from \"@qui/react-table\"
import {Demo} from \"../demo\"

# Tables

Use <QTable> with <QTr> rows. QTableFooter is unrelated.
";

    fn table_rule() -> MigrationRule {
        create_entries(
            "@qui/react-table",
            vec![
                RuleEntry::new("@qualcomm-ui/react/table")
                    .rename("QTable", "Table")
                    .rename_variable("QTable", "Table.Table"),
            ],
        )
        .remove(0)
    }

    #[test]
    fn sections_round_trip() {
        let sections = extract_mdx_sections(DOC);
        assert_eq!(sections.frontmatter, "---\ntitle: Tables\n---\n");
        assert!(sections.imports.starts_with("\nimport {QTable"));
        assert!(sections.content.starts_with("# Tables"));
        let joined = format!("{}{}{}", sections.frontmatter, sections.imports, sections.content);
        assert_eq!(joined, DOC);
    }

    #[test]
    fn sections_without_frontmatter() {
        let doc = "// note\n/*\n block\n*/\nexport const meta = {}\nBody\n";
        let sections = extract_mdx_sections(doc);
        assert_eq!(sections.frontmatter, "");
        assert_eq!(sections.content, "Body\n");
    }

    #[test]
    fn rewrites_imports_and_content() {
        let out = transform_mdx_imports(DOC, &table_rule()).unwrap();
        assert!(out.contains("import {Table} from \"@qualcomm-ui/react/table\"\n"));
        assert!(out.contains("import {QTr} from \"@qui/react-table\"\n"));
        assert!(out.contains("import {Demo} from \"../demo\""));
        assert!(out.contains("Use <Table.Table> with <QTr> rows. QTableFooter is unrelated."));
        assert!(out.starts_with("---\ntitle: Tables\n---\n"));
    }

    #[test]
    fn partial_move_keeps_source_line() {
        let rule = create_entries(
            "@qui/react-table",
            vec![RuleEntry::new("@qualcomm-ui/react/table").imports(["QTr"])],
        )
        .remove(0);
        let lines = transform_import_line("  import {QTable, QTr as Row} from '@qui/react-table';", &rule).unwrap();
        assert_eq!(
            lines,
            vec![
                "  import {QTr as Row} from '@qualcomm-ui/react/table';",
                "  import {QTable} from '@qui/react-table';",
            ]
        );
    }

    #[test]
    fn type_imports_stay_type_imports() {
        let rule = create_entries("@qui/base", vec![RuleEntry::new("@qui/utils")]).remove(0);
        let lines = transform_import_line("import type {Props} from \"@qui/base\"", &rule).unwrap();
        assert_eq!(lines, vec!["import type {Props} from \"@qui/utils\""]);
    }

    #[test]
    fn removed_only_line_disappears() {
        let rule = create_entries(
            "@qui/mdx-docs",
            vec![RuleEntry::new("@qualcomm-ui/react-mdx").imports(["Tip"]).remove(["TipIcon"])],
        )
        .remove(0);
        assert_eq!(
            transform_import_line("import {TipIcon} from \"@qui/mdx-docs\"", &rule),
            Some(vec![])
        );
    }

    #[test]
    fn documents_without_the_package_are_skipped() {
        let rule = table_rule();
        assert_eq!(transform_mdx_imports("# Title\n\nQTable\n", &rule), None);
    }
}
