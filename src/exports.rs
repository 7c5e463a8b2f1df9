//! Export inventory for a legacy package, used to seed migration configs.
//!
//! Extraction is plain text matching over comment- and string-stripped
//! source, not a parse. It is good enough to list what a package exposes and
//! misses unusual shapes such as `export type {..}` lists.

use crate::error::{CodemodError, Result};
use crate::rules::{MigrationConfig, RuleEntry};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "dist", "build"];

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$").expect("line comment pattern"));
static DOUBLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:[^"\\]|\\.)*""#).expect("double quote pattern"));
static SINGLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(?:[^'\\]|\\.)*'").expect("single quote pattern"));
static TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(?:[^`\\]|\\.)*`").expect("template pattern"));

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(function|class|interface|type)\s+([a-zA-Z_$][a-zA-Z0-9_$]*)")
        .expect("declaration export pattern")
});
static BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(const|let|var)\s+([a-zA-Z_$][a-zA-Z0-9_$]*)")
        .expect("binding export pattern")
});
static DEFAULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"export\s+default\s+(?:function\s+([a-zA-Z_$][a-zA-Z0-9_$]*)|class\s+([a-zA-Z_$][a-zA-Z0-9_$]*)|([a-zA-Z_$][a-zA-Z0-9_$]*))",
    )
    .expect("default export pattern")
});
static NAMED_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"export\s*\{\s*([^}]+)\s*\}").expect("export list pattern"));
static WILDCARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"export\s+\*\s+from\s+["']([^"']+)["']"#).expect("wildcard export pattern")
});
static AS_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+as\s+").expect("alias pattern"));
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*$").expect("identifier pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Function,
    Class,
    Interface,
    Type,
    Const,
    Default,
    Named,
    Reexport,
}

impl ExportKind {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "function" => ExportKind::Function,
            "class" => ExportKind::Class,
            "interface" => ExportKind::Interface,
            _ => ExportKind::Type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportInfo {
    pub file: PathBuf,
    pub name: String,
    pub kind: ExportKind,
}

/// Exports found under one top-level directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectoryStats {
    pub exports: Vec<ExportInfo>,
    pub by_kind: BTreeMap<ExportKind, usize>,
    pub files: Vec<PathBuf>,
}

impl DirectoryStats {
    pub fn total(&self) -> usize {
        self.exports.len()
    }

    fn push(&mut self, export: ExportInfo) {
        *self.by_kind.entry(export.kind).or_default() += 1;
        if !self.files.contains(&export.file) {
            self.files.push(export.file.clone());
        }
        self.exports.push(export);
    }
}

/// Replaces comments with a space and string bodies with nothing.
pub fn strip_comments_and_strings(content: &str) -> String {
    let stripped = strip_comments(content);
    let stripped = DOUBLE_QUOTED.replace_all(&stripped, "\"\"");
    let stripped = SINGLE_QUOTED.replace_all(&stripped, "''");
    TEMPLATE.replace_all(&stripped, "``").into_owned()
}

fn strip_comments(content: &str) -> String {
    let stripped = BLOCK_COMMENT.replace_all(content, " ");
    LINE_COMMENT.replace_all(&stripped, " ").into_owned()
}

/// Every export in `content`, grouped by pattern in a fixed order.
pub fn extract_exports(content: &str, file: &Path) -> Vec<ExportInfo> {
    let clean = strip_comments_and_strings(content);
    let export = |name: &str, kind| ExportInfo {
        file: file.to_path_buf(),
        name: name.to_string(),
        kind,
    };
    let mut exports = Vec::new();

    for caps in DECLARATION.captures_iter(&clean) {
        exports.push(export(&caps[2], ExportKind::from_keyword(&caps[1])));
    }
    for caps in BINDING.captures_iter(&clean) {
        exports.push(export(&caps[2], ExportKind::Const));
    }
    for caps in DEFAULT.captures_iter(&clean) {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map_or("default", |m| m.as_str());
        exports.push(export(name, ExportKind::Default));
    }
    for caps in NAMED_LIST.captures_iter(&clean) {
        for item in caps[1].split(',') {
            let item = item.trim();
            let name = AS_KEYWORD.split(item).next().unwrap_or_default().trim();
            if IDENTIFIER.is_match(name) {
                exports.push(export(name, ExportKind::Named));
            }
        }
    }
    // Module specifiers are strings, so wildcards are matched before string stripping.
    for caps in WILDCARD.captures_iter(&strip_comments(content)) {
        exports.push(export(&format!("* from \"{}\"", &caps[1]), ExportKind::Reexport));
    }

    exports
}

fn is_skipped(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|s| SKIPPED_DIRS.contains(&s))
}

fn is_typescript(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "ts" || ext == "tsx")
}

/// Collects exports under a directory and aggregates them by top-level subdirectory.
#[derive(Debug, Default)]
pub struct ExportAnalyzer {
    files_processed: usize,
    stats: Vec<(String, DirectoryStats)>,
}

impl ExportAnalyzer {
    pub fn analyze_directory(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(CodemodError::io(
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let mut analyzer = ExportAnalyzer::default();
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "could not scan entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_typescript(entry.path()) {
                continue;
            }
            let content = match std::fs::read_to_string(entry.path()) {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %entry.path().display(), error = %e, "could not analyze file");
                    continue;
                }
            };

            analyzer.files_processed += 1;
            let Some(top) = top_level_dir(root, entry.path()) else {
                continue;
            };
            let exports = extract_exports(&content, entry.path());
            debug!(file = %entry.path().display(), exports = exports.len(), "analyzed");
            for export in exports {
                analyzer.stats_for(&top).push(export);
            }
        }

        // Stable sort keeps first-seen order among equal totals.
        analyzer.stats.sort_by(|(_, a), (_, b)| b.total().cmp(&a.total()));
        Ok(analyzer)
    }

    fn stats_for(&mut self, dir: &str) -> &mut DirectoryStats {
        let index = match self.stats.iter().position(|(name, _)| name == dir) {
            Some(index) => index,
            None => {
                self.stats.push((dir.to_string(), DirectoryStats::default()));
                self.stats.len() - 1
            }
        };
        &mut self.stats[index].1
    }

    pub fn files_processed(&self) -> usize {
        self.files_processed
    }

    /// Per-directory stats, most exports first.
    pub fn stats(&self) -> &[(String, DirectoryStats)] {
        &self.stats
    }

    /// One move-only rule per directory, targeting `package/<dir>`.
    pub fn create_migration_config(&self, package: &str) -> MigrationConfig {
        let entries = self
            .stats
            .iter()
            .map(|(dir, stats)| {
                RuleEntry::new(&format!("{package}/{dir}"))
                    .imports(stats.exports.iter().map(|e| e.name.clone()))
            })
            .collect();
        (package.to_string(), entries)
    }

    pub fn report(&self) -> String {
        let mut out = String::from("Export Analysis Report\n");
        out.push_str(&"=".repeat(50));
        out.push('\n');
        for (dir, stats) in &self.stats {
            out.push('\n');
            out.push_str(dir);
            out.push('\n');
            for export in &stats.exports {
                out.push_str("  ");
                out.push_str(&export.name);
                out.push('\n');
            }
        }
        out
    }
}

fn top_level_dir(root: &Path, file: &Path) -> Option<String> {
    file.strip_prefix(root)
        .ok()?
        .components()
        .next()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
}
