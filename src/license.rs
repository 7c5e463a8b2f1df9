//! Copyright and license header checks for the monorepo's source files.
//!
//! `lint` reports files missing the repository header, `fix` inserts it.
//! Files that mention a non-permissive license are reported but never
//! rewritten.

use crate::error::{CodemodError, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const COPYRIGHT: &str = "Copyright (c) Qualcomm Technologies, Inc. and/or its subsidiaries.";
pub const REPO_LICENSE: &str = "SPDX-License-Identifier: BSD-3-Clause-Clear";

const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs"];
const ALWAYS_IGNORED: &[&str] = &["node_modules", ".git"];
const IGNORE_FILE: &str = ".licenseignore";

pub const NON_PERMISSIVE_LICENSES: &[&str] = &[
    "GPL-2.0",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0",
    "GPL-3.0-only",
    "GPL-3.0-or-later",
    "AGPL-3.0",
    "AGPL-3.0-only",
    "AGPL-3.0-or-later",
    "SSPL-1.0",
    "EUPL-1.2",
    "LGPL-2.1",
    "LGPL-2.1-only",
    "LGPL-2.1-or-later",
    "LGPL-3.0",
    "LGPL-3.0-only",
    "LGPL-3.0-or-later",
    "MPL-2.0",
    "EPL-2.0",
    "CPL-1.0",
    "CDDL-1.0",
    "OSL-3.0",
    "CC-BY-SA-4.0",
    "RPL-1.5",
    "APSL-2.0",
];

static USE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["']use .*["'];?$"#).expect("directive pattern"));

/// Which header `fix` writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderKind {
    /// Code written in this repository.
    Original,
    /// Code adapted from another project under its own license.
    Modified {
        source_url: String,
        source_license: String,
    },
}

impl HeaderKind {
    pub fn header(&self) -> String {
        match self {
            HeaderKind::Original => format!("// {COPYRIGHT}\n// {REPO_LICENSE}"),
            HeaderKind::Modified {
                source_url,
                source_license,
            } => format!(
                "// Modified from {source_url}\n// {source_license}\n// Changes from Qualcomm Technologies, Inc. are provided under the following license:\n// {COPYRIGHT}\n// {REPO_LICENSE}"
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub file: PathBuf,
    pub has_copyright: bool,
    pub has_license: bool,
    pub has_non_permissive_license: bool,
}

impl LintResult {
    pub fn passed(&self) -> bool {
        !self.has_non_permissive_license && self.has_license && self.has_copyright
    }

    pub fn missing_header(&self) -> bool {
        !self.has_license || !self.has_copyright
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LintMetrics {
    pub file_count: usize,
    pub missing_copyright: usize,
    pub missing_license: usize,
    pub non_permissive_license: usize,
    pub valid_copyright: usize,
    pub valid_license: usize,
}

#[derive(Debug, Default)]
pub struct LintReport {
    pub metrics: LintMetrics,
    pub results: Vec<LintResult>,
}

impl LintReport {
    /// Non-permissive files are listed as failures but do not fail the run on their own.
    pub fn is_clean(&self) -> bool {
        self.metrics.missing_copyright == 0 && self.metrics.missing_license == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &LintResult> {
        self.results.iter().filter(|r| !r.passed())
    }
}

pub fn has_copyright(content: &str) -> bool {
    content.contains(COPYRIGHT)
}

pub fn has_license(content: &str) -> bool {
    content.contains(REPO_LICENSE)
}

pub fn has_non_permissive_license(content: &str) -> bool {
    NON_PERMISSIVE_LICENSES.iter().any(|l| content.contains(l))
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e))
}

/// Drops every line carrying part of the repository header.
fn strip_existing_header(content: &str) -> String {
    content
        .split('\n')
        .filter(|line| !line.contains(COPYRIGHT) && !line.contains(REPO_LICENSE))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits off the shebang, blank lines and `"use ..."` directives that must
/// stay above the header.
fn split_prologue(content: &str) -> (String, String) {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut idx = 0;
    if lines.first().is_some_and(|l| l.starts_with("#!")) {
        idx += 1;
    }
    while idx < lines.len() {
        let trimmed = lines[idx].trim();
        if trimmed.is_empty() || USE_DIRECTIVE.is_match(trimmed) {
            idx += 1;
        } else {
            break;
        }
    }
    (lines[..idx].join("\n"), lines[idx..].join("\n"))
}

/// Returns `content` with `header` inserted, or `None` if it already has one
/// or carries a non-permissive license.
pub fn insert_header(content: &str, kind: &HeaderKind) -> Option<String> {
    if has_copyright(content) && has_license(content) {
        return None;
    }
    if has_non_permissive_license(content) {
        return None;
    }
    let stripped = strip_existing_header(content);
    let (prefix, body) = split_prologue(&stripped);
    let header = kind.header();
    Some(if prefix.is_empty() {
        format!("{header}\n\n{body}")
    } else {
        format!("{prefix}\n{header}\n\n{body}")
    })
}

/// `.licenseignore` rules plus the directories that are never scanned.
#[derive(Debug, Clone)]
struct IgnoreRules {
    matcher: Gitignore,
}

impl IgnoreRules {
    fn parse(root: &Path, source: Option<&Path>, lines: &str) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        for line in ALWAYS_IGNORED.iter().copied().chain(lines.lines()) {
            builder
                .add_line(source.map(Path::to_path_buf), line)
                .map_err(|e| CodemodError::Pattern {
                    pattern: line.to_string(),
                    message: e.to_string(),
                })?;
        }
        let matcher = builder.build().map_err(|e| CodemodError::Pattern {
            pattern: IGNORE_FILE.to_string(),
            message: e.to_string(),
        })?;
        Ok(IgnoreRules { matcher })
    }

    /// Gitignore semantics for a single entry. Parents are not consulted, so
    /// callers walking a tree prune ignored directories as they go.
    fn ignores(&self, relative: &Path, is_dir: bool) -> bool {
        self.matcher.matched(relative, is_dir).is_ignore()
    }
}

/// Scans and fixes license headers below a project root.
#[derive(Debug, Clone)]
pub struct LicenseChecker {
    root: PathBuf,
    ignore: IgnoreRules,
    loaded_ignore_file: bool,
}

impl LicenseChecker {
    /// Loads `.licenseignore` from `root` if present.
    pub fn new(root: &Path) -> Result<Self> {
        let ignore_path = root.join(IGNORE_FILE);
        let (content, loaded_ignore_file) = match std::fs::read_to_string(&ignore_path) {
            Ok(content) => (content, true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (String::new(), false),
            Err(e) => return Err(CodemodError::io(ignore_path, e)),
        };
        let source = loaded_ignore_file.then_some(ignore_path.as_path());
        Ok(LicenseChecker {
            root: root.to_path_buf(),
            ignore: IgnoreRules::parse(root, source, &content)?,
            loaded_ignore_file,
        })
    }

    pub fn loaded_ignore_file(&self) -> bool {
        self.loaded_ignore_file
    }

    fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.ignore.ignores(relative, is_dir)
    }

    /// Supported, non-ignored files under `directory`, sorted.
    pub fn scan(&self, directory: &Path) -> Vec<PathBuf> {
        let start = self.root.join(directory);
        let mut files: Vec<PathBuf> = WalkDir::new(&start)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !self.is_ignored(e.path(), e.file_type().is_dir())
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && is_supported(e.path()))
            .map(walkdir::DirEntry::into_path)
            .collect();
        files.sort();
        files
    }

    pub fn lint(&self, directory: &Path) -> Result<LintReport> {
        let mut report = LintReport::default();
        for file in self.scan(directory) {
            let content = std::fs::read_to_string(&file).map_err(|e| CodemodError::io(&file, e))?;
            let result = LintResult {
                has_copyright: has_copyright(&content),
                has_license: has_license(&content),
                has_non_permissive_license: has_non_permissive_license(&content),
                file,
            };

            let m = &mut report.metrics;
            m.file_count += 1;
            if result.has_non_permissive_license {
                m.non_permissive_license += 1;
            }
            if result.has_license {
                m.valid_license += 1;
            } else {
                m.missing_license += 1;
            }
            if result.has_copyright {
                m.valid_copyright += 1;
            } else {
                m.missing_copyright += 1;
            }
            report.results.push(result);
        }
        Ok(report)
    }

    /// Files under `directory` that lack the copyright or license line.
    pub fn files_without_headers(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .lint(directory)?
            .results
            .into_iter()
            .filter(LintResult::missing_header)
            .map(|r| r.file)
            .collect())
    }

    /// Adds the header to every file under `directory` that needs one.
    pub fn fix(&self, directory: &Path, kind: &HeaderKind) -> Result<Vec<PathBuf>> {
        self.fix_files(&self.scan(directory), kind)
    }

    /// Adds the header to each of `files` that needs one. Returns the files written.
    pub fn fix_files(&self, files: &[PathBuf], kind: &HeaderKind) -> Result<Vec<PathBuf>> {
        let mut modified = Vec::new();
        for file in files.iter().filter(|f| is_supported(f)) {
            let content = std::fs::read_to_string(file).map_err(|e| CodemodError::io(file, e))?;
            let Some(updated) = insert_header(&content, kind) else {
                if has_non_permissive_license(&content) && !(has_copyright(&content) && has_license(&content)) {
                    warn!(file = %file.display(), "not modifying file under a non-permissive license");
                }
                continue;
            };
            std::fs::write(file, updated).map_err(|e| CodemodError::io(file, e))?;
            debug!(file = %file.display(), "added header");
            modified.push(file.clone());
        }
        Ok(modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn original() -> String {
        HeaderKind::Original.header()
    }

    #[test]
    fn inserts_header_at_top() {
        let out = insert_header("export const a = 1\n", &HeaderKind::Original).unwrap();
        assert_eq!(out, format!("{}\n\nexport const a = 1\n", original()));
    }

    #[test]
    fn keeps_shebang_and_directives_above_header() {
        let out = insert_header(
            "#!/usr/bin/env node\n\"use client\"\n\nmain()\n",
            &HeaderKind::Original,
        )
        .unwrap();
        assert_eq!(
            out,
            format!("#!/usr/bin/env node\n\"use client\"\n\n{}\n\nmain()\n", original())
        );
    }

    #[test]
    fn replaces_partial_header() {
        let content = format!("// {COPYRIGHT}\nexport {{}}\n");
        let out = insert_header(&content, &HeaderKind::Original).unwrap();
        assert_eq!(out, format!("{}\n\nexport {{}}\n", original()));
    }

    #[test]
    fn leaves_complete_and_non_permissive_files_alone() {
        let complete = format!("{}\n\nx()\n", original());
        assert_eq!(insert_header(&complete, &HeaderKind::Original), None);
        let gpl = "// SPDX-License-Identifier: GPL-3.0-only\nx()\n";
        assert_eq!(insert_header(gpl, &HeaderKind::Original), None);
    }

    #[test]
    fn modified_header_names_the_source() {
        let kind = HeaderKind::Modified {
            source_url: "https://github.com/example/repo".to_string(),
            source_license: "MIT License".to_string(),
        };
        let header = kind.header();
        assert!(header.starts_with("// Modified from https://github.com/example/repo\n// MIT License\n"));
        assert!(header.ends_with(&format!("// {COPYRIGHT}\n// {REPO_LICENSE}")));
    }

    #[test]
    fn ignore_rules_follow_gitignore() {
        let rules = IgnoreRules::parse(
            Path::new("/repo"),
            None,
            "# generated\n*.d.ts\n/vendor/\nsrc/legacy\n*.gen.ts\n!keep.gen.ts\n",
        )
        .unwrap();
        assert!(rules.ignores(Path::new("node_modules"), true));
        assert!(rules.ignores(Path::new("types/env.d.ts"), false));
        assert!(rules.ignores(Path::new("vendor"), true));
        assert!(!rules.ignores(Path::new("vendor"), false));
        assert!(!rules.ignores(Path::new("lib/vendor"), true));
        assert!(rules.ignores(Path::new("src/legacy"), true));
        assert!(!rules.ignores(Path::new("src/new/index.ts"), false));
        assert!(rules.ignores(Path::new("src/a.gen.ts"), false));
        assert!(!rules.ignores(Path::new("src/keep.gen.ts"), false));
    }

    #[test]
    fn negated_patterns_are_scanned_again() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join(".licenseignore"), "*.gen.ts\n!keep.gen.ts\n").unwrap();
        fs::write(tmp.path().join("src/a.gen.ts"), "export {}\n").unwrap();
        fs::write(tmp.path().join("src/keep.gen.ts"), "export {}\n").unwrap();

        let checker = LicenseChecker::new(tmp.path()).unwrap();
        assert_eq!(
            checker.scan(Path::new(".")),
            vec![tmp.path().join("src/keep.gen.ts")]
        );
    }

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let files = [
            ("src/ok.ts".to_string(), format!("{}\n\nexport {{}}\n", original())),
            ("src/missing.tsx".to_string(), "export const A = 1\n".to_string()),
            ("src/gpl.js".to_string(), "// GPL-3.0\nmodule.exports = {}\n".to_string()),
            ("src/styles.css".to_string(), "a {}\n".to_string()),
            ("generated/out.ts".to_string(), "export {}\n".to_string()),
            ("node_modules/dep/index.js".to_string(), "x\n".to_string()),
            (".licenseignore".to_string(), "generated\n".to_string()),
        ];
        for (rel, content) in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        tmp
    }

    #[test]
    fn lint_counts_headers() {
        let tmp = project();
        let checker = LicenseChecker::new(tmp.path()).unwrap();
        assert!(checker.loaded_ignore_file());

        let report = checker.lint(Path::new(".")).unwrap();
        assert_eq!(
            report.metrics,
            LintMetrics {
                file_count: 3,
                missing_copyright: 2,
                missing_license: 2,
                non_permissive_license: 1,
                valid_copyright: 1,
                valid_license: 1,
            }
        );
        assert!(!report.is_clean());
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn fix_skips_non_permissive_files() {
        let tmp = project();
        let checker = LicenseChecker::new(tmp.path()).unwrap();
        let modified = checker.fix(Path::new("src"), &HeaderKind::Original).unwrap();
        assert_eq!(modified.len(), 1);
        assert!(modified[0].ends_with("missing.tsx"));

        let gpl = fs::read_to_string(tmp.path().join("src/gpl.js")).unwrap();
        assert!(!has_copyright(&gpl));
        assert!(checker.lint(Path::new("src")).unwrap().failures().count() == 1);
    }
}
