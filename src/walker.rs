//! Directory walker for the import migrations.
//!
//! Resolves the `--dir` globs to directories, collects the `.ts`, `.tsx` and
//! `.mdx` files beneath them and runs each rule group over every file. Groups
//! run one after another so two groups never race on the same file; files
//! within a group are processed concurrently.

use crate::error::{CodemodError, Result};
use crate::mdx::transform_mdx;
use crate::rules::{MigrationRule, group_by_source};
use crate::transform::{TransformOptions, transform_ts};
use futures::future::join_all;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const IGNORED_DIRS: &[&str] = &["node_modules", "dist", "build"];

/// How much the walker reports while it runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogMode {
    #[default]
    Info,
    Verbose,
}

#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Comma-separated glob patterns naming the directories to process.
    pub dir: String,
    pub dry_run: bool,
    pub log_mode: LogMode,
}

/// Files seen and files rewritten during a run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub processed: BTreeSet<PathBuf>,
    pub changed: BTreeSet<PathBuf>,
}

impl RunStats {
    /// One-line summary, e.g. `Processed 12 files (3 updates)`.
    pub fn summary(&self, dry_run: bool) -> String {
        let suffix = if dry_run { " (dry-run, no files modified)" } else { "" };
        format!(
            "Processed {} files ({} updates){}",
            self.processed.len(),
            self.changed.len(),
            suffix
        )
    }
}

/// The two file families the import migrations understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    TypeScript,
    Mdx,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") | Some("tsx") => Some(SourceKind::TypeScript),
            Some("mdx") => Some(SourceKind::Mdx),
            _ => None,
        }
    }
}

/// Expands the comma-separated patterns in `dir` into existing directories.
pub fn resolve_directories(dir: &str) -> Result<Vec<PathBuf>> {
    let mut directories = BTreeSet::new();

    for pattern in dir.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let pattern = pattern.trim_end_matches('/');
        let pattern = if pattern.is_empty() { "/" } else { pattern };
        let entries = glob::glob(pattern).map_err(|e| CodemodError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_dir() => {
                    directories.insert(path);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "skipping unreadable glob entry"),
            }
        }
    }

    Ok(directories.into_iter().collect())
}

fn is_skipped(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.') || IGNORED_DIRS.contains(&s))
}

/// Collects supported files under `directories`, sorted and without duplicates.
///
/// The roots themselves are always walked, even when their own name would be skipped.
pub fn collect_source_files(directories: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = BTreeSet::new();

    for dir in directories {
        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && SourceKind::from_path(entry.path()).is_some() {
                files.insert(entry.into_path());
            }
        }
    }

    files.into_iter().collect()
}

/// Runs `rules` over a single file, picking the rewriter by extension.
pub async fn process_file(
    path: &Path,
    rules: &[MigrationRule],
    options: &TransformOptions,
) -> Result<bool> {
    match SourceKind::from_path(path) {
        Some(SourceKind::TypeScript) => transform_ts(path, rules, options).await,
        Some(SourceKind::Mdx) => transform_mdx(path, rules, options).await,
        None => Ok(false),
    }
}

/// Applies `rules` to every file under the configured directories.
///
/// I/O failures are logged and the file is skipped. A parse failure aborts
/// the run once the current group's in-flight files have settled.
pub async fn process_dirs(rules: &[MigrationRule], config: &ProcessConfig) -> Result<RunStats> {
    let directories = resolve_directories(&config.dir)?;
    debug!(count = directories.len(), "resolved directories");
    for dir in &directories {
        debug!(dir = %dir.display(), "processing directory");
    }

    let files = collect_source_files(&directories);
    let options = TransformOptions {
        dry_run: config.dry_run,
    };
    let mut stats = RunStats::default();

    for group in group_by_source(rules) {
        debug!(
            source = %group.source_package,
            rules = group.rules.len(),
            files = files.len(),
            "running rule group"
        );
        let group_rules = &group.rules;
        let results = join_all(files.iter().map(|file| async move {
            let result = process_file(file, group_rules, &options).await;
            (file, result)
        }))
        .await;

        let mut failure = None;
        for (file, result) in results {
            stats.processed.insert(file.clone());
            match result {
                Ok(true) => {
                    debug!(file = %file.display(), "updated");
                    stats.changed.insert(file.clone());
                }
                Ok(false) => {}
                Err(e) if e.is_recoverable() => {
                    warn!(file = %file.display(), error = %e, "skipping file");
                }
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleEntry, create_entries};
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn rules() -> Vec<MigrationRule> {
        create_entries(
            "@qui/mdx-docs",
            vec![RuleEntry::new("@qualcomm-ui/react-mdx/tip").imports(["Tip"])],
        )
    }

    fn config(root: &Path, dry_run: bool) -> ProcessConfig {
        ProcessConfig {
            dir: root.display().to_string(),
            dry_run,
            log_mode: LogMode::Info,
        }
    }

    #[test]
    fn collects_supported_files_and_skips_ignored_dirs() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "src/a.tsx", "");
        write(root, "src/nested/b.ts", "");
        write(root, "docs/c.mdx", "");
        write(root, "src/readme.md", "");
        write(root, "node_modules/pkg/d.ts", "");
        write(root, "dist/e.ts", "");
        write(root, ".cache/f.ts", "");

        let files = collect_source_files(&[root.to_path_buf()]);
        let rel: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(rel, vec!["docs/c.mdx", "src/a.tsx", "src/nested/b.ts"]);
    }

    #[test]
    fn overlapping_roots_are_deduplicated() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "src/a.ts", "");
        let files = collect_source_files(&[root.to_path_buf(), root.join("src")]);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn resolves_comma_separated_globs_to_directories() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "one/a.ts", "");
        write(root, "two/b.ts", "");
        write(root, "file.ts", "");

        let pattern = format!("{}/one/, {}/t*", root.display(), root.display());
        let dirs = resolve_directories(&pattern).unwrap();
        assert_eq!(dirs, vec![root.join("one"), root.join("two")]);
    }

    #[test]
    fn invalid_glob_is_reported() {
        assert!(matches!(
            resolve_directories("src/[unterminated"),
            Err(CodemodError::Pattern { .. })
        ));
    }

    #[tokio::test]
    async fn rewrites_matching_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let tsx = write(
            root,
            "src/page.tsx",
            "import {Tip} from \"@qui/mdx-docs\"\n\nexport const Page = () => <Tip />\n",
        );
        let untouched = write(root, "src/other.ts", "export const x = 1\n");

        let stats = process_dirs(&rules(), &config(root, false)).await.unwrap();
        assert_eq!(stats.processed.len(), 2);
        assert!(stats.changed.contains(&tsx));
        assert!(!stats.changed.contains(&untouched));
        assert_eq!(
            fs::read_to_string(&tsx).unwrap(),
            "import {Tip} from \"@qualcomm-ui/react-mdx/tip\"\n\nexport const Page = () => <Tip />\n"
        );
        assert_eq!(stats.summary(false), "Processed 2 files (1 updates)");
    }

    #[tokio::test]
    async fn dry_run_leaves_files_alone() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let original = "import {Tip} from \"@qui/mdx-docs\"\n";
        let file = write(root, "a.ts", original);

        let stats = process_dirs(&rules(), &config(root, true)).await.unwrap();
        assert!(stats.changed.contains(&file));
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
        assert!(stats.summary(true).ends_with("(dry-run, no files modified)"));
    }

    #[tokio::test]
    async fn unreadable_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let binary = root.join("binary.ts");
        fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let page = write(root, "page.ts", "import {Tip} from \"@qui/mdx-docs\"\n");

        let stats = process_dirs(&rules(), &config(root, false)).await.unwrap();
        assert_eq!(stats.processed.len(), 2);
        assert_eq!(stats.changed.iter().collect::<Vec<_>>(), vec![&page]);
        assert_eq!(fs::read(&binary).unwrap(), vec![0xff, 0xfe, 0x00, 0x80]);
    }

    #[tokio::test]
    async fn parse_failure_aborts_the_run() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "broken.ts", "import {Tip from \"@qui/mdx-docs\"\nconst = ;\n");

        let err = process_dirs(&rules(), &config(root, false)).await.unwrap_err();
        assert!(matches!(err, CodemodError::Parse { .. }));
    }
}
