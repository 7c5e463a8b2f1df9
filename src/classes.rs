//! Class-name token rewriting.
//!
//! Class strings are located with per-file-kind text patterns (JSX attributes,
//! `cn(...)` calls, HTML attributes, CSS selectors, Angular host bindings),
//! split into whitespace-delimited tokens and run through an ordered list of
//! [`ClassTransformRule`]s. The first matching rule wins.

use crate::error::{CodemodError, Result};
use crate::syntax::{Edit, apply_edits_to, line_of};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Computes a replacement from the whole match and its capture groups.
pub type ComputeFn = fn(&str, &[&str]) -> String;

#[derive(Debug, Clone)]
pub enum TokenPattern {
    /// Matches a token exactly.
    Exact(String),
    /// Matches when the regex finds a match within the token.
    Regex(Regex),
}

#[derive(Debug, Clone)]
pub enum Replacement {
    /// Plain text. For regex patterns `$1`-style references are expanded.
    Literal(String),
    Computed(ComputeFn),
}

#[derive(Debug, Clone)]
pub struct ClassTransformRule {
    pub pattern: TokenPattern,
    pub replacement: Replacement,
}

impl ClassTransformRule {
    pub fn exact(pattern: &str, replacement: &str) -> Self {
        ClassTransformRule {
            pattern: TokenPattern::Exact(pattern.to_string()),
            replacement: Replacement::Literal(replacement.to_string()),
        }
    }

    pub fn regex(pattern: &str, replacement: &str) -> std::result::Result<Self, regex::Error> {
        Ok(ClassTransformRule {
            pattern: TokenPattern::Regex(Regex::new(pattern)?),
            replacement: Replacement::Literal(replacement.to_string()),
        })
    }

    pub fn computed(pattern: &str, compute: ComputeFn) -> std::result::Result<Self, regex::Error> {
        Ok(ClassTransformRule {
            pattern: TokenPattern::Regex(Regex::new(pattern)?),
            replacement: Replacement::Computed(compute),
        })
    }

    /// The replacement for `token`, or `None` if this rule does not match it.
    pub fn apply(&self, token: &str) -> Option<String> {
        match &self.pattern {
            TokenPattern::Exact(exact) => (token == exact).then(|| match &self.replacement {
                Replacement::Literal(text) => text.clone(),
                Replacement::Computed(compute) => compute(token, &[]),
            }),
            TokenPattern::Regex(re) => {
                let caps = re.captures(token)?;
                Some(match &self.replacement {
                    Replacement::Literal(text) => re.replace(token, text.as_str()).into_owned(),
                    Replacement::Computed(compute) => {
                        let groups: Vec<&str> = caps
                            .iter()
                            .skip(1)
                            .map(|g| g.map_or("", |m| m.as_str()))
                            .collect();
                        compute(&caps[0], &groups)
                    }
                })
            }
        }
    }

    /// Rules written against `var(--...)` references rather than class tokens.
    pub fn is_custom_property(&self) -> bool {
        matches!(&self.pattern, TokenPattern::Regex(re) if re.as_str().starts_with(r"var\("))
    }
}

/// Replacement for `token` from the first matching rule.
pub fn transform_token(token: &str, rules: &[ClassTransformRule]) -> Option<String> {
    rules.iter().find_map(|rule| rule.apply(token))
}

/// A single token rewrite, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassChange {
    pub file: PathBuf,
    pub line: usize,
    pub old_class: String,
    pub new_class: String,
}

#[derive(Debug, Clone)]
pub struct ClassRewrite {
    pub content: String,
    pub changed: bool,
    pub changes: Vec<ClassChange>,
}

/// How class names are located in a file, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassFileKind {
    Jsx,
    Html,
    Css,
    AngularTs,
}

impl ClassFileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "tsx" | "jsx" => Some(ClassFileKind::Jsx),
            "html" => Some(ClassFileKind::Html),
            "css" | "scss" => Some(ClassFileKind::Css),
            "ts" => Some(ClassFileKind::AngularTs),
            _ => None,
        }
    }

    pub fn rewrite(self, file: &Path, content: &str, rules: &[ClassTransformRule]) -> ClassRewrite {
        let mut rewriter = TokenRewriter {
            rules,
            file,
            changes: Vec::new(),
        };
        let updated = match self {
            ClassFileKind::Jsx => rewriter.jsx(content),
            ClassFileKind::Html => rewriter.html(content),
            ClassFileKind::Css => rewriter.css(content),
            ClassFileKind::AngularTs => rewriter.angular(content),
        };
        ClassRewrite {
            changed: updated != content,
            content: updated,
            changes: rewriter.changes,
        }
    }
}

static JSX_CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:className|class)=["']([^"']+)["']"#).expect("class attribute pattern")
});
static CLASS_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"className=\{[^}]*|\bcn\([^)]*|\bclsx\([^)]*|\bcva\([^)]*").expect("class call pattern")
});
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([^"']+)["']"#).expect("quoted string pattern"));
static TEMPLATE_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]*)`").expect("template literal pattern"));
static CLASS_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z][\w-]*(?:\s+[a-z][\w-]*)*").expect("class run pattern")
});
static HTML_CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class=["']([^"']+)["']"#).expect("html class pattern"));
static CSS_APPLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@apply\s+([^;]+);").expect("@apply pattern"));
static HOST_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"host:\s*\{[^}]*class:\s*["']([^"']+)["']"#).expect("host class pattern")
});
static HOST_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@HostBinding\(['"]class['"]\)[^=]*=\s*["']([^"']+)["']"#)
        .expect("host binding pattern")
});
static INLINE_TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"template:\s*`([^`]*)`").expect("inline template pattern"));

/// Replaces capture group `group` of every match of `re`.
///
/// `rewrite` receives the group text and its byte offset in `text`.
fn replace_group(
    text: &str,
    re: &Regex,
    group: usize,
    mut rewrite: impl FnMut(&str, usize) -> String,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(m) = caps.get(group) else {
            continue;
        };
        out.push_str(&text[last..m.start()]);
        out.push_str(&rewrite(m.as_str(), m.start()));
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Splits a template literal body into `(is_literal, text)` segments,
/// separating out `${...}` interpolations.
fn template_segments(body: &str) -> Vec<(bool, &str)> {
    let bytes = body.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{') {
            if start < i {
                segments.push((true, &body[start..i]));
            }
            let mut depth = 0usize;
            let mut j = i + 1;
            while j < bytes.len() {
                match bytes[j] {
                    b'{' => depth += 1,
                    b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                j += 1;
            }
            let end = (j + 1).min(bytes.len());
            segments.push((false, &body[i..end]));
            start = end;
            i = end;
        } else {
            i += 1;
        }
    }
    if start < bytes.len() {
        segments.push((true, &body[start..]));
    }
    segments
}

fn selector_boundary(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .is_some_and(|c| c.is_whitespace() || matches!(c, '{' | ',' | ':'))
}

fn strip_anchors(source: &str) -> &str {
    let source = source.strip_prefix('^').unwrap_or(source);
    match source.strip_suffix('$') {
        Some(stripped) if !stripped.ends_with('\\') => stripped,
        _ => source,
    }
}

struct TokenRewriter<'a> {
    rules: &'a [ClassTransformRule],
    file: &'a Path,
    changes: Vec<ClassChange>,
}

impl TokenRewriter<'_> {
    fn record(&mut self, line: usize, old_class: &str, new_class: &str) {
        self.changes.push(ClassChange {
            file: self.file.to_path_buf(),
            line,
            old_class: old_class.to_string(),
            new_class: new_class.to_string(),
        });
    }

    /// Rewrites each token of a class string, keeping the whitespace between
    /// untouched tokens. A token replaced by nothing takes one neighbouring
    /// whitespace run with it.
    fn classes(&mut self, classes: &str, line: usize) -> String {
        let mut pieces: Vec<(bool, String)> = Vec::new();
        let mut rest = classes;
        while !rest.is_empty() {
            let is_space = rest.starts_with(char::is_whitespace);
            let len = rest
                .find(|c: char| c.is_whitespace() != is_space)
                .unwrap_or(rest.len());
            let (piece, tail) = rest.split_at(len);
            let piece = if is_space {
                piece.to_string()
            } else {
                match transform_token(piece, self.rules) {
                    Some(new_class) => {
                        if new_class != piece {
                            self.record(line, piece, &new_class);
                        }
                        new_class
                    }
                    None => piece.to_string(),
                }
            };
            pieces.push((!is_space, piece));
            rest = tail;
        }

        let mut out: Vec<(bool, String)> = Vec::with_capacity(pieces.len());
        let mut drop_next_space = false;
        for (is_token, text) in pieces {
            if is_token && text.is_empty() {
                if matches!(out.last(), Some((false, _))) {
                    out.pop();
                } else {
                    drop_next_space = true;
                }
                continue;
            }
            if !is_token && std::mem::take(&mut drop_next_space) {
                continue;
            }
            out.push((is_token, text));
        }
        out.into_iter().map(|(_, text)| text).collect()
    }

    fn jsx(&mut self, content: &str) -> String {
        let attrs = replace_group(content, &JSX_CLASS_ATTR, 1, |classes, offset| {
            self.classes(classes, line_of(content, offset))
        });

        let calls = replace_group(&attrs, &CLASS_CALL, 0, |call, offset| {
            let line = line_of(&attrs, offset);
            replace_group(call, &QUOTED, 1, |classes, _| self.classes(classes, line))
        });

        replace_group(&calls, &TEMPLATE_LITERAL, 1, |body, offset| {
            if !(body.contains("className") || body.contains("cn(") || body.contains("clsx(")) {
                return body.to_string();
            }
            let line = line_of(&calls, offset);
            template_segments(body)
                .into_iter()
                .map(|(literal, segment)| {
                    if literal {
                        replace_group(segment, &CLASS_RUN, 0, |run, _| self.classes(run, line))
                    } else {
                        segment.to_string()
                    }
                })
                .collect()
        })
    }

    fn html(&mut self, content: &str) -> String {
        replace_group(content, &HTML_CLASS_ATTR, 1, |classes, offset| {
            self.classes(classes, line_of(content, offset))
        })
    }

    fn css(&mut self, content: &str) -> String {
        let applied = replace_group(content, &CSS_APPLY, 1, |classes, offset| {
            self.classes(classes, line_of(content, offset))
        });

        // Every rule scans the same text; the first rule to claim a span wins.
        let mut claimed: Vec<(Edit, String)> = Vec::new();
        for rule in self.rules {
            let found = match &rule.pattern {
                TokenPattern::Exact(token) => exact_selectors(&applied, rule, token),
                TokenPattern::Regex(re) if rule.is_custom_property() => {
                    custom_properties(&applied, rule, re)
                }
                TokenPattern::Regex(re) => regex_selectors(&applied, rule, re),
            };
            for (edit, old) in found {
                if !claimed
                    .iter()
                    .any(|(c, _)| edit.start < c.end && c.start < edit.end)
                {
                    claimed.push((edit, old));
                }
            }
        }

        claimed.sort_by_key(|(edit, _)| edit.start);
        for (edit, old) in &claimed {
            self.record(line_of(&applied, edit.start), old, &edit.new_text);
        }
        apply_edits_to(&applied, claimed.into_iter().map(|(edit, _)| edit).collect())
    }

    fn angular(&mut self, content: &str) -> String {
        let host = replace_group(content, &HOST_CLASS, 1, |classes, offset| {
            self.classes(classes, line_of(content, offset))
        });
        let bindings = replace_group(&host, &HOST_BINDING, 1, |classes, offset| {
            self.classes(classes, line_of(&host, offset))
        });
        replace_group(&bindings, &INLINE_TEMPLATE, 1, |template, offset| {
            replace_group(template, &HTML_CLASS_ATTR, 1, |classes, inner| {
                self.classes(classes, line_of(&bindings, offset + inner))
            })
        })
    }
}

/// Candidate stylesheet edits paired with the text they replace.
type Candidates = Vec<(Edit, String)>;

fn exact_selectors(text: &str, rule: &ClassTransformRule, token: &str) -> Candidates {
    let needle = format!(".{token}");
    let mut found = Vec::new();
    for (start, _) in text.match_indices(&needle) {
        let end = start + needle.len();
        if !selector_boundary(text, end) {
            continue;
        }
        let Some(new_class) = rule.apply(token) else {
            continue;
        };
        if new_class.is_empty() || new_class == token {
            continue;
        }
        let edit = Edit {
            start: start + 1,
            end,
            new_text: new_class,
        };
        found.push((edit, token.to_string()));
    }
    found
}

fn regex_selectors(text: &str, rule: &ClassTransformRule, re: &Regex) -> Candidates {
    let selector = match Regex::new(&format!(r"\.({})", strip_anchors(re.as_str()))) {
        Ok(selector) => selector,
        Err(e) => {
            debug!(pattern = re.as_str(), error = %e, "pattern cannot be used as a selector");
            return Vec::new();
        }
    };
    let mut found = Vec::new();
    for caps in selector.captures_iter(text) {
        let Some(m) = caps.get(1) else {
            continue;
        };
        if !selector_boundary(text, m.end()) {
            continue;
        }
        let old_class = m.as_str();
        let Some(new_class) = rule.apply(old_class) else {
            continue;
        };
        if new_class.is_empty() || new_class == old_class {
            continue;
        }
        let edit = Edit {
            start: m.start(),
            end: m.end(),
            new_text: new_class,
        };
        found.push((edit, old_class.to_string()));
    }
    found
}

fn custom_properties(text: &str, rule: &ClassTransformRule, re: &Regex) -> Candidates {
    let mut found = Vec::new();
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let new_value = match &rule.replacement {
            Replacement::Literal(value) => value.clone(),
            Replacement::Computed(compute) => {
                let groups: Vec<&str> = caps
                    .iter()
                    .skip(1)
                    .map(|g| g.map_or("", |m| m.as_str()))
                    .collect();
                compute(whole.as_str(), &groups)
            }
        };
        if new_value == whole.as_str() {
            continue;
        }
        let edit = Edit {
            start: whole.start(),
            end: whole.end(),
            new_text: new_value,
        };
        found.push((edit, whole.as_str().to_string()));
    }
    found
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassTransformOptions {
    pub dry_run: bool,
}

/// Rewrites one file in place (unless dry-run).
pub fn transform_classes(
    path: &Path,
    rules: &[ClassTransformRule],
    options: &ClassTransformOptions,
) -> Result<ClassRewrite> {
    let content = std::fs::read_to_string(path).map_err(|e| CodemodError::io(path, e))?;
    let Some(kind) = ClassFileKind::from_path(path) else {
        return Ok(ClassRewrite {
            content,
            changed: false,
            changes: Vec::new(),
        });
    };

    let rewrite = kind.rewrite(path, &content, rules);
    if rewrite.changed && !options.dry_run {
        std::fs::write(path, &rewrite.content).map_err(|e| CodemodError::io(path, e))?;
    }
    Ok(rewrite)
}

/// Totals for a class migration run.
#[derive(Debug, Default, Serialize)]
pub struct ClassRunSummary {
    pub changed_files: Vec<PathBuf>,
    pub all_changes: Vec<ClassChange>,
}

impl ClassRunSummary {
    pub fn files_changed(&self) -> usize {
        self.changed_files.len()
    }

    pub fn total_changes(&self) -> usize {
        self.all_changes.len()
    }

    pub fn changes_for<'a>(&'a self, file: &'a Path) -> impl Iterator<Item = &'a ClassChange> {
        self.all_changes.iter().filter(move |c| c.file == file)
    }
}

const IGNORED_DIRS: &[&str] = &["node_modules", "dist", "build"];

fn is_ignored(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str().to_str().is_some_and(|s| IGNORED_DIRS.contains(&s)))
}

/// Expands one glob pattern into supported files. Matched directories are
/// walked recursively.
fn class_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| CodemodError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "skipping unreadable glob entry");
                continue;
            }
        };
        if path.is_dir() {
            for walked in WalkDir::new(&path)
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_ignored(Path::new(e.file_name())))
                .filter_map(|e| e.ok())
            {
                if walked.file_type().is_file() && ClassFileKind::from_path(walked.path()).is_some() {
                    files.push(walked.into_path());
                }
            }
        } else if ClassFileKind::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.retain(|f| !is_ignored(f));
    files.sort();
    files.dedup();
    Ok(files)
}

/// Runs the class rules over every file matched by `patterns`.
///
/// Failures on individual files are logged and skipped.
pub fn process_class_transforms(
    patterns: &[String],
    rules: &[ClassTransformRule],
    options: &ClassTransformOptions,
) -> Result<ClassRunSummary> {
    let mut summary = ClassRunSummary::default();

    for pattern in patterns {
        for file in class_files(pattern)? {
            match transform_classes(&file, rules, options) {
                Ok(rewrite) if rewrite.changed => {
                    debug!(file = %file.display(), changes = rewrite.changes.len(), "rewrote classes");
                    summary.all_changes.extend(rewrite.changes);
                    summary.changed_files.push(file);
                }
                Ok(_) => {}
                Err(e) => warn!(file = %file.display(), error = %e, "failed to process file"),
            }
        }
    }

    Ok(summary)
}
