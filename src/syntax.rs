//! Parsed TypeScript/TSX sources and span-based editing.
//!
//! Every transform works the same way: inspect the tree-sitter syntax tree,
//! produce a batch of [`Edit`]s with byte offsets into the current text, then
//! apply them in reverse offset order so earlier offsets stay valid. After a
//! batch the file is reparsed so the next pass sees fresh offsets.

use crate::error::{CodemodError, Result};
use std::path::{Path, PathBuf};
use tree_sitter::{Language, Node, Parser, Tree};

/// Which grammar a file is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    Tsx,
}

impl Dialect {
    /// `.tsx` files get the TSX grammar, everything else plain TypeScript.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tsx") | Some("jsx") => Dialect::Tsx,
            _ => Dialect::TypeScript,
        }
    }

    pub fn language(self) -> Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// A single text replacement with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

impl Edit {
    pub fn replace(node: Node<'_>, new_text: impl Into<String>) -> Self {
        Edit {
            start: node.start_byte(),
            end: node.end_byte(),
            new_text: new_text.into(),
        }
    }

    pub fn delete(start: usize, end: usize) -> Self {
        Edit {
            start,
            end,
            new_text: String::new(),
        }
    }
}

/// Applies edits to `content`, last offset first.
///
/// Out-of-range or inverted spans are skipped rather than panicking.
pub fn apply_edits_to(content: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut result = content.to_string();
    for edit in edits {
        if edit.start <= edit.end
            && edit.end <= result.len()
            && result.is_char_boundary(edit.start)
            && result.is_char_boundary(edit.end)
        {
            result.replace_range(edit.start..edit.end, &edit.new_text);
        }
    }
    result
}

/// A source file together with its current syntax tree.
pub struct SourceFile {
    path: PathBuf,
    dialect: Dialect,
    text: String,
    tree: Tree,
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

impl SourceFile {
    /// Parses `text`, failing if the tree contains any syntax error.
    pub fn parse(path: impl Into<PathBuf>, text: String) -> Result<Self> {
        let path = path.into();
        let dialect = Dialect::from_path(&path);
        let tree = parse_tree(&path, dialect, &text)?;

        if tree.root_node().has_error() {
            let message = match first_error(tree.root_node()) {
                Some(node) => {
                    let pos = node.start_position();
                    let what = if node.is_missing() {
                        format!("missing `{}`", node.kind())
                    } else {
                        "unexpected token".to_string()
                    };
                    format!("{} at {}:{}", what, pos.row + 1, pos.column + 1)
                }
                None => "syntax error".to_string(),
            };
            return Err(CodemodError::Parse { path, message });
        }

        Ok(SourceFile {
            path,
            dialect,
            text,
            tree,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`.
    pub fn node_text(&self, node: Node<'_>) -> &str {
        &self.text[node.byte_range()]
    }

    /// Every node whose kind is in `kinds`, in document order.
    pub fn nodes_of_kind(&self, kinds: &[&str]) -> Vec<Node<'_>> {
        let mut found = Vec::new();
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if kinds.contains(&node.kind()) {
                found.push(node);
            }
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return found;
                }
            }
        }
    }

    /// Applies a batch of edits and reparses. Returns whether the text changed.
    ///
    /// The reparse is lenient: a later pass that sees an error tree simply
    /// finds fewer nodes.
    pub fn apply_edits(&mut self, edits: Vec<Edit>) -> Result<bool> {
        if edits.is_empty() {
            return Ok(false);
        }
        let updated = apply_edits_to(&self.text, edits);
        if updated == self.text {
            return Ok(false);
        }
        self.tree = parse_tree(&self.path, self.dialect, &updated)?;
        self.text = updated;
        Ok(true)
    }
}

fn parse_tree(path: &Path, dialect: Dialect, text: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| CodemodError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    parser.parse(text, None).ok_or_else(|| CodemodError::Parse {
        path: path.to_path_buf(),
        message: "parser produced no tree".to_string(),
    })
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

/// Whether any ancestor of `node` has the given kind.
pub fn has_ancestor(node: Node<'_>, kind: &str) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == kind {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Leading whitespace of the line containing `offset`.
pub fn line_indent(text: &str, offset: usize) -> &str {
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let rest = &text[line_start..];
    let width = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    &rest[..width]
}

/// 1-indexed line number of `offset`.
pub fn line_of(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())].matches('\n').count() + 1
}

/// Span to delete when removing a whole statement.
///
/// Widens `start..end` to swallow the statement's indentation and its line
/// break, so no blank line is left behind.
pub fn statement_removal(text: &str, start: usize, end: usize) -> Edit {
    let indent = line_indent(text, start);
    let line_start = start - indent.len();
    let starts_line = text[line_start..start].trim().is_empty()
        && (line_start == 0 || text[..line_start].ends_with('\n'));

    let mut del_end = end;
    let trailing = &text[end..];
    let spaces = trailing.len() - trailing.trim_start_matches([' ', '\t']).len();
    if trailing[spaces..].starts_with("\r\n") {
        del_end = end + spaces + 2;
    } else if trailing[spaces..].starts_with('\n') {
        del_end = end + spaces + 1;
    }

    let del_start = if starts_line && del_end > end {
        line_start
    } else {
        start
    };
    Edit::delete(del_start, del_end)
}
