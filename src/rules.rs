//! Declarative migration rules.
//!
//! A [`MigrationRule`] describes how imports from one package move to another:
//! which named imports move (optionally renamed), which disappear entirely,
//! which identifiers are renamed in the file body and which JSX elements gain
//! new parent elements. Rules sharing a source package form a [`RuleGroup`]
//! and are applied to a file one after another.
//!
//! Rules are usually authored in Rust (see [`crate::modules`]) but can also be
//! loaded from the JSON config emitted by `analyze-exports --package-name`.

use crate::error::{CodemodError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An entry in a rule's `imports` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportSpec {
    /// Move the import under its current name.
    Name(String),
    /// Move the import and rename it in the target package.
    Rename {
        name: String,
        #[serde(rename = "renameTo")]
        rename_to: String,
    },
}

impl ImportSpec {
    pub fn name(&self) -> &str {
        match self {
            ImportSpec::Name(name) => name,
            ImportSpec::Rename { name, .. } => name,
        }
    }

    pub fn rename_to(&self) -> Option<&str> {
        match self {
            ImportSpec::Name(_) => None,
            ImportSpec::Rename { rename_to, .. } => Some(rename_to),
        }
    }
}

/// Renames a bare identifier independently of the import clause, e.g. `QTr` to `Table.Row`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableTransformer {
    pub name: String,
    pub rename_to: String,
}

/// Wraps every `name` element with `wrap_with`, outermost wrapper first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsxWrapper {
    pub name: String,
    pub wrap_with: Vec<String>,
}

/// What the import rewriter does with a single named import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAction {
    Move,
    Keep,
    Remove,
}

/// A complete migration rule: one source package, one target package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationRule {
    pub source_package: String,
    pub target_package: String,
    /// Imports to move. Empty means every named import moves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ImportSpec>,
    /// Imports that no longer exist and are deleted outright.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports_to_remove: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variable_transformers: Vec<VariableTransformer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jsx_wrappers: Vec<JsxWrapper>,
}

impl MigrationRule {
    pub fn moves_all(&self) -> bool {
        self.imports.is_empty()
    }

    /// Classifies a named import. Removal takes precedence over moving.
    pub fn classify(&self, name: &str) -> ImportAction {
        if self.imports_to_remove.iter().any(|n| n == name) {
            ImportAction::Remove
        } else if self.moves_all() || self.imports.iter().any(|spec| spec.name() == name) {
            ImportAction::Move
        } else {
            ImportAction::Keep
        }
    }

    /// The configured rename target for `name`, if any.
    pub fn rename_for(&self, name: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|spec| spec.name() == name)
            .and_then(ImportSpec::rename_to)
    }

    fn validate(&self) -> Result<()> {
        if self.source_package.trim().is_empty() {
            return Err(CodemodError::Config(
                "rule is missing a source package".to_string(),
            ));
        }
        if self.target_package.trim().is_empty() {
            return Err(CodemodError::Config(format!(
                "rule for '{}' is missing a target package",
                self.source_package
            )));
        }
        Ok(())
    }
}

/// A rule without its source package, as authored in modules and config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEntry {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ImportSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports_to_remove: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jsx_wrappers: Vec<JsxWrapper>,
    pub target_package: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variable_transformers: Vec<VariableTransformer>,
}

impl RuleEntry {
    pub fn new(target_package: &str) -> Self {
        RuleEntry {
            target_package: target_package.to_string(),
            ..Default::default()
        }
    }

    pub fn imports<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports
            .extend(names.into_iter().map(|n| ImportSpec::Name(n.into())));
        self
    }

    pub fn rename(mut self, name: &str, rename_to: &str) -> Self {
        self.imports.push(ImportSpec::Rename {
            name: name.to_string(),
            rename_to: rename_to.to_string(),
        });
        self
    }

    pub fn remove<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports_to_remove
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn rename_variable(mut self, name: &str, rename_to: &str) -> Self {
        self.variable_transformers.push(VariableTransformer {
            name: name.to_string(),
            rename_to: rename_to.to_string(),
        });
        self
    }

    pub fn wrap_jsx(mut self, name: &str, wrap_with: &[&str]) -> Self {
        self.jsx_wrappers.push(JsxWrapper {
            name: name.to_string(),
            wrap_with: wrap_with.iter().map(|w| w.to_string()).collect(),
        });
        self
    }

    fn into_rule(self, source_package: &str) -> MigrationRule {
        MigrationRule {
            source_package: source_package.to_string(),
            target_package: self.target_package,
            imports: self.imports,
            imports_to_remove: self.imports_to_remove,
            variable_transformers: self.variable_transformers,
            jsx_wrappers: self.jsx_wrappers,
        }
    }
}

/// Attaches `source_package` to every entry.
pub fn create_entries(source_package: &str, entries: Vec<RuleEntry>) -> Vec<MigrationRule> {
    entries
        .into_iter()
        .map(|entry| entry.into_rule(source_package))
        .collect()
}

/// The on-disk config shape: `["<sourcePackage>", [entries...]]`.
pub type MigrationConfig = (String, Vec<RuleEntry>);

/// Parses a JSON migration config into validated rules.
pub fn parse_config(json: &str) -> Result<Vec<MigrationRule>> {
    let (source_package, entries): MigrationConfig =
        serde_json::from_str(json).map_err(|e| CodemodError::Config(e.to_string()))?;
    let rules = create_entries(&source_package, entries);
    if rules.is_empty() {
        return Err(CodemodError::Config(format!(
            "config for '{}' contains no rules",
            source_package
        )));
    }
    for rule in &rules {
        rule.validate()?;
    }
    Ok(rules)
}

/// Reads and parses a JSON migration config.
pub fn load_config(path: &Path) -> Result<Vec<MigrationRule>> {
    let json = std::fs::read_to_string(path).map_err(|e| CodemodError::io(path, e))?;
    parse_config(&json)
}

/// Rules sharing a source package, in authoring order.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    pub source_package: String,
    pub rules: Vec<MigrationRule>,
}

/// Groups rules by source package, keeping first-seen package order.
pub fn group_by_source(rules: &[MigrationRule]) -> Vec<RuleGroup> {
    let mut groups: Vec<RuleGroup> = Vec::new();
    for rule in rules {
        match groups
            .iter_mut()
            .find(|g| g.source_package == rule.source_package)
        {
            Some(group) => group.rules.push(rule.clone()),
            None => groups.push(RuleGroup {
                source_package: rule.source_package.clone(),
                rules: vec![rule.clone()],
            }),
        }
    }
    groups
}
