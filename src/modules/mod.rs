//! Built-in migrations, selectable with `migrate --module <name>`.

mod angular;
mod base;
mod mdx_docs;
mod react_router_utils;
mod react_table;
mod tailwind;

pub use angular::angular;
pub use base::base;
pub use mdx_docs::mdx_docs;
pub use react_router_utils::react_router_utils;
pub use react_table::react_table;
pub use tailwind::{TAILWIND_CLASS_RULES, TAILWIND_VARIABLE_RULES, tailwind_rules};

use crate::classes::ClassTransformRule;
use crate::error::{CodemodError, Result};
use crate::rules::MigrationRule;

/// Every module name accepted on the command line.
pub const MODULE_NAMES: [&str; 6] = [
    "@qui/angular",
    "@qui/base",
    "@qui/mdx-docs",
    "@qui/react-router-utils",
    "@qui/react-table",
    "@qui/tailwind-plugin",
];

/// What a module migrates.
#[derive(Debug, Clone)]
pub enum Migration {
    /// Import/identifier/JSX rules for `.ts`, `.tsx` and `.mdx` files.
    Imports(Vec<MigrationRule>),
    /// Class-name token rules for markup and stylesheets.
    Classes(Vec<ClassTransformRule>),
}

pub fn lookup(name: &str) -> Result<Migration> {
    match name {
        "@qui/angular" => Ok(Migration::Imports(angular())),
        "@qui/base" => Ok(Migration::Imports(base())),
        "@qui/mdx-docs" => Ok(Migration::Imports(mdx_docs())),
        "@qui/react-router-utils" => Ok(Migration::Imports(react_router_utils())),
        "@qui/react-table" => Ok(Migration::Imports(react_table())),
        "@qui/tailwind-plugin" => Ok(Migration::Classes(tailwind_rules())),
        other => Err(CodemodError::UnknownModule(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_module_resolves() {
        for name in MODULE_NAMES {
            assert!(lookup(name).is_ok(), "{name} should resolve");
        }
    }

    #[test]
    fn unknown_module_is_an_error() {
        assert!(matches!(
            lookup("@qui/nope"),
            Err(CodemodError::UnknownModule(name)) if name == "@qui/nope"
        ));
    }

    #[test]
    fn import_modules_use_their_own_source_package() {
        for name in MODULE_NAMES {
            if let Ok(Migration::Imports(rules)) = lookup(name) {
                assert!(!rules.is_empty());
                assert!(rules.iter().all(|r| r.source_package == name), "{name}");
            }
        }
    }
}
