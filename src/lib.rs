//! qui-codemod library for migrating component-library code.
//!
//! The library exposes the migration engine behind the `qui-codemod` binary.
//! A migration is a list of [`MigrationRule`]s (or, for stylesheets and
//! markup, [`ClassTransformRule`]s) applied in three phases:
//!
//! 1. **Walking**: resolve directory globs and collect `.ts`, `.tsx` and `.mdx` files
//! 2. **Transforming**: rewrite imports, rename identifiers and wrap JSX elements
//! 3. **Writing**: save changed files back unless running dry
//!
//! # Example
//!
//! ```no_run
//! use qui_codemod::modules;
//! use qui_codemod::walker::{LogMode, ProcessConfig, process_dirs};
//!
//! # async fn run() -> qui_codemod::Result<()> {
//! let rules = modules::mdx_docs();
//! let config = ProcessConfig {
//!     dir: "src/**".to_string(),
//!     dry_run: true,
//!     log_mode: LogMode::Info,
//! };
//! let stats = process_dirs(&rules, &config).await?;
//! println!("{}", stats.summary(config.dry_run));
//! # Ok(())
//! # }
//! ```

pub mod classes;
pub mod cli;
pub mod error;
pub mod exports;
pub mod imports;
pub mod license;
pub mod mdx;
pub mod modules;
pub mod rules;
pub mod syntax;
pub mod transform;
pub mod walker;

// Re-export commonly used types at crate root
pub use classes::{ClassTransformRule, process_class_transforms};
pub use error::{CodemodError, Result};
pub use rules::{MigrationRule, RuleEntry, create_entries};
pub use transform::{TransformOptions, transform_ts};
pub use walker::{ProcessConfig, RunStats, process_dirs};
