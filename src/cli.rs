//! Command-line interface definitions.
//!
//! Defines the argument parser and subcommands using clap's derive API:
//! running a migration, analyzing a legacy package's exports and managing
//! license headers.

use crate::modules::MODULE_NAMES;
use crate::walker::LogMode;
use clap::builder::PossibleValuesParser;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Migrate component-library imports, JSX and class names across a codebase.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run migrations for QUI packages.
    #[command(
        group(ArgGroup::new("rules").required(true).args(["module", "config"])),
        after_help = "\
Available modules:
  @qui/angular             Split imports across @qui/angular-core, @qui/core and @qui/utils
  @qui/base                Move base utilities to @qui/utils subpaths
  @qui/mdx-docs            Update imports to @qualcomm-ui/react-mdx subpaths
  @qui/react-router-utils  Update imports to @qualcomm-ui/react-router-utils
  @qui/react-table         Move table components to the Table namespace
  @qui/tailwind-plugin     Migrate Tailwind classes to QDS tokens (requires Tailwind v4)

Examples:
  qui-codemod migrate -m @qui/mdx-docs -d \"src/**\"
  qui-codemod migrate -m @qui/tailwind-plugin -d \"src/**\" --dry-run
  qui-codemod migrate --config migration-config.json -d \"src/**\""
    )]
    Migrate {
        /// Built-in migration to run.
        #[arg(short, long, value_parser = PossibleValuesParser::new(MODULE_NAMES))]
        module: Option<String>,

        /// JSON rule config, as written by `analyze-exports --package-name`.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directories to process. Comma-separated, supports globs.
        #[arg(short, long)]
        dir: String,

        #[arg(long, value_enum, default_value_t = LogMode::Info)]
        log_mode: LogMode,

        /// Preview changes without writing files.
        #[arg(long)]
        dry_run: bool,
    },

    /// Analyze the exports in a directory and print a report, or write a
    /// migration config when a package name is given.
    AnalyzeExports {
        /// Directory to analyze.
        #[arg(short, long)]
        dir: PathBuf,

        /// Package name used to generate the migration config.
        #[arg(short, long)]
        package_name: Option<String>,

        /// Where to write the generated config.
        #[arg(short, long, default_value = "migration-config.json")]
        output: PathBuf,
    },

    /// Manage copyright headers in source files.
    License {
        #[command(subcommand)]
        command: LicenseCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum LicenseCommand {
    /// Check for missing copyright headers.
    Lint {
        /// Directory to scan.
        #[arg(long, default_value = ".")]
        directory: PathBuf,
    },

    /// Add copyright headers to source files.
    Fix {
        /// Directory to scan.
        #[arg(long, default_value = ".")]
        directory: PathBuf,

        /// Source URL for files modified from another project.
        #[arg(long, value_name = "SOURCE_URL")]
        modified: Option<String>,

        /// License of the source project (e.g., "MIT License").
        #[arg(long)]
        license: Option<String>,

        /// Interactively select files.
        #[arg(short, long)]
        interactive: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("qui-codemod").chain(args.iter().copied()))
    }

    #[test]
    fn migrate_requires_module_or_config() {
        assert!(parse(&["migrate", "-d", "src"]).is_err());
        assert!(parse(&["migrate", "-m", "@qui/base", "--config", "c.json", "-d", "src"]).is_err());
    }

    #[test]
    fn migrate_rejects_unknown_modules() {
        assert!(parse(&["migrate", "-m", "@qui/nope", "-d", "src"]).is_err());
    }

    #[test]
    fn migrate_parses_module_options() {
        let args = parse(&[
            "migrate",
            "-m",
            "@qui/react-table",
            "-d",
            "src/**,docs",
            "--log-mode",
            "verbose",
            "--dry-run",
        ])
        .unwrap();
        match args.command {
            Commands::Migrate {
                module,
                config,
                dir,
                log_mode,
                dry_run,
            } => {
                assert_eq!(module.as_deref(), Some("@qui/react-table"));
                assert!(config.is_none());
                assert_eq!(dir, "src/**,docs");
                assert_eq!(log_mode, LogMode::Verbose);
                assert!(dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn analyze_exports_defaults_output() {
        let args = parse(&["analyze-exports", "-d", "legacy", "-p", "@qui/react"]).unwrap();
        match args.command {
            Commands::AnalyzeExports { output, package_name, .. } => {
                assert_eq!(output, PathBuf::from("migration-config.json"));
                assert_eq!(package_name.as_deref(), Some("@qui/react"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn license_fix_options() {
        let args = parse(&[
            "license",
            "fix",
            "--modified",
            "https://github.com/example/repo",
            "--license",
            "MIT License",
        ])
        .unwrap();
        match args.command {
            Commands::License {
                command:
                    LicenseCommand::Fix {
                        directory,
                        modified,
                        license,
                        interactive,
                    },
            } => {
                assert_eq!(directory, PathBuf::from("."));
                assert_eq!(modified.as_deref(), Some("https://github.com/example/repo"));
                assert_eq!(license.as_deref(), Some("MIT License"));
                assert!(!interactive);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
