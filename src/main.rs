//! qui-codemod: migrate component-library code to the latest packages.
//!
//! Rewrites imports, identifiers, JSX and class names in place, analyzes a
//! legacy package's exports to seed new migrations, and keeps license
//! headers in shape.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect};
use qui_codemod::classes::{ClassTransformOptions, process_class_transforms};
use qui_codemod::cli::{Args, Commands, LicenseCommand};
use qui_codemod::exports::ExportAnalyzer;
use qui_codemod::license::{HeaderKind, LicenseChecker};
use qui_codemod::modules::{self, Migration};
use qui_codemod::rules::load_config;
use qui_codemod::walker::{LogMode, ProcessConfig, process_dirs};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let verbose = matches!(
        args.command,
        Commands::Migrate {
            log_mode: LogMode::Verbose,
            ..
        }
    );
    init_tracing(verbose);

    match args.command {
        Commands::Migrate {
            module,
            config,
            dir,
            log_mode,
            dry_run,
        } => cmd_migrate(module, config, dir, log_mode, dry_run).await,
        Commands::AnalyzeExports {
            dir,
            package_name,
            output,
        } => cmd_analyze_exports(&dir, package_name.as_deref(), &output),
        Commands::License { command } => match command {
            LicenseCommand::Lint { directory } => cmd_license_lint(&directory),
            LicenseCommand::Fix {
                directory,
                modified,
                license,
                interactive,
            } => {
                if interactive {
                    cmd_license_fix_interactive(&directory, modified, license)
                } else {
                    cmd_license_fix(&directory, modified, license)
                }
            }
        },
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose { "qui_codemod=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn cmd_migrate(
    module: Option<String>,
    config: Option<PathBuf>,
    dir: String,
    log_mode: LogMode,
    dry_run: bool,
) -> Result<()> {
    let migration = match (module, config) {
        (Some(name), _) => modules::lookup(&name)?,
        (None, Some(path)) => Migration::Imports(
            load_config(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
        ),
        (None, None) => anyhow::bail!("Either --module or --config is required"),
    };

    if dry_run {
        println!(
            "{} Running in dry-run mode (no files will be modified)...\n",
            "info:".blue().bold()
        );
    }

    match migration {
        Migration::Imports(rules) => {
            let config = ProcessConfig {
                dir,
                dry_run,
                log_mode,
            };
            let stats = process_dirs(&rules, &config)
                .await
                .context("Migration aborted")?;

            if log_mode == LogMode::Verbose {
                for file in &stats.processed {
                    println!("{} {}", "Processed:".dimmed(), file.display());
                }
            }
            for file in &stats.changed {
                println!("{}", file.display());
            }
            println!("{} {}", "ok:".green().bold(), stats.summary(dry_run));
        }
        Migration::Classes(rules) => {
            if !dry_run {
                println!("{} Migrating Tailwind classes...\n", "info:".blue().bold());
            }
            let patterns: Vec<String> = dir
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
            let summary = process_class_transforms(&patterns, &rules, &ClassTransformOptions { dry_run })?;

            if log_mode == LogMode::Verbose || dry_run {
                for file in &summary.changed_files {
                    println!("\n{} {}", "Processing".yellow().bold(), file.display());
                    for change in summary.changes_for(file) {
                        println!(
                            "  - Line {}: {} -> {}",
                            change.line,
                            change.old_class.red(),
                            change.new_class.green()
                        );
                    }
                }
            }

            println!("\n---");
            println!(
                "{} {} changes in {} file(s)",
                "ok:".green().bold(),
                summary.total_changes(),
                summary.files_changed()
            );
            if dry_run {
                println!("(dry-run, no files modified)");
            }
        }
    }

    Ok(())
}

fn cmd_analyze_exports(dir: &Path, package_name: Option<&str>, output: &Path) -> Result<()> {
    eprintln!("{} Scanning directory: {}", "info:".blue().bold(), dir.display());
    let analyzer = ExportAnalyzer::analyze_directory(dir)
        .with_context(|| format!("Failed to analyze {}", dir.display()))?;
    eprintln!(
        "{} Processed {} TypeScript files\n",
        "info:".blue().bold(),
        analyzer.files_processed()
    );

    match package_name {
        Some(package) => {
            let config = analyzer.create_migration_config(package);
            let json = serde_json::to_string_pretty(&config)?;
            std::fs::write(output, json)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "{} Wrote migration config to {}",
                "ok:".green().bold(),
                output.display()
            );
        }
        None => print!("{}", analyzer.report()),
    }

    Ok(())
}

fn license_checker() -> Result<LicenseChecker> {
    let root = std::env::current_dir().context("Failed to read current directory")?;
    let checker = LicenseChecker::new(&root)?;
    if checker.loaded_ignore_file() {
        eprintln!("{} Loaded .licenseignore patterns", "info:".blue().bold());
    }
    Ok(checker)
}

fn display_relative(directory: &Path, file: &Path) -> String {
    let cwd = std::env::current_dir().unwrap_or_default();
    let base = cwd.join(directory);
    match file.strip_prefix(&base) {
        Ok(rel) => format!("./{}", rel.display()),
        Err(_) => file.display().to_string(),
    }
}

fn cmd_license_lint(directory: &Path) -> Result<()> {
    let checker = license_checker()?;
    let started = Instant::now();
    let report = checker.lint(directory)?;
    let elapsed = started.elapsed();

    if report.is_clean() {
        println!(
            "{} Validated {} files in {}ms",
            "ok:".green().bold(),
            report.metrics.file_count,
            elapsed.as_millis()
        );
        return Ok(());
    }

    let failures: Vec<_> = report.failures().collect();
    eprintln!("{} {} file(s):\n", "✗".red().bold(), failures.len());
    for result in &failures {
        eprintln!("  {}", display_relative(directory, &result.file));
    }
    anyhow::bail!("{} file(s) failed the license check", failures.len())
}

fn cmd_license_fix(directory: &Path, modified: Option<String>, license: Option<String>) -> Result<()> {
    let kind = match (modified, license) {
        (Some(source_url), Some(source_license)) => HeaderKind::Modified {
            source_url,
            source_license,
        },
        (Some(_), None) => anyhow::bail!("--license is required when using --modified"),
        (None, _) => HeaderKind::Original,
    };

    let checker = license_checker()?;
    let modified = checker.fix(directory, &kind)?;
    for file in &modified {
        println!("{} {}", "Added header to:".green(), file.display());
    }
    println!("\nTotal files modified: {}", modified.len());
    Ok(())
}

fn validate_url(input: &String) -> Result<(), String> {
    let rest = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"));
    match rest {
        _ if input.is_empty() => Err("Source URL is required".to_string()),
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err("Invalid URL format".to_string()),
    }
}

fn cmd_license_fix_interactive(
    directory: &Path,
    modified: Option<String>,
    license: Option<String>,
) -> Result<()> {
    let theme = ColorfulTheme::default();
    let checker = license_checker()?;

    let invalid = checker.files_without_headers(directory)?;
    if invalid.is_empty() {
        println!("{} All files already have headers", "ok:".green().bold());
        return Ok(());
    }

    let labels: Vec<String> = invalid
        .iter()
        .map(|f| display_relative(directory, f))
        .collect();
    let selected = MultiSelect::with_theme(&theme)
        .with_prompt("Select files to add headers")
        .items(&labels)
        .interact()?;
    if selected.is_empty() {
        println!("{} Operation cancelled", "info:".blue().bold());
        return Ok(());
    }
    let files: Vec<PathBuf> = selected.into_iter().map(|i| invalid[i].clone()).collect();

    let is_modified = modified.is_some()
        || Confirm::with_theme(&theme)
            .with_prompt("Is this modified from another source?")
            .default(false)
            .interact()?;

    let kind = if is_modified {
        let mut url_prompt = Input::<String>::with_theme(&theme).with_prompt("Source URL");
        if let Some(url) = modified {
            url_prompt = url_prompt.with_initial_text(url);
        }
        let source_url = url_prompt.validate_with(validate_url).interact_text()?;

        let mut license_prompt = Input::<String>::with_theme(&theme).with_prompt("Source license");
        if let Some(license) = license {
            license_prompt = license_prompt.with_initial_text(license);
        }
        let source_license = license_prompt
            .validate_with(|value: &String| {
                if value.trim().is_empty() {
                    Err("License is required")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        HeaderKind::Modified {
            source_url,
            source_license,
        }
    } else {
        HeaderKind::Original
    };

    let modified = checker.fix_files(&files, &kind)?;
    println!("{} Modified {} file(s)", "ok:".green().bold(), modified.len());
    Ok(())
}
