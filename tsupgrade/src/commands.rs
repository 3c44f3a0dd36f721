use crate::assume::assume_file_version;
use crate::features::FeatureRule;
use crate::upgrade::Upgrader;
use crate::utils::normalize_display_path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// How the results of an upgrade run are used.
#[derive(Debug, Clone, Copy, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunMode {
    /// Print JSON instead of tables.
    pub json: bool,
    /// Do not write files.
    pub dry_run: bool,
    /// Do not write files; exit 1 when something would change.
    pub check: bool,
    /// Show a progress bar.
    pub progress: bool,
}

impl RunMode {
    fn writes(self) -> bool {
        !self.dry_run && !self.check
    }
}

/// Upgrades every file under `paths`. Returns the process exit code.
///
/// # Errors
///
/// Returns an error if a path does not exist, or writing a file or the
/// output fails.
pub fn run_upgrade<W: Write>(
    paths: &[PathBuf],
    upgrader: Upgrader,
    mode: RunMode,
    writer: &mut W,
) -> Result<i32> {
    let files = upgrader.collect_files(paths)?;
    let upgrader = if mode.progress && !mode.json {
        let bar = std::sync::Arc::new(crate::output::create_progress_bar(files.len() as u64));
        upgrader.with_progress_bar(bar)
    } else {
        upgrader
    };

    let report = upgrader.upgrade_files(&files);
    if let Some(bar) = &upgrader.progress_bar {
        bar.finish_and_clear();
    }

    if mode.writes() {
        for file in report.changed() {
            file.write()
                .with_context(|| format!("failed to write {}", file.path.display()))?;
        }
    }

    if mode.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        crate::output::print_report(writer, &report, !mode.writes())?;
    }

    let would_change = report.changed().next().is_some();
    let failed = report.failed().next().is_some();
    Ok(i32::from(failed || (mode.check && would_change)))
}

/// Upgrades a single source read from `input` and writes it to `writer`.
///
/// # Errors
///
/// Returns an error if reading the input fails or the source cannot be upgraded.
pub fn run_stdin<R: Read, W: Write>(
    upgrader: &Upgrader,
    check: bool,
    mut input: R,
    writer: &mut W,
) -> Result<i32> {
    let mut source = String::new();
    input
        .read_to_string(&mut source)
        .context("failed to read stdin")?;
    let upgraded = upgrader.upgrade_source(&source)?;
    write!(writer, "{upgraded}")?;
    Ok(i32::from(check && upgraded != source))
}

#[derive(Serialize)]
struct AssumeResult {
    file: String,
    version: String,
}

/// Prints the minimum TypeScript version `file` already needs.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or writing fails.
pub fn run_assume<W: Write>(file: &Path, json: bool, writer: &mut W) -> Result<i32> {
    let source =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let version = assume_file_version(file, &source)
        .with_context(|| format!("failed to parse {}", file.display()))?;

    if json {
        let result = AssumeResult {
            file: normalize_display_path(file),
            version: version.to_string(),
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        writeln!(
            writer,
            "{} {}",
            normalize_display_path(file).bold(),
            version.to_string().cyan()
        )?;
    }
    Ok(0)
}

#[derive(Serialize)]
struct RuleInfo {
    id: &'static str,
    since: String,
    description: &'static str,
}

/// Lists the rule catalog.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn run_rules<W: Write>(json: bool, writer: &mut W) -> Result<i32> {
    if json {
        let rules: Vec<RuleInfo> = FeatureRule::ALL
            .iter()
            .map(|rule| RuleInfo {
                id: rule.id(),
                since: rule.since().to_string(),
                description: rule.description(),
            })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&rules)?)?;
    } else {
        crate::output::print_rules(writer)?;
    }
    Ok(0)
}
