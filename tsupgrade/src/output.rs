use crate::features::FeatureRule;
use crate::upgrade::{FileReport, ProjectReport};
use crate::utils::normalize_display_path;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Create a progress bar with file count.
///
/// In test mode, returns a hidden progress bar to avoid polluting test output.
#[must_use]
pub fn create_progress_bar(total_files: u64) -> ProgressBar {
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let pb =
        ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr_with_hz(20));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("upgrading...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.tick();
    pb
}

/// Print the main header with box-drawing characters.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write, dry_run: bool) -> std::io::Result<()> {
    let title = if dry_run {
        "║  TypeScript Upgrade Preview            ║"
    } else {
        "║  TypeScript Upgrade Results            ║"
    };
    writeln!(writer)?;
    writeln!(
        writer,
        "{}",
        "╔════════════════════════════════════════╗".cyan()
    )?;
    writeln!(writer, "{}", title.cyan().bold())?;
    writeln!(
        writer,
        "{}",
        "╚════════════════════════════════════════╝".cyan()
    )?;
    writeln!(writer)?;
    Ok(())
}

/// Helper to create a styled table
fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

/// Each rule gets its own color in edit listings.
fn rule_color(rule: FeatureRule) -> Color {
    match rule {
        FeatureRule::ConstAssertion => Color::Magenta,
        FeatureRule::OptionalChains => Color::Cyan,
        FeatureRule::NullishCoalesce => Color::Green,
        FeatureRule::ExportAsNamespace => Color::Yellow,
    }
}

/// Shorten multi-line snippets to their first line.
fn snippet(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    if lines.next().is_some() {
        format!("{first} …")
    } else {
        first.to_owned()
    }
}

/// Print the edits applied to one file.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_file_edits(writer: &mut impl Write, file: &FileReport) -> std::io::Result<()> {
    if file.edits.is_empty() {
        return Ok(());
    }

    writeln!(
        writer,
        "\n{}",
        normalize_display_path(&file.path).bold().underline()
    )?;

    let mut table = create_table(vec!["Rule", "Pass", "Line", "Before", "After"]);
    for edit in &file.edits {
        table.add_row(vec![
            Cell::new(edit.rule.id()).fg(rule_color(edit.rule)),
            Cell::new(edit.pass).add_attribute(Attribute::Dim),
            Cell::new(edit.line),
            Cell::new(snippet(&edit.before)).fg(Color::Red),
            Cell::new(snippet(&edit.after))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print files that could not be upgraded.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_failures(writer: &mut impl Write, report: &ProjectReport) -> std::io::Result<()> {
    let failed: Vec<&FileReport> = report.failed().collect();
    if failed.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", "Errors".bold().underline().red())?;

    let mut table = create_table(vec!["File", "Error"]);
    for file in failed {
        table.add_row(vec![
            Cell::new(normalize_display_path(&file.path)).add_attribute(Attribute::Bold),
            Cell::new(file.error.as_deref().unwrap_or_default()).fg(Color::Red),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print summary with colored "pills" and per-rule totals.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary(writer: &mut impl Write, report: &ProjectReport) -> std::io::Result<()> {
    fn pill(label: &str, count: usize, bad: bool) -> String {
        if count == 0 {
            format!("{}: {}", label, count.to_string().dimmed())
        } else if bad {
            format!("{}: {}", label, count.to_string().red().bold())
        } else {
            format!("{}: {}", label, count.to_string().green().bold())
        }
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{}  {}  {}  {}  {}",
        pill("Files", report.files.len(), false),
        pill("Changed", report.changed().count(), false),
        pill("Edits", report.total_edits(), false),
        pill("Failed", report.failed().count(), true),
        pill("Passes", report.passes, false),
    )?;

    let totals = report.rule_totals();
    if !totals.is_empty() {
        let mut table = create_table(vec!["Rule", "Edits"]);
        for (rule, count) in totals {
            table.add_row(vec![
                Cell::new(rule.id()).fg(rule_color(rule)),
                Cell::new(count).add_attribute(Attribute::Bold),
            ]);
        }
        writeln!(writer, "{table}")?;
    }
    Ok(())
}

/// Print the full project report.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
pub fn print_report(
    writer: &mut impl Write,
    report: &ProjectReport,
    dry_run: bool,
) -> std::io::Result<()> {
    print_header(writer, dry_run)?;

    if report.changed().next().is_none() && report.failed().next().is_none() {
        writeln!(writer, "{}", "[OK] Nothing to upgrade.".green())?;
    }
    for file in report.changed() {
        print_file_edits(writer, file)?;
    }
    print_failures(writer, report)?;
    print_summary(writer, report)?;
    Ok(())
}

/// Print the rule catalog.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
pub fn print_rules(writer: &mut impl Write) -> std::io::Result<()> {
    let mut table = create_table(vec!["Rule", "Since", "Rewrites"]);
    for rule in FeatureRule::ALL {
        table.add_row(vec![
            Cell::new(rule.id()).fg(rule_color(rule)),
            Cell::new(rule.since()).add_attribute(Attribute::Bold),
            Cell::new(rule.description()),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}
