//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Human-readable check report display with colors
//! - Semantic version bump indication (major/minor/patch)
//! - Rewritten requirements per manifest file
//! - Error listing

use crate::cooldown::SemverBumpKind;
use crate::domain::{ManifestRequirement, Release};
use crate::output::{CheckReport, OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Width of the answer label column
const LABEL_WIDTH: usize = 20;

/// Get the display label with color
fn colored_label(kind: SemverBumpKind) -> String {
    match kind {
        SemverBumpKind::Major => "major".red().bold().to_string(),
        SemverBumpKind::Minor => "minor".yellow().to_string(),
        SemverBumpKind::Patch => "patch".green().to_string(),
        SemverBumpKind::Unknown => "?".dimmed().to_string(),
    }
}

/// Get the plain label
fn label(kind: SemverBumpKind) -> &'static str {
    match kind {
        SemverBumpKind::Major => "major",
        SemverBumpKind::Minor => "minor",
        SemverBumpKind::Patch => "patch",
        SemverBumpKind::Unknown => "?",
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn format_header(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let dependency = &report.dependency;
        let current = dependency
            .current_version
            .as_ref()
            .map(|v| format!(" {}", v))
            .unwrap_or_default();

        if self.color {
            writeln!(
                writer,
                "{}{} {}",
                dependency.name.bold(),
                current,
                format!("({})", dependency.ecosystem).dimmed()
            )
        } else {
            writeln!(writer, "{}{} ({})", dependency.name, current, dependency.ecosystem)
        }
    }

    /// Format one answer line, or `fallback` when there is no answer
    fn format_answer(
        &self,
        name: &str,
        release: Option<&Release>,
        fallback: &str,
        report: &CheckReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let name_display = format!("{:width$}", name, width = LABEL_WIDTH);
        let Some(release) = release else {
            return if self.color {
                writeln!(writer, "  {} {}", name_display, fallback.dimmed())
            } else {
                writeln!(writer, "  {} {}", name_display, fallback)
            };
        };

        let new_version = release.version.to_string();
        let date_display = release
            .released_at
            .map(|d| format!(" ({})", d.format("%Y/%m/%d %H:%M")))
            .unwrap_or_default();

        let Some(current) = report
            .dependency
            .current_version
            .as_ref()
            .filter(|current| **current != release.version)
        else {
            let suffix = if report.dependency.current_version.is_some() {
                " (up to date)"
            } else {
                ""
            };
            return writeln!(writer, "  {} {}{}{}", name_display, new_version, suffix, date_display);
        };

        let kind = report.bump_kind(release);
        if self.color {
            writeln!(
                writer,
                "  {} {} {} {} [{}]{}",
                name_display,
                current.to_string().dimmed(),
                "->".dimmed(),
                new_version.bright_white().bold(),
                colored_label(kind),
                date_display.dimmed()
            )
        } else {
            writeln!(
                writer,
                "  {} {} -> {} [{}]{}",
                name_display,
                current,
                new_version,
                label(kind),
                date_display
            )
        }
    }

    fn format_requirement(
        &self,
        before: &ManifestRequirement,
        after: &ManifestRequirement,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let reference = |m: &ManifestRequirement| {
            m.source
                .as_ref()
                .and_then(|s| s.reference.clone())
                .map(|r| format!(" @ {}", r))
                .unwrap_or_default()
        };
        let from = format!("{}{}", before.requirement, reference(before));
        let to = format!("{}{}", after.requirement, reference(after));

        if self.color {
            writeln!(
                writer,
                "  {} {} {} {}",
                before.file.dimmed(),
                from.dimmed(),
                "->".dimmed(),
                to.bright_white().bold()
            )
        } else {
            writeln!(writer, "  {} {} -> {}", before.file, from, to)
        }
    }

    fn format_errors(&self, errors: &[String], writer: &mut dyn Write) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}:", "Errors".red().bold())?;
        } else {
            writeln!(writer, "Errors:")?;
        }
        for error in errors {
            if self.color {
                writeln!(writer, "  {} {}", "✗".red(), error)?;
            } else {
                writeln!(writer, "  - {}", error)?;
            }
        }
        Ok(())
    }

    /// One line: the name and the newest version, if it is an update
    fn format_quiet(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        match report.latest.as_ref().filter(|_| report.has_update()) {
            Some(latest) if self.color => writeln!(
                writer,
                "{} {}",
                report.dependency.name,
                latest.version.to_string().green()
            ),
            Some(latest) => writeln!(writer, "{} {}", report.dependency.name, latest.version),
            None => Ok(()),
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return self.format_quiet(report, writer);
        }

        self.format_header(report, writer)?;
        self.format_answer("latest", report.latest.as_ref(), "none", report, writer)?;
        self.format_answer(
            "latest (no unlock)",
            report.latest_no_unlock.as_ref(),
            "none",
            report,
            writer,
        )?;
        let no_fix = if report.vulnerable {
            "no fix available"
        } else {
            "not vulnerable"
        };
        self.format_answer(
            "security fix",
            report.security_fix.as_ref(),
            no_fix,
            report,
            writer,
        )?;

        if self.verbosity == Verbosity::Verbose {
            writeln!(
                writer,
                "  {:width$} {}",
                "releases considered",
                report.releases_considered,
                width = LABEL_WIDTH
            )?;
        }

        let changed: Vec<_> = report.changed_requirements().collect();
        if !changed.is_empty() {
            writeln!(writer)?;
            if self.color {
                writeln!(writer, "{}:", "Requirements".bold())?;
            } else {
                writeln!(writer, "Requirements:")?;
            }
            for (before, after) in changed {
                self.format_requirement(before, after, writer)?;
            }
        }

        if report.has_errors() {
            writeln!(writer)?;
            self.format_errors(&report.errors, writer)?;
        }

        Ok(())
    }
}
