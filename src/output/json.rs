//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of check reports
//! - Bump kinds relative to the current version for every answer

use crate::cooldown::SemverBumpKind;
use crate::domain::{EcosystemId, Release};
use crate::output::{CheckReport, OutputFormatter, Verbosity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbose output also lists requirements that did not change
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of a report
#[derive(Serialize)]
struct JsonOutput<'a> {
    dependency: &'a str,
    ecosystem: EcosystemId,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_version: Option<String>,
    latest: Option<JsonRelease>,
    latest_no_unlock: Option<JsonRelease>,
    security_fix: Option<JsonRelease>,
    vulnerable: bool,
    updated_requirements: Vec<JsonRequirement<'a>>,
    releases_considered: usize,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    errors: &'a [String],
}

/// JSON representation of a selected release
#[derive(Serialize)]
struct JsonRelease {
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    released_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    bump: SemverBumpKind,
}

/// JSON representation of one rewritten requirement
#[derive(Serialize)]
struct JsonRequirement<'a> {
    file: &'a str,
    from: String,
    to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
}

impl JsonFormatter {
    fn release(&self, report: &CheckReport, release: Option<&Release>) -> Option<JsonRelease> {
        release.map(|r| JsonRelease {
            version: r.version.to_string(),
            released_at: r.released_at,
            tag: r.tag.clone(),
            bump: report.bump_kind(r),
        })
    }

    fn requirements<'a>(&self, report: &'a CheckReport) -> Vec<JsonRequirement<'a>> {
        report
            .dependency
            .requirements
            .iter()
            .zip(report.updated_requirements.iter())
            .filter(|(before, after)| self.verbosity == Verbosity::Verbose || before != after)
            .map(|(before, after)| JsonRequirement {
                file: &after.file,
                from: before.requirement.to_string(),
                to: after.requirement.to_string(),
                reference: after.source.as_ref().and_then(|s| s.reference.as_deref()),
            })
            .collect()
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            dependency: &report.dependency.name,
            ecosystem: report.dependency.ecosystem,
            current_version: report.dependency.current_version.as_ref().map(|v| v.to_string()),
            latest: self.release(report, report.latest.as_ref()),
            latest_no_unlock: self.release(report, report.latest_no_unlock.as_ref()),
            security_fix: self.release(report, report.security_fix.as_ref()),
            vulnerable: report.vulnerable,
            updated_requirements: self.requirements(report),
            releases_considered: report.releases_considered,
            errors: &report.errors,
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
