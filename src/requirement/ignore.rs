//! Ignore rules derived from update types
//!
//! `version-update:semver-patch` on a dependency at `1.1.0` ignores
//! `> 1.1.0, < 1.2`; `semver-minor` ignores `>= 1.2.a, < 2`; `semver-major`
//! ignores `>= 2.a`. The floor spelling follows the dialect so prereleases of
//! the next minor or major fall inside the range.

use super::{Comparator, Operator, Requirement, RequirementDialect};
use crate::error::{ConfigError, RequirementError};
use crate::version::{Collation, Version};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A class of updates a dependency should not receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum UpdateType {
    Major,
    Minor,
    Patch,
}

impl FromStr for UpdateType {
    type Err = ConfigError;

    /// Accepts `version-update:semver-minor`, `semver-minor` or `minor`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = s.trim();
        let kind = kind.strip_prefix("version-update:").unwrap_or(kind);
        let kind = kind.strip_prefix("semver-").unwrap_or(kind);
        match kind {
            "major" => Ok(UpdateType::Major),
            "minor" => Ok(UpdateType::Minor),
            "patch" => Ok(UpdateType::Patch),
            _ => Err(ConfigError::InvalidUpdateType {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for UpdateType {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            UpdateType::Major => "major",
            UpdateType::Minor => "minor",
            UpdateType::Patch => "patch",
        };
        write!(f, "version-update:semver-{kind}")
    }
}

impl Requirement {
    /// Range covering every update of `kind` away from `current`
    ///
    /// Returns `None` when `current` has no release numbers to count from.
    pub fn ignoring_update_type(
        kind: UpdateType,
        current: &Version,
        dialect: &'static RequirementDialect,
    ) -> Result<Option<Self>, RequirementError> {
        let mut release = current.release_segments();
        if release.is_empty() {
            return Ok(None);
        }
        release.resize(release.len().max(2), 0);
        let overflow = || RequirementError::malformed(current.as_str());
        let (major, minor) = (release[0], release[1]);
        let next_major = major.checked_add(1).ok_or_else(overflow)?;
        let next_minor = minor.checked_add(1).ok_or_else(overflow)?;

        let comparators = match kind {
            UpdateType::Patch => vec![
                Comparator::bound(Operator::Gt, current.clone()),
                Comparator::bound(Operator::Lt, release_version(&[major, next_minor], dialect)?),
            ],
            UpdateType::Minor => vec![
                Comparator::bound(Operator::Gte, floor_version(&[major, next_minor], dialect)?),
                Comparator::bound(Operator::Lt, release_version(&[next_major], dialect)?),
            ],
            UpdateType::Major => vec![Comparator::bound(
                Operator::Gte,
                floor_version(&[next_major], dialect)?,
            )],
        };

        let raw = comparators
            .iter()
            .map(|c| format!("{} {}", symbol(c.operator), c.version_text))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Some(Self {
            raw,
            clauses: vec![comparators],
            dialect,
        }))
    }
}

impl Comparator {
    fn bound(operator: Operator, version: Version) -> Self {
        Comparator {
            operator,
            precision: version.release_segments().len(),
            version_text: version.as_str().to_string(),
            version,
            upper: None,
            prefix_match: false,
            wildcard_suffix: String::new(),
        }
    }
}

fn symbol(operator: Operator) -> &'static str {
    match operator {
        Operator::Gt => ">",
        Operator::Gte => ">=",
        Operator::Lt => "<",
        _ => "=",
    }
}

fn join(release: &[u64]) -> String {
    release
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// First spelling the dialect accepts; some dialects need two segments
fn first_valid(
    candidates: &[String],
    dialect: &'static RequirementDialect,
) -> Result<Version, RequirementError> {
    candidates
        .iter()
        .find_map(|text| Version::parse(text, dialect.version).ok())
        .ok_or_else(|| RequirementError::malformed(candidates.join(" | ")))
}

fn release_version(
    release: &[u64],
    dialect: &'static RequirementDialect,
) -> Result<Version, RequirementError> {
    let text = join(release);
    first_valid(&[text.clone(), format!("{text}.0")], dialect)
}

/// Lowest version of `release`, prereleases included
fn floor_version(
    release: &[u64],
    dialect: &'static RequirementDialect,
) -> Result<Version, RequirementError> {
    let text = join(release);
    let floor = match dialect.version.collation {
        Collation::Semver => {
            let mut padded = release.to_vec();
            padded.resize(release.len().max(3), 0);
            format!("{}-0", join(&padded))
        }
        Collation::Maven => format!("{text}-alpha"),
        Collation::Segments => format!("{text}.a"),
    };
    first_valid(&[floor, text.clone(), format!("{text}.0")], dialect)
}
