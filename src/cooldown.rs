//! Cooldown policy
//!
//! This module provides:
//! - CooldownPolicy: how many days a release must age before it is offered
//! - CooldownPrecedence: how the day thresholds combine
//! - SemverBumpKind: classification of a version jump
//! - NamePattern: `*` globs scoping a policy to dependency names

use crate::domain::Release;
use crate::error::ConfigError;
use crate::version::Version;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;

/// Classification of the jump from the current version to a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SemverBumpKind {
    Major,
    Minor,
    Patch,
    /// No current version, or versions without release numbers
    Unknown,
}

impl SemverBumpKind {
    /// First release segment differs: major; second: minor; otherwise patch
    pub fn between(current: &Version, candidate: &Version) -> Self {
        let from = current.release_segments();
        let to = candidate.release_segments();
        if from.is_empty() || to.is_empty() {
            return SemverBumpKind::Unknown;
        }
        let at = |segments: &[u64], i: usize| segments.get(i).copied().unwrap_or(0);

        if at(&from, 0) != at(&to, 0) {
            SemverBumpKind::Major
        } else if at(&from, 1) != at(&to, 1) {
            SemverBumpKind::Minor
        } else {
            SemverBumpKind::Patch
        }
    }
}

impl fmt::Display for SemverBumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SemverBumpKind::Major => "major",
            SemverBumpKind::Minor => "minor",
            SemverBumpKind::Patch => "patch",
            SemverBumpKind::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// A dependency name glob where `*` matches any run of characters
#[derive(Debug, Clone)]
pub struct NamePattern {
    raw: String,
    regex: Regex,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("(?i)^{body}$")).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<'de> Deserialize<'de> for NamePattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NamePattern::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// How day thresholds combine when more than one is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CooldownPrecedence {
    /// `default_days` when positive, otherwise the threshold for the bump kind
    #[default]
    FirstPositive,
    /// The largest configured threshold regardless of bump kind
    MaxOfAll,
}

/// Time-based withholding of fresh releases
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CooldownPolicy {
    pub default_days: u32,
    pub semver_major_days: u32,
    pub semver_minor_days: u32,
    pub semver_patch_days: u32,
    /// When set, only matching dependency names are subject to cooldown
    pub include: Option<Vec<NamePattern>>,
    /// Matching dependency names are never subject to cooldown
    pub exclude: Option<Vec<NamePattern>>,
    pub precedence: CooldownPrecedence,
}

impl CooldownPolicy {
    /// A policy with one threshold for every bump kind
    pub fn days(default_days: u32) -> Self {
        Self {
            default_days,
            ..Self::default()
        }
    }

    /// Set per-bump thresholds
    pub fn with_semver_days(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.semver_major_days = major;
        self.semver_minor_days = minor;
        self.semver_patch_days = patch;
        self
    }

    /// Set name patterns the policy is limited to
    pub fn with_include(mut self, patterns: Vec<NamePattern>) -> Self {
        self.include = Some(patterns);
        self
    }

    /// Set name patterns exempt from the policy
    pub fn with_exclude(mut self, patterns: Vec<NamePattern>) -> Self {
        self.exclude = Some(patterns);
        self
    }

    /// Set how thresholds combine
    pub fn with_precedence(mut self, precedence: CooldownPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Whether any threshold is configured
    pub fn is_enabled(&self) -> bool {
        self.default_days > 0
            || self.semver_major_days > 0
            || self.semver_minor_days > 0
            || self.semver_patch_days > 0
    }

    /// Days a release of the given bump kind must age
    pub fn days_for(&self, bump_kind: SemverBumpKind) -> u32 {
        match self.precedence {
            CooldownPrecedence::FirstPositive => {
                if self.default_days > 0 {
                    return self.default_days;
                }
                match bump_kind {
                    SemverBumpKind::Major => self.semver_major_days,
                    SemverBumpKind::Minor => self.semver_minor_days,
                    SemverBumpKind::Patch => self.semver_patch_days,
                    SemverBumpKind::Unknown => self.default_days,
                }
            }
            CooldownPrecedence::MaxOfAll => self
                .default_days
                .max(self.semver_major_days)
                .max(self.semver_minor_days)
                .max(self.semver_patch_days),
        }
    }

    /// Whether the named dependency is subject to this policy
    pub fn applies_to(&self, name: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.is_empty() && !include.iter().any(|p| p.matches(name)) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.iter().any(|p| p.matches(name)) {
                return false;
            }
        }
        true
    }

    /// Whether `release` is still too fresh to offer
    pub fn in_cooldown(
        &self,
        name: &str,
        release: &Release,
        bump_kind: SemverBumpKind,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(released_at) = release.released_at else {
            return false;
        };
        if !self.applies_to(name) {
            return false;
        }
        let days = self.days_for(bump_kind);
        if days == 0 {
            return false;
        }
        now - released_at < Duration::seconds(i64::from(days) * SECONDS_PER_DAY)
    }
}
