//! Requirement model
//!
//! This module provides:
//! - Requirement: OR'd clauses of AND'd comparators parsed from one dialect
//! - Comparator: one operator and version, with range sugar resolved at parse time
//! - Requirement dialect tables for every supported ecosystem
//! - Requirement rewriting toward a chosen target version
//! - Ignore ranges derived from update types

mod dialect;
mod ignore;
mod parse;
mod updater;

pub use dialect::{
    AndSeparator, BareVersion, RequirementDialect, UpperRule, CARGO, COMPOSER, CONDA, ELM,
    GEMSPEC, HEX, MAVEN_RANGE, NPM, NUGET_RANGE, PEP508, PINNED, TERRAFORM, TOOLCHAIN_PIN,
};
pub use ignore::UpdateType;

use crate::error::RequirementError;
use crate::version::Version;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Canonical comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gte,
    Gt,
    Lte,
    Lt,
    Tilde,
    Caret,
    NotEq,
    ArbitraryEq,
}

/// Input accepted by `Requirement::parse`
#[derive(Debug, Clone)]
pub enum RequirementInput {
    /// Requirement text in the dialect's syntax
    Raw(String),
    /// An exact pin on an already parsed version
    Exact(Version),
}

impl From<&str> for RequirementInput {
    fn from(raw: &str) -> Self {
        RequirementInput::Raw(raw.to_string())
    }
}

impl From<String> for RequirementInput {
    fn from(raw: String) -> Self {
        RequirementInput::Raw(raw)
    }
}

impl From<Version> for RequirementInput {
    fn from(version: Version) -> Self {
        RequirementInput::Exact(version)
    }
}

/// One operator applied to one version
#[derive(Debug, Clone, PartialEq)]
pub struct Comparator {
    operator: Operator,
    version: Version,
    /// Exclusive bound compared on release segments only
    upper: Option<Version>,
    /// Lower bound compared on release segments only (wildcards)
    prefix_match: bool,
    /// Version text exactly as written, including prefix and wildcard suffix
    version_text: String,
    /// Number of release segments written
    precision: usize,
    wildcard_suffix: String,
}

impl Comparator {
    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Exclusive upper bound derived from caret, tilde or wildcard sugar
    pub fn upper_bound(&self) -> Option<&Version> {
        self.upper.as_ref()
    }

    /// The version as it appeared in the requirement text
    pub fn version_text(&self) -> &str {
        &self.version_text
    }

    /// Check a single version against this comparator
    pub fn matches(&self, v: &Version) -> bool {
        match self.operator {
            Operator::Eq => self.matches_exact(v),
            Operator::NotEq => !self.matches_exact(v),
            Operator::ArbitraryEq => v.as_str().eq_ignore_ascii_case(self.version.as_str()),
            Operator::Gte => v.cmp_public(&self.version) != Ordering::Less,
            Operator::Gt => v.cmp_public(&self.version) == Ordering::Greater,
            Operator::Lte => v.cmp_public(&self.version) != Ordering::Greater,
            Operator::Lt => v.cmp_public(&self.version) == Ordering::Less,
            Operator::Tilde | Operator::Caret => self.in_range(v),
        }
    }

    fn in_range(&self, v: &Version) -> bool {
        let lower = if self.prefix_match {
            v.cmp_release(&self.version)
        } else {
            v.cmp_public(&self.version)
        };
        let below_upper = self
            .upper
            .as_ref()
            .is_none_or(|upper| v.cmp_release(upper) == Ordering::Less);
        lower != Ordering::Less && below_upper
    }

    fn matches_exact(&self, v: &Version) -> bool {
        if self.upper.is_some() {
            return self.in_range(v);
        }
        if v.cmp_public(&self.version) != Ordering::Equal {
            return false;
        }
        match self.version.local_qualifier() {
            Some(local) => v.local_qualifier() == Some(local),
            None => true,
        }
    }
}

/// A parsed requirement expression
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    raw: String,
    clauses: Vec<Vec<Comparator>>,
    dialect: &'static RequirementDialect,
}

impl Requirement {
    /// Parse requirement text, or wrap an exact version, in the given dialect
    pub fn parse(
        input: impl Into<RequirementInput>,
        dialect: &'static RequirementDialect,
    ) -> Result<Self, RequirementError> {
        match input.into() {
            RequirementInput::Raw(raw) => parse::parse(&raw, dialect, false),
            RequirementInput::Exact(version) => Ok(Self::exact(version, dialect)),
        }
    }

    /// Parse a user ignore rule; commas always separate comparators here
    pub fn parse_ignore_rule(
        raw: &str,
        dialect: &'static RequirementDialect,
    ) -> Result<Self, RequirementError> {
        parse::parse(raw, dialect, true)
    }

    /// A requirement every version satisfies
    pub fn unconstrained(dialect: &'static RequirementDialect) -> Self {
        Self {
            raw: String::new(),
            clauses: vec![Vec::new()],
            dialect,
        }
    }

    fn exact(version: Version, dialect: &'static RequirementDialect) -> Self {
        let comparator = Comparator {
            operator: Operator::Eq,
            precision: version.release_segments().len(),
            version_text: version.as_str().to_string(),
            version,
            upper: None,
            prefix_match: false,
            wildcard_suffix: String::new(),
        };
        Self {
            raw: comparator.version_text.clone(),
            clauses: vec![vec![comparator]],
            dialect,
        }
    }

    /// True iff any clause has all of its comparators satisfied
    pub fn satisfied_by(&self, version: &Version) -> bool {
        self.clauses
            .iter()
            .any(|clause| clause.iter().all(|c| c.matches(version)))
    }

    pub fn clauses(&self) -> &[Vec<Comparator>] {
        &self.clauses
    }

    /// All comparators across clauses
    pub fn comparators(&self) -> impl Iterator<Item = &Comparator> {
        self.clauses.iter().flatten()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn dialect(&self) -> &'static RequirementDialect {
        self.dialect
    }

    /// True when some clause has no comparators
    pub fn is_unconstrained(&self) -> bool {
        self.clauses.iter().any(Vec::is_empty)
    }

    /// True when a comparator names a version containing letters
    pub fn wants_prereleases(&self) -> bool {
        self.comparators().any(|c| c.version.has_identifiers())
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Requirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{PEP440, SEMVER};
    use rstest::rstest;

    fn v(s: &str) -> Version {
        Version::parse(s, &SEMVER).unwrap()
    }

    #[rstest]
    #[case("^1.2.3", "1.2.3", true)]
    #[case("^1.2.3", "1.9.9", true)]
    #[case("^1.2.3", "1.2.2", false)]
    #[case("^1.2.3", "2.0.0", false)]
    #[case("^1.2.3", "2.0.0-rc.1", false)]
    #[case("^0.2.3", "0.2.9", true)]
    #[case("^0.2.3", "0.3.0", false)]
    #[case("^0.2.3", "0.1.9", false)]
    #[case("^0.0.3", "0.0.3", true)]
    #[case("^0.0.3", "0.0.4", false)]
    #[case("~1.5", "1.5.9", true)]
    #[case("~1.5", "1.6.0", false)]
    #[case("~1.2.3", "1.2.9", true)]
    #[case("~1.2.3", "1.3.0", false)]
    #[case("1.1.x", "1.1.7", true)]
    #[case("1.1.x", "1.2.0", false)]
    #[case("1.2", "1.2.5", true)]
    #[case("*", "99.0.0", true)]
    #[case("", "0.0.1", true)]
    #[case("1.0 - 2.0", "2.0.0", true)]
    #[case("1.0 - 2.0", "2.0.1", false)]
    #[case(">=1.0.0 <2.0.0 || >=3.0.0", "3.1.0", true)]
    #[case(">=1.0.0 <2.0.0 || >=3.0.0", "2.5.0", false)]
    #[case(">= 1.0.0", "1.0.0", true)]
    #[case("=1.2.3", "1.2.3", true)]
    #[case("1.2.3", "1.2.4", false)]
    fn test_npm_satisfaction(#[case] req: &str, #[case] version: &str, #[case] expected: bool) {
        let requirement = Requirement::parse(req, &NPM).unwrap();
        assert_eq!(requirement.satisfied_by(&v(version)), expected, "{req} vs {version}");
    }

    #[rstest]
    #[case("~> 1.0.0", "1.0.5", true)]
    #[case("~> 1.0.0", "1.1.0", false)]
    #[case("~> 1.2", "1.9", true)]
    #[case("~> 1.2", "2.0", false)]
    #[case(">= 1.0, < 2", "1.5", true)]
    #[case(">= 1.0, < 2", "2.0", false)]
    #[case("!= 1.5", "1.5", false)]
    fn test_gem_satisfaction(#[case] req: &str, #[case] version: &str, #[case] expected: bool) {
        let requirement = Requirement::parse(req, &GEMSPEC).unwrap();
        let version = Version::parse(version, requirement.dialect().version).unwrap();
        assert_eq!(requirement.satisfied_by(&version), expected, "{req} vs {version}");
    }

    #[rstest]
    #[case("==1.1.*", "1.1.4", true)]
    #[case("==1.1.*", "1.2", false)]
    #[case("!=1.1.*", "1.1.4", false)]
    #[case("!=1.1.*", "1.2.0", true)]
    #[case("~=1.4.5", "1.4.9", true)]
    #[case("~=1.4.5", "1.5.0", false)]
    #[case("^1.2.3", "2.0.0a1", false)]
    #[case("==1.0", "1.0+local.7", true)]
    #[case("==1.0+local.7", "1.0+local.7", true)]
    #[case("==1.0+local.7", "1.0+local.8", false)]
    #[case("!=1.0+local.7", "1.0+local.8", true)]
    #[case(">=1.0", "1.0+local.1", true)]
    #[case("<=1.0", "1.0+local.1", true)]
    #[case("===1.0", "1.0", true)]
    #[case("===1.0", "1.0.0", false)]
    #[case(">=1.0, <2.0", "1.9", true)]
    fn test_pep440_satisfaction(#[case] req: &str, #[case] version: &str, #[case] expected: bool) {
        let requirement = Requirement::parse(req, &PEP508).unwrap();
        let version = Version::parse(version, &PEP440).unwrap();
        assert_eq!(requirement.satisfied_by(&version), expected, "{req} vs {version}");
    }

    #[test]
    fn test_exact_input() {
        let requirement = Requirement::parse(v("1.4.0"), &NPM).unwrap();
        assert_eq!(requirement.as_str(), "1.4.0");
        assert!(requirement.satisfied_by(&v("1.4.0")));
        assert!(!requirement.satisfied_by(&v("1.4.1")));
    }

    #[test]
    fn test_unconstrained() {
        let requirement = Requirement::unconstrained(&NPM);
        assert!(requirement.is_unconstrained());
        assert!(requirement.satisfied_by(&v("0.0.1")));
    }

    #[test]
    fn test_caret_upper_bound_is_exposed() {
        let requirement = Requirement::parse("^0.2.3", &NPM).unwrap();
        let comparator = requirement.comparators().next().unwrap();
        assert_eq!(comparator.operator(), Operator::Caret);
        assert_eq!(comparator.upper_bound().map(Version::as_str), Some("0.3.0"));
    }

    #[test]
    fn test_pep440_caret_upper_bound_has_floor() {
        let requirement = Requirement::parse("^1.2.3", &PEP508).unwrap();
        let comparator = requirement.comparators().next().unwrap();
        assert_eq!(comparator.upper_bound().map(Version::as_str), Some("2.0.0.a"));
    }

    #[test]
    fn test_wants_prereleases() {
        assert!(Requirement::parse("^1.0.0-beta.1", &NPM)
            .unwrap()
            .wants_prereleases());
        assert!(!Requirement::parse("1.x", &NPM).unwrap().wants_prereleases());
    }

    #[test]
    fn test_display_is_raw_text() {
        let requirement = Requirement::parse(">= 1.0, < 2", &GEMSPEC).unwrap();
        assert_eq!(requirement.to_string(), ">= 1.0, < 2");
    }
}
