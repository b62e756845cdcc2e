//! Requirement dialect tables
//!
//! Each table lists the operators an ecosystem accepts, how clauses are
//! combined and which range sugar (hyphen, wildcard, bracket, Elm) applies.

use super::Operator;
use crate::version::{VersionDialect, GEM, MAVEN, NUGET, PEP440, SEMVER, TOOLCHAIN};
use std::fmt;

/// How comparators inside one clause are separated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AndSeparator {
    Whitespace,
    Comma,
    CommaOrWhitespace,
    Keyword(&'static str),
}

/// Meaning of a version written without an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BareVersion {
    /// Exact match
    Exact,
    /// Caret range (Cargo)
    Caret,
    /// Minimum version (NuGet)
    Minimum,
    /// Exact when fully specified, a prefix range otherwise (npm `1.2`)
    PartialWildcard,
}

/// How an operator derives its exclusive upper bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpperRule {
    None,
    /// Increment the first non-zero release segment
    Caret,
    /// Drop the last segment, then increment the new last one
    Pessimistic,
    /// Pad to three segments, then apply `Pessimistic`
    PaddedPessimistic,
}

/// Syntax rules for one requirement dialect
pub struct RequirementDialect {
    pub name: &'static str,
    /// Dialect used for every version inside the requirement
    pub version: &'static VersionDialect,
    pub(crate) or_separators: &'static [&'static str],
    pub(crate) and_separator: AndSeparator,
    pub(crate) operators: &'static [(&'static str, Operator, UpperRule)],
    pub(crate) bare: BareVersion,
    pub(crate) hyphen_ranges: bool,
    pub(crate) wildcards: bool,
    pub(crate) brackets: bool,
    pub(crate) elm_ranges: bool,
}

impl RequirementDialect {
    /// Look up an operator by its exact spelling
    pub(crate) fn operator(&self, text: &str) -> Option<(Operator, UpperRule)> {
        self.operators
            .iter()
            .find(|(spelling, _, _)| *spelling == text)
            .map(|(_, op, rule)| (*op, *rule))
    }
}

impl fmt::Debug for RequirementDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequirementDialect")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for RequirementDialect {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for RequirementDialect {}

const ORDERING: [(&str, Operator, UpperRule); 4] = [
    (">=", Operator::Gte, UpperRule::None),
    ("<=", Operator::Lte, UpperRule::None),
    (">", Operator::Gt, UpperRule::None),
    ("<", Operator::Lt, UpperRule::None),
];

/// npm and bun ranges
pub static NPM: RequirementDialect = RequirementDialect {
    name: "npm",
    version: &SEMVER,
    or_separators: &["||"],
    and_separator: AndSeparator::Whitespace,
    operators: &[
        ("^", Operator::Caret, UpperRule::Caret),
        ("~>", Operator::Tilde, UpperRule::PaddedPessimistic),
        ("~", Operator::Tilde, UpperRule::PaddedPessimistic),
        ORDERING[0],
        ORDERING[1],
        ORDERING[2],
        ORDERING[3],
        ("=", Operator::Eq, UpperRule::None),
    ],
    bare: BareVersion::PartialWildcard,
    hyphen_ranges: true,
    wildcards: true,
    brackets: false,
    elm_ranges: false,
};

/// Cargo requirements, bare versions are caret ranges
pub static CARGO: RequirementDialect = RequirementDialect {
    name: "cargo",
    version: &SEMVER,
    or_separators: &[],
    and_separator: AndSeparator::Comma,
    operators: &[
        ("^", Operator::Caret, UpperRule::Caret),
        ("~", Operator::Tilde, UpperRule::PaddedPessimistic),
        ORDERING[0],
        ORDERING[1],
        ORDERING[2],
        ORDERING[3],
        ("=", Operator::Eq, UpperRule::None),
    ],
    bare: BareVersion::Caret,
    hyphen_ranges: false,
    wildcards: true,
    brackets: false,
    elm_ranges: false,
};

/// Composer constraints, `~` is pessimistic without padding
pub static COMPOSER: RequirementDialect = RequirementDialect {
    name: "composer",
    version: &SEMVER,
    or_separators: &["||", "|"],
    and_separator: AndSeparator::CommaOrWhitespace,
    operators: &[
        ("^", Operator::Caret, UpperRule::Caret),
        ("~", Operator::Tilde, UpperRule::Pessimistic),
        ORDERING[0],
        ORDERING[1],
        ORDERING[2],
        ORDERING[3],
        ("!=", Operator::NotEq, UpperRule::None),
        ("<>", Operator::NotEq, UpperRule::None),
        ("==", Operator::Eq, UpperRule::None),
        ("=", Operator::Eq, UpperRule::None),
    ],
    bare: BareVersion::Exact,
    hyphen_ranges: true,
    wildcards: true,
    brackets: false,
    elm_ranges: false,
};

/// RubyGems requirements (Bundler, Crystal shards)
pub static GEMSPEC: RequirementDialect = RequirementDialect {
    name: "gem",
    version: &GEM,
    or_separators: &[],
    and_separator: AndSeparator::Comma,
    operators: &[
        ("~>", Operator::Tilde, UpperRule::Pessimistic),
        ("!=", Operator::NotEq, UpperRule::None),
        ORDERING[0],
        ORDERING[1],
        ORDERING[2],
        ORDERING[3],
        ("=", Operator::Eq, UpperRule::None),
    ],
    bare: BareVersion::Exact,
    hyphen_ranges: false,
    wildcards: false,
    brackets: false,
    elm_ranges: false,
};

/// PEP 440 specifiers plus Poetry's caret and tilde
pub static PEP508: RequirementDialect = RequirementDialect {
    name: "pep440",
    version: &PEP440,
    or_separators: &["||"],
    and_separator: AndSeparator::Comma,
    operators: &[
        ("===", Operator::ArbitraryEq, UpperRule::None),
        ("==", Operator::Eq, UpperRule::None),
        ("!=", Operator::NotEq, UpperRule::None),
        ("~=", Operator::Tilde, UpperRule::Pessimistic),
        ("^", Operator::Caret, UpperRule::Caret),
        ("~", Operator::Tilde, UpperRule::PaddedPessimistic),
        ORDERING[0],
        ORDERING[1],
        ORDERING[2],
        ORDERING[3],
        ("=", Operator::Eq, UpperRule::None),
    ],
    bare: BareVersion::Exact,
    hyphen_ranges: false,
    wildcards: true,
    brackets: false,
    elm_ranges: false,
};

/// Conda match specs
pub static CONDA: RequirementDialect = RequirementDialect {
    name: "conda",
    version: &PEP440,
    or_separators: &["|"],
    and_separator: AndSeparator::Comma,
    operators: &[
        ("==", Operator::Eq, UpperRule::None),
        ("!=", Operator::NotEq, UpperRule::None),
        ("~=", Operator::Tilde, UpperRule::Pessimistic),
        ORDERING[0],
        ORDERING[1],
        ORDERING[2],
        ORDERING[3],
        ("=", Operator::Eq, UpperRule::None),
    ],
    bare: BareVersion::Exact,
    hyphen_ranges: false,
    wildcards: true,
    brackets: false,
    elm_ranges: false,
};

/// Elixir/Hex requirements with `and`/`or` keywords
pub static HEX: RequirementDialect = RequirementDialect {
    name: "hex",
    version: &SEMVER,
    or_separators: &[" or "],
    and_separator: AndSeparator::Keyword(" and "),
    operators: &[
        ("~>", Operator::Tilde, UpperRule::Pessimistic),
        ("==", Operator::Eq, UpperRule::None),
        ("!=", Operator::NotEq, UpperRule::None),
        ORDERING[0],
        ORDERING[1],
        ORDERING[2],
        ORDERING[3],
    ],
    bare: BareVersion::Exact,
    hyphen_ranges: false,
    wildcards: false,
    brackets: false,
    elm_ranges: false,
};

/// Terraform and OpenTofu version constraints
pub static TERRAFORM: RequirementDialect = RequirementDialect {
    name: "terraform",
    version: &SEMVER,
    or_separators: &[],
    and_separator: AndSeparator::Comma,
    operators: &[
        ("~>", Operator::Tilde, UpperRule::Pessimistic),
        ("!=", Operator::NotEq, UpperRule::None),
        ORDERING[0],
        ORDERING[1],
        ORDERING[2],
        ORDERING[3],
        ("=", Operator::Eq, UpperRule::None),
    ],
    bare: BareVersion::Exact,
    hyphen_ranges: false,
    wildcards: false,
    brackets: false,
    elm_ranges: false,
};

/// Elm constraints such as `1.0.0 <= v < 2.0.0`
pub static ELM: RequirementDialect = RequirementDialect {
    name: "elm",
    version: &SEMVER,
    or_separators: &[],
    and_separator: AndSeparator::Comma,
    operators: &[
        ORDERING[0],
        ORDERING[1],
        ORDERING[2],
        ORDERING[3],
        ("=", Operator::Eq, UpperRule::None),
    ],
    bare: BareVersion::Exact,
    hyphen_ranges: false,
    wildcards: false,
    brackets: false,
    elm_ranges: true,
};

/// Maven and Gradle, bracket ranges or soft pins
pub static MAVEN_RANGE: RequirementDialect = RequirementDialect {
    name: "maven",
    version: &MAVEN,
    or_separators: &[],
    and_separator: AndSeparator::Comma,
    operators: &[],
    bare: BareVersion::Exact,
    hyphen_ranges: false,
    wildcards: false,
    brackets: true,
    elm_ranges: false,
};

/// NuGet, bracket ranges and floating wildcards, bare versions are minimums
pub static NUGET_RANGE: RequirementDialect = RequirementDialect {
    name: "nuget",
    version: &NUGET,
    or_separators: &[],
    and_separator: AndSeparator::Comma,
    operators: &[],
    bare: BareVersion::Minimum,
    hyphen_ranges: false,
    wildcards: true,
    brackets: true,
    elm_ranges: false,
};

/// Exact pins with optional comparison operators (Go modules, Actions, pre-commit)
pub static PINNED: RequirementDialect = RequirementDialect {
    name: "pinned",
    version: &SEMVER,
    or_separators: &[],
    and_separator: AndSeparator::Comma,
    operators: &[
        ORDERING[0],
        ORDERING[1],
        ORDERING[2],
        ORDERING[3],
        ("=", Operator::Eq, UpperRule::None),
    ],
    bare: BareVersion::Exact,
    hyphen_ranges: false,
    wildcards: false,
    brackets: false,
    elm_ranges: false,
};

/// Rust toolchain channel pins
pub static TOOLCHAIN_PIN: RequirementDialect = RequirementDialect {
    name: "toolchain",
    version: &TOOLCHAIN,
    or_separators: &[],
    and_separator: AndSeparator::Comma,
    operators: &[
        ORDERING[0],
        ORDERING[1],
        ORDERING[2],
        ORDERING[3],
        ("=", Operator::Eq, UpperRule::None),
    ],
    bare: BareVersion::Exact,
    hyphen_ranges: false,
    wildcards: false,
    brackets: false,
    elm_ranges: false,
};
