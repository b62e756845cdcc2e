//! Version dialect tables
//!
//! A dialect describes how one family of ecosystems spells and orders
//! versions:
//! - Accepted syntax (a cheap regex check)
//! - Prerelease keywords, their synonyms and their rank against numbers
//! - Whether a hyphen opens a prerelease section
//! - How qualifiers after the release numbers are collated
//! - Build metadata and PEP 440 local versions
//! - Toolchain channel ordering

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// How text after a `+` is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalSuffix {
    /// Build metadata, accepted and ignored for ordering
    Ignore,
    /// Local version label, kept and compared after the public version
    Compare,
}

/// How everything after the release numbers is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collation {
    /// Qualifier tokens by dialect rank, padded with zero
    Segments,
    /// SemVer 2.0 prerelease precedence
    Semver,
    /// Maven nested item lists
    Maven,
}

/// Toolchain channel classes used to rank channel versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Floating `nightly`
    Nightly,
    /// Floating `beta`
    Beta,
    /// Any channel pinned to a date
    Dated,
    /// Floating `stable`
    Stable,
}

/// Syntax and ordering rules for one version dialect
pub struct VersionDialect {
    /// Dialect name, used in logs and debug output
    pub name: &'static str,
    pattern: &'static LazyLock<Regex>,
    pub(crate) collation: Collation,
    pub(crate) hyphen_prerelease: bool,
    pub(crate) case_insensitive: bool,
    pub(crate) synonyms: &'static [(&'static str, &'static str)],
    pub(crate) keywords: &'static [(&'static str, i8)],
    pub(crate) unknown_rank: i8,
    pub(crate) local: LocalSuffix,
    pub(crate) epochs: bool,
    pub(crate) implicit_post: bool,
    /// Channel classes from lowest to highest; empty when the dialect has no channels
    pub(crate) channel_order: &'static [ChannelKind],
    /// Marker appended to computed range upper bounds
    pub(crate) upper_floor: Option<&'static str>,
}

impl VersionDialect {
    /// Check whether text is spelled like a version of this dialect
    pub fn matches(&self, raw: &str) -> bool {
        self.pattern.is_match(raw)
    }

    /// Rank of an identifier token; zero means the token carries no ordering weight
    pub(crate) fn rank_of(&self, ident: &str) -> i8 {
        self.keywords
            .iter()
            .find(|(keyword, _)| *keyword == ident)
            .map(|(_, rank)| *rank)
            .unwrap_or(self.unknown_rank)
    }

    /// Normalized spelling of an identifier
    pub(crate) fn canonical<'a>(&self, ident: &'a str) -> &'a str {
        self.synonyms
            .iter()
            .find(|(from, _)| *from == ident)
            .map(|(_, to)| *to)
            .unwrap_or(ident)
    }

    /// Whether this dialect understands toolchain channels
    pub fn has_channels(&self) -> bool {
        !self.channel_order.is_empty()
    }

    /// Rank of a channel class, 0 for plain versions
    pub(crate) fn channel_rank(&self, kind: ChannelKind) -> u8 {
        self.channel_order
            .iter()
            .position(|k| *k == kind)
            .map(|i| i as u8 + 1)
            .unwrap_or(0)
    }
}

impl fmt::Debug for VersionDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionDialect")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for VersionDialect {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for VersionDialect {}

static SEMVER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[vV]?\d+(?:\.\d+)*(?:-[0-9A-Za-z][0-9A-Za-z.\-]*)?(?:\+[0-9A-Za-z][0-9A-Za-z.\-]*)?$")
        .unwrap()
});

static GEM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(?:\.[0-9a-zA-Z]+)*(?:-[0-9A-Za-z\-]+(?:\.[0-9A-Za-z\-]+)*)?$").unwrap()
});

static PEP440_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^v?(?:\d+!)?\d+(?:\.\d+)*",
        r"(?:[-_.]?(?:a|b|c|rc|alpha|beta|pre|preview)[-_.]?\d*)?",
        r"(?:-\d+|[-_.]?(?:post|rev|r)[-_.]?\d*)?",
        r"(?:[-_.]?dev[-_.]?\d*)?",
        r"(?:\+[a-z0-9]+(?:[-_.][a-z0-9]+)*)?$",
    ))
    .unwrap()
});

static MAVEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d[0-9A-Za-z]*(?:[.\-_][0-9A-Za-z]+)*$").unwrap());

static NUGET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[vV]?\d+(?:\.\d+){0,3}(?:-[0-9A-Za-z][0-9A-Za-z.\-]*)?(?:\+[0-9A-Za-z][0-9A-Za-z.\-]*)?$")
        .unwrap()
});

static TOOLCHAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:stable|beta|nightly)(?:-\d{4}-\d{2}-\d{2})?|\d+\.\d+(?:\.\d+)?)$").unwrap()
});

/// Semantic versioning with optional `v` prefix and ignored build metadata
pub static SEMVER: VersionDialect = VersionDialect {
    name: "semver",
    pattern: &SEMVER_PATTERN,
    collation: Collation::Semver,
    hyphen_prerelease: true,
    case_insensitive: false,
    synonyms: &[],
    keywords: &[],
    unknown_rank: -1,
    local: LocalSuffix::Ignore,
    epochs: false,
    implicit_post: false,
    channel_order: &[],
    upper_floor: None,
};

/// RubyGems-style versions where any letter marks a prerelease
pub static GEM: VersionDialect = VersionDialect {
    name: "gem",
    pattern: &GEM_PATTERN,
    collation: Collation::Segments,
    hyphen_prerelease: true,
    case_insensitive: false,
    synonyms: &[],
    keywords: &[],
    unknown_rank: -1,
    local: LocalSuffix::Ignore,
    epochs: false,
    implicit_post: false,
    channel_order: &[],
    upper_floor: None,
};

/// PEP 440 versions with epochs, post releases and local labels
pub static PEP440: VersionDialect = VersionDialect {
    name: "pep440",
    pattern: &PEP440_PATTERN,
    collation: Collation::Segments,
    hyphen_prerelease: false,
    case_insensitive: true,
    synonyms: &[
        ("alpha", "a"),
        ("beta", "b"),
        ("c", "rc"),
        ("pre", "rc"),
        ("preview", "rc"),
        ("rev", "post"),
        ("r", "post"),
    ],
    keywords: &[("dev", -4), ("a", -3), ("b", -2), ("rc", -1), ("post", 1)],
    unknown_rank: -1,
    local: LocalSuffix::Compare,
    epochs: true,
    implicit_post: true,
    channel_order: &[],
    upper_floor: Some("a"),
};

/// Maven versions; the keyword ranks only decide which qualifiers mark a prerelease
pub static MAVEN: VersionDialect = VersionDialect {
    name: "maven",
    pattern: &MAVEN_PATTERN,
    collation: Collation::Maven,
    hyphen_prerelease: false,
    case_insensitive: true,
    synonyms: &[
        ("a", "alpha"),
        ("b", "beta"),
        ("m", "milestone"),
        ("cr", "rc"),
    ],
    keywords: &[
        ("alpha", -5),
        ("beta", -4),
        ("milestone", -3),
        ("rc", -2),
        ("snapshot", -1),
        ("pr", -1),
        ("pre", -1),
        ("preview", -1),
        ("dev", -1),
        ("ea", -1),
        ("ga", 0),
        ("final", 0),
        ("release", 0),
        ("sp", 1),
    ],
    unknown_rank: 2,
    local: LocalSuffix::Ignore,
    epochs: false,
    implicit_post: false,
    channel_order: &[],
    upper_floor: None,
};

/// NuGet versions: up to four numbers, case-insensitive prerelease labels
pub static NUGET: VersionDialect = VersionDialect {
    name: "nuget",
    pattern: &NUGET_PATTERN,
    collation: Collation::Semver,
    hyphen_prerelease: true,
    case_insensitive: true,
    synonyms: &[],
    keywords: &[],
    unknown_rank: -1,
    local: LocalSuffix::Ignore,
    epochs: false,
    implicit_post: false,
    channel_order: &[],
    upper_floor: None,
};

/// Rust toolchain versions and channels
pub static TOOLCHAIN: VersionDialect = VersionDialect {
    name: "toolchain",
    pattern: &TOOLCHAIN_PATTERN,
    collation: Collation::Segments,
    hyphen_prerelease: false,
    case_insensitive: false,
    synonyms: &[],
    keywords: &[],
    unknown_rank: -1,
    local: LocalSuffix::Ignore,
    epochs: false,
    implicit_post: false,
    channel_order: &[
        ChannelKind::Nightly,
        ChannelKind::Beta,
        ChannelKind::Dated,
        ChannelKind::Stable,
    ],
    upper_floor: None,
};
