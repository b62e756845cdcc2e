//! Canonical version model
//!
//! This module provides:
//! - Version: one comparable value for every ecosystem, parameterized by a dialect
//! - VersionToken: numeric or identifier segment with a dialect rank
//! - ChannelTag: toolchain channels such as `stable` or `nightly-2024-01-15`
//!
//! Ordering is total: epoch, then release numbers padded with zero, then the
//! qualifiers in the dialect's collation, then the local qualifier, then the
//! channel rank. Equality and hashing use the same key.

mod dialect;
mod maven;

pub use dialect::{
    ChannelKind, Collation, LocalSuffix, VersionDialect, GEM, MAVEN, NUGET, PEP440, SEMVER,
    TOOLCHAIN,
};

use crate::error::VersionError;
use chrono::NaiveDate;
use regex::Regex;
use semver::Prerelease;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// `1.0-1` spelled as an implicit post release
static IMPLICIT_POST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)*)-(\d+)$").unwrap());

/// Hidden marker placed between the release and a hyphenated prerelease
const PRERELEASE_MARKER: &str = "pre";

/// One segment of a version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionToken {
    /// Numeric segment
    Number(u64),
    /// Identifier segment with its dialect rank (negative sorts below numbers)
    Identifier { text: String, rank: i8 },
}

impl VersionToken {
    fn rank(&self) -> i8 {
        match self {
            VersionToken::Number(_) => 0,
            VersionToken::Identifier { rank, .. } => *rank,
        }
    }

    /// Numeric value, if this is a number
    pub fn as_number(&self) -> Option<u64> {
        match self {
            VersionToken::Number(n) => Some(*n),
            VersionToken::Identifier { .. } => None,
        }
    }
}

impl Ord for VersionToken {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| match (self, other) {
                (VersionToken::Number(a), VersionToken::Number(b)) => a.cmp(b),
                (
                    VersionToken::Identifier { text: a, .. },
                    VersionToken::Identifier { text: b, .. },
                ) => a.cmp(b),
                (VersionToken::Number(_), VersionToken::Identifier { .. }) => Ordering::Greater,
                (VersionToken::Identifier { .. }, VersionToken::Number(_)) => Ordering::Less,
            })
    }
}

impl PartialOrd for VersionToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

const ZERO: VersionToken = VersionToken::Number(0);

/// Toolchain release channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Nightly,
    Beta,
    Stable,
}

impl Channel {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "nightly" => Some(Channel::Nightly),
            "beta" => Some(Channel::Beta),
            "stable" => Some(Channel::Stable),
            _ => None,
        }
    }
}

/// A toolchain channel, optionally pinned to a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelTag {
    pub channel: Channel,
    pub date: Option<NaiveDate>,
}

impl ChannelTag {
    /// Class used for ranking
    pub fn kind(&self) -> ChannelKind {
        match (self.date, self.channel) {
            (Some(_), _) => ChannelKind::Dated,
            (None, Channel::Nightly) => ChannelKind::Nightly,
            (None, Channel::Beta) => ChannelKind::Beta,
            (None, Channel::Stable) => ChannelKind::Stable,
        }
    }
}

/// What orders the qualifiers of a version
#[derive(Debug, Clone)]
enum QualifierKey {
    /// Tokens after the release numbers
    Tokens,
    /// Parsed SemVer prerelease, `None` for a release
    Prerelease(Option<Prerelease>),
    /// Maven items, release numbers included
    Items(Vec<maven::Item>),
}

/// A parsed version
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    segments: Vec<VersionToken>,
    release: Vec<u64>,
    key: QualifierKey,
    prerelease: bool,
    local_qualifier: Option<Box<Version>>,
    channel: Option<ChannelTag>,
    epoch: u64,
    dialect: &'static VersionDialect,
}

impl Version {
    /// Parse a version string in the given dialect
    pub fn parse(raw: &str, dialect: &'static VersionDialect) -> Result<Self, VersionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !dialect.matches(trimmed) {
            return Err(VersionError::malformed(raw));
        }

        if dialect.has_channels() && trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Self::parse_channel(trimmed, dialect);
        }

        let mut body = strip_v_prefix(trimmed).to_string();
        if dialect.case_insensitive {
            body = body.to_ascii_lowercase();
        }

        let mut epoch = 0;
        if dialect.epochs {
            if let Some((e, rest)) = body.split_once('!') {
                epoch = e.parse().map_err(|_| VersionError::malformed(raw))?;
                body = rest.to_string();
            }
        }

        let mut local_qualifier = None;
        if let Some((public, local)) = body.split_once('+') {
            if dialect.local == LocalSuffix::Compare {
                local_qualifier = Some(Box::new(Self::parse_local(local, dialect)?));
            }
            body = public.to_string();
        }

        if dialect.implicit_post {
            if let Some(caps) = IMPLICIT_POST.captures(&body) {
                body = format!("{}.post{}", &caps[1], &caps[2]);
            }
        }

        let hyphenated = if dialect.hyphen_prerelease {
            body.split_once('-')
        } else {
            None
        };
        let segments = match hyphenated {
            Some((release, pre)) => {
                let mut tokens = tokenize(release, dialect, raw)?;
                tokens.push(VersionToken::Identifier {
                    text: PRERELEASE_MARKER.to_string(),
                    rank: dialect.unknown_rank,
                });
                tokens.extend(tokenize(pre, dialect, raw)?);
                tokens
            }
            None => tokenize(&body, dialect, raw)?,
        };

        if segments.is_empty() {
            return Err(VersionError::malformed(raw));
        }

        let (release, key) = match dialect.collation {
            Collation::Segments => (leading_numbers(&segments), QualifierKey::Tokens),
            Collation::Semver => {
                let pre = hyphenated
                    .map(|(_, pre)| Prerelease::new(pre))
                    .transpose()
                    .map_err(|_| VersionError::malformed(raw))?;
                (leading_numbers(&segments), QualifierKey::Prerelease(pre))
            }
            Collation::Maven => {
                let items = maven::parse(&body).ok_or_else(|| VersionError::malformed(raw))?;
                (maven_release(&body), QualifierKey::Items(items))
            }
        };

        let prerelease = segments.iter().any(|t| t.rank() < 0);

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
            release,
            key,
            prerelease,
            local_qualifier,
            channel: None,
            epoch,
            dialect,
        })
    }

    /// Cheap validity check used to discard garbage before parsing
    pub fn is_correct(raw: &str, dialect: &'static VersionDialect) -> bool {
        let trimmed = raw.trim();
        !trimmed.is_empty() && dialect.matches(trimmed)
    }

    fn parse_channel(trimmed: &str, dialect: &'static VersionDialect) -> Result<Self, VersionError> {
        let (name, date) = match trimmed.split_once('-') {
            Some((name, date)) => (name, Some(date)),
            None => (trimmed, None),
        };
        let channel = Channel::parse(name).ok_or_else(|| VersionError::malformed(trimmed))?;
        let date = date
            .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            .transpose()
            .map_err(|_| VersionError::malformed(trimmed))?;

        let segments = match date {
            Some(d) => {
                use chrono::Datelike;
                vec![
                    VersionToken::Number(d.year() as u64),
                    VersionToken::Number(d.month() as u64),
                    VersionToken::Number(d.day() as u64),
                ]
            }
            None => Vec::new(),
        };

        Ok(Self {
            raw: trimmed.to_string(),
            release: leading_numbers(&segments),
            segments,
            key: QualifierKey::Tokens,
            prerelease: false,
            local_qualifier: None,
            channel: Some(ChannelTag { channel, date }),
            epoch: 0,
            dialect,
        })
    }

    /// Local labels compare numbers above strings, segment by segment
    fn parse_local(local: &str, dialect: &'static VersionDialect) -> Result<Self, VersionError> {
        let segments = local
            .split(['.', '-', '_'])
            .map(|part| match part.parse::<u64>() {
                Ok(n) => VersionToken::Number(n),
                Err(_) => VersionToken::Identifier {
                    text: part.to_string(),
                    rank: -1,
                },
            })
            .collect::<Vec<_>>();
        Ok(Self {
            raw: local.to_string(),
            release: leading_numbers(&segments),
            segments,
            key: QualifierKey::Tokens,
            prerelease: false,
            local_qualifier: None,
            channel: None,
            epoch: 0,
            dialect,
        })
    }

    /// The original text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// All segments, release numbers first
    pub fn segments(&self) -> &[VersionToken] {
        &self.segments
    }

    /// The numeric release segments
    pub fn release_segments(&self) -> Vec<u64> {
        self.release.clone()
    }

    /// Whether anything follows the numeric release segments
    pub fn has_qualifiers(&self) -> bool {
        self.segments.len() > self.release.len() || self.local_qualifier.is_some()
    }

    /// Whether any segment is an identifier
    pub fn has_identifiers(&self) -> bool {
        self.segments
            .iter()
            .any(|t| matches!(t, VersionToken::Identifier { .. }))
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease
    }

    pub fn local_qualifier(&self) -> Option<&Version> {
        self.local_qualifier.as_deref()
    }

    pub fn channel(&self) -> Option<&ChannelTag> {
        self.channel.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn dialect(&self) -> &'static VersionDialect {
        self.dialect
    }

    /// Compare epoch and release numbers only
    pub fn cmp_release(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_numbers(&self.release, &other.release))
    }

    /// Compare everything except the local qualifier
    pub fn cmp_public(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.cmp_body(other))
            .then_with(|| self.channel_key().cmp(&other.channel_key()))
    }

    fn cmp_body(&self, other: &Self) -> Ordering {
        match (&self.key, &other.key) {
            (QualifierKey::Items(a), QualifierKey::Items(b)) => maven::compare_lists(a, b),
            (QualifierKey::Prerelease(a), QualifierKey::Prerelease(b)) => {
                compare_numbers(&self.release, &other.release).then_with(|| match (a, b) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(a), Some(b)) => a.cmp(b),
                })
            }
            _ => compare_numbers(&self.release, &other.release)
                .then_with(|| compare_padded(self.tail(), other.tail())),
        }
    }

    /// Tokens after the leading release numbers
    fn tail(&self) -> &[VersionToken] {
        let start = self.release.len().min(self.segments.len());
        &self.segments[start..]
    }

    fn channel_key(&self) -> (u8, Option<Channel>) {
        match &self.channel {
            Some(tag) => (self.dialect.channel_rank(tag.kind()), Some(tag.channel)),
            None => (0, None),
        }
    }
}

fn strip_v_prefix(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some('v' | 'V'), Some(c)) if c.is_ascii_digit() => &text[1..],
        _ => text,
    }
}

/// Split on separators and at digit/letter boundaries
fn tokenize(
    text: &str,
    dialect: &'static VersionDialect,
    raw: &str,
) -> Result<Vec<VersionToken>, VersionError> {
    let mut tokens = Vec::new();
    for part in text.split(['.', '-', '_']).filter(|p| !p.is_empty()) {
        let mut rest = part;
        while !rest.is_empty() {
            let numeric = rest.starts_with(|c: char| c.is_ascii_digit());
            let end = rest
                .find(|c: char| c.is_ascii_digit() != numeric)
                .unwrap_or(rest.len());
            let (run, tail) = rest.split_at(end);
            rest = tail;

            if numeric {
                let n = run.parse().map_err(|_| VersionError::malformed(raw))?;
                tokens.push(VersionToken::Number(n));
            } else {
                let text = dialect.canonical(run);
                let rank = dialect.rank_of(text);
                if rank != 0 {
                    tokens.push(VersionToken::Identifier {
                        text: text.to_string(),
                        rank,
                    });
                }
            }
        }
    }
    Ok(tokens)
}

fn leading_numbers(segments: &[VersionToken]) -> Vec<u64> {
    segments.iter().map_while(VersionToken::as_number).collect()
}

/// Dotted numbers before the first qualifier or hyphen
fn maven_release(body: &str) -> Vec<u64> {
    let end = body
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(body.len());
    body[..end]
        .split('.')
        .map_while(|part| part.parse().ok())
        .collect()
}

fn compare_numbers(a: &[u64], b: &[u64]) -> Ordering {
    (0..a.len().max(b.len()))
        .map(|i| a.get(i).unwrap_or(&0).cmp(b.get(i).unwrap_or(&0)))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn trim_zeros<T: PartialEq>(items: &[T], zero: &T) -> usize {
    items.iter().rposition(|t| t != zero).map_or(0, |i| i + 1)
}

fn compare_padded(a: &[VersionToken], b: &[VersionToken]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).unwrap_or(&ZERO);
            let y = b.get(i).unwrap_or(&ZERO);
            x.cmp(y)
        })
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.cmp_body(other))
            .then_with(|| self.local_qualifier.cmp(&other.local_qualifier))
            .then_with(|| self.channel_key().cmp(&other.channel_key()))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.epoch.hash(state);
        match &self.key {
            QualifierKey::Items(items) => items.hash(state),
            QualifierKey::Prerelease(pre) => {
                self.release[..trim_zeros(&self.release, &0)].hash(state);
                pre.hash(state);
            }
            QualifierKey::Tokens => {
                self.release[..trim_zeros(&self.release, &0)].hash(state);
                let tail = self.tail();
                tail[..trim_zeros(tail, &ZERO)].hash(state);
            }
        }
        self.local_qualifier.hash(state);
        self.channel_key().hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    fn semver(s: &str) -> Version {
        Version::parse(s, &SEMVER).unwrap()
    }

    fn pep(s: &str) -> Version {
        Version::parse(s, &PEP440).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let v = semver("1.2.3");
        assert_eq!(v.release_segments(), vec![1, 2, 3]);
        assert!(!v.is_prerelease());
        assert!(!v.has_qualifiers());
    }

    #[test]
    fn test_display_round_trips_raw_text() {
        for raw in ["1.0.1-rc1", "v2.0.0", "1.0.0+build.7", "4"] {
            assert_eq!(semver(raw).to_string(), raw);
        }
        assert_eq!(pep("1.0.Alpha1").to_string(), "1.0.Alpha1");
    }

    #[test]
    fn test_v_prefix_is_cosmetic() {
        assert_eq!(semver("v1.2.3"), semver("1.2.3"));
        assert_eq!(semver("v1.2.3").as_str(), "v1.2.3");
    }

    #[test]
    fn test_trailing_zeros_are_equal() {
        assert_eq!(semver("1.0"), semver("1.0.0"));
        let mut set = HashSet::new();
        set.insert(semver("1.0"));
        assert!(set.contains(&semver("1.0.0")));
    }

    #[test]
    fn test_semver_prerelease_ordering() {
        let ordered = [
            "1.0.0-alpha",
            "1.0.0-alpha.0",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
            "1.0.1-rc1",
        ];
        for pair in ordered.windows(2) {
            assert!(semver(pair[0]) < semver(pair[1]), "{} < {}", pair[0], pair[1]);
        }
        assert!(semver("1.0.1-rc1").is_prerelease());
    }

    #[test]
    fn test_semver_prerelease_identifiers_are_strict() {
        assert!(Version::parse("1.0.0-rc.01", &SEMVER).is_err());
        assert!(Version::parse("1.0.0-rc..1", &SEMVER).is_err());
        assert_eq!(semver("1.0-rc.1"), semver("1.0.0-rc.1"));
    }

    #[test]
    fn test_nuget_prerelease_ordering() {
        let nuget = |s: &str| Version::parse(s, &NUGET).unwrap();
        assert!(nuget("1.0.0-Alpha.1") < nuget("1.0.0-alpha.beta"));
        assert_eq!(nuget("1.0.0-RC.1"), nuget("1.0.0-rc.1"));
        assert!(nuget("1.0.0.1") > nuget("1.0.0"));
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(semver("1.0.0+build.1"), semver("1.0.0+build.2"));
        assert!(semver("1.0.0+build.1").local_qualifier().is_none());
    }

    #[test]
    fn test_gem_floor_sorts_below_prereleases() {
        let floor = Version::parse("1.1.0.a", &GEM).unwrap();
        let rc = Version::parse("1.1.0-rc1", &GEM).unwrap();
        let release = Version::parse("1.1.0", &GEM).unwrap();
        assert!(floor < rc);
        assert!(rc < release);
        assert!(floor.is_prerelease());
    }

    #[test]
    fn test_pep440_ordering() {
        let ordered = [
            "1.0.dev0", "1.0a1", "1.0b2", "1.0rc1", "1.0", "1.0+local.1", "1.0.post1", "1.1",
        ];
        for pair in ordered.windows(2) {
            assert!(pep(pair[0]) < pep(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_pep440_synonyms() {
        assert_eq!(pep("1.0alpha1"), pep("1.0a1"));
        assert_eq!(pep("1.0-preview2"), pep("1.0rc2"));
        assert_eq!(pep("1.0-1"), pep("1.0.post1"));
        assert_eq!(pep("1.0a"), pep("1.0a0"));
    }

    #[test]
    fn test_release_padding_stops_at_qualifiers() {
        assert_eq!(pep("1.0.0a1"), pep("1.0a1"));
        assert_eq!(pep("1.0.0.post1"), pep("1.0.post1"));
        assert!(pep("1.0.0.dev1") < pep("1.0a1"));
        let gem = |s: &str| Version::parse(s, &GEM).unwrap();
        assert_eq!(gem("1.0.0.a"), gem("1.0.a"));
        assert_eq!(gem("1.0.0-rc1"), gem("1.0-rc1"));

        let mut set = HashSet::new();
        set.insert(pep("1.0a1"));
        set.insert(pep("1.0.post1"));
        assert!(set.contains(&pep("1.0.0a1")));
        assert!(set.contains(&pep("1.0.0.post1")));
    }

    #[test]
    fn test_pep440_epoch() {
        assert!(pep("1!0.1") > pep("2.0"));
        assert_eq!(pep("1!0.1").epoch(), 1);
    }

    #[test]
    fn test_pep440_local_qualifier() {
        let v = pep("1.0+ubuntu.2");
        assert_eq!(v.local_qualifier().map(|l| l.as_str()), Some("ubuntu.2"));
        assert!(pep("1.0") < v);
        assert!(pep("1.0+ubuntu.2") < pep("1.0+ubuntu.10"));
        assert_eq!(v.cmp_public(&pep("1.0")), Ordering::Equal);
    }

    #[rstest]
    #[case("1", "1.1", Ordering::Less)]
    #[case("1-snapshot", "1", Ordering::Less)]
    #[case("1", "1-sp", Ordering::Less)]
    #[case("1-foo2", "1-foo10", Ordering::Less)]
    #[case("1.foo", "1-foo", Ordering::Less)]
    #[case("1-foo", "1-1", Ordering::Less)]
    #[case("1-1", "1.1", Ordering::Less)]
    #[case("1.ga", "1-ga", Ordering::Equal)]
    #[case("1-ga", "1-0", Ordering::Equal)]
    #[case("1-0", "1.0", Ordering::Equal)]
    #[case("1.0", "1", Ordering::Equal)]
    #[case("1.0.FINAL", "1", Ordering::Equal)]
    #[case("1.something", "1.SOMETHING", Ordering::Equal)]
    #[case("1-sp", "1-ga", Ordering::Greater)]
    #[case("1-sp.1", "1-ga.1", Ordering::Greater)]
    #[case("1-sp-1", "1-ga-1", Ordering::Less)]
    #[case("1-ga-1", "1-1", Ordering::Equal)]
    #[case("1-a1", "1-alpha-1", Ordering::Equal)]
    #[case("1.0.0", "1.0.0u1", Ordering::Less)]
    #[case("1.0.0", "1.0.0a1", Ordering::Greater)]
    #[case("1.0-sp1", "1.0.1", Ordering::Less)]
    #[case("31.1-jre", "31.1.1-jre", Ordering::Less)]
    #[case("31.1.1-jre", "32.0-android", Ordering::Less)]
    fn test_maven_ordering(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        let maven = |s: &str| Version::parse(s, &MAVEN).unwrap();
        assert_eq!(maven(a).cmp(&maven(b)), expected, "{a} vs {b}");
        assert_eq!(maven(a) == maven(b), expected == Ordering::Equal);
    }

    #[test]
    fn test_maven_equal_versions_hash_alike() {
        let maven = |s: &str| Version::parse(s, &MAVEN).unwrap();
        let mut set = HashSet::new();
        set.insert(maven("1-ga-1"));
        set.insert(maven("1.0.FINAL"));
        assert!(set.contains(&maven("1-1")));
        assert!(set.contains(&maven("1")));
    }

    #[test]
    fn test_maven_release_segments() {
        let maven = |s: &str| Version::parse(s, &MAVEN).unwrap();
        assert_eq!(maven("31.1-jre").release_segments(), vec![31, 1]);
        assert_eq!(maven("1.0.0a1").release_segments(), vec![1, 0, 0]);
        assert_eq!(maven("2.10.0.pr3").release_segments(), vec![2, 10, 0]);
        assert!(maven("2.10.0.pr3").is_prerelease());
        assert!(maven("1.2.1-dev-65").is_prerelease());
        assert!(!maven("1.0.0.sp7").is_prerelease());
        assert!(!maven("1.0.0alligator").is_prerelease());
    }

    #[test]
    fn test_maven_qualifiers() {
        let maven = |s: &str| Version::parse(s, &MAVEN).unwrap();
        assert!(maven("1.0-alpha-1") < maven("1.0-beta"));
        assert!(maven("1.0-M1") < maven("1.0-RC1"));
        assert!(maven("1.0-SNAPSHOT") < maven("1.0"));
        assert_eq!(maven("1.0.Final"), maven("1.0"));
        assert!(maven("1.0") < maven("1.0-sp1"));
        assert!(!maven("31.1-jre").is_prerelease());
        assert!(maven("1.0-SNAPSHOT").is_prerelease());
    }

    #[test]
    fn test_toolchain_channels() {
        let tc = |s: &str| Version::parse(s, &TOOLCHAIN).unwrap();
        assert!(tc("nightly-2024-01-01") < tc("nightly-2024-02-01"));
        assert!(tc("nightly") < tc("beta"));
        assert!(tc("beta") < tc("stable"));
        assert!(tc("stable").channel().is_some());
        assert_eq!(tc("1.72.0").channel(), None);
        assert!(Version::parse("nightly-2024-13-01", &TOOLCHAIN).is_err());
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            Version::parse("not a version", &SEMVER),
            Err(VersionError::Malformed("not a version".to_string()))
        );
        assert!(Version::parse("", &PEP440).is_err());
        assert!(Version::parse("99999999999999999999999", &SEMVER).is_err());
    }

    #[test]
    fn test_is_correct() {
        assert!(Version::is_correct("1.2.3", &SEMVER));
        assert!(!Version::is_correct("latest", &SEMVER));
        assert!(Version::is_correct(" 1.0a1 ", &PEP440));
    }

    #[test]
    fn test_total_order_is_consistent_with_eq() {
        let versions: Vec<Version> = ["1.0", "1.0.0", "1.0.0-rc1", "1.0.1", "0.9", "1.0.0+b"]
            .iter()
            .map(|s| semver(s))
            .collect();
        for a in &versions {
            for b in &versions {
                assert_eq!(a == b, a.cmp(b) == Ordering::Equal);
                assert_eq!(a.cmp(b), b.cmp(a).reverse());
            }
        }
    }
}
