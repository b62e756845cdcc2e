//! Requirement text parsing
//!
//! Range sugar is resolved here so that satisfaction checks only deal
//! with canonical comparators and precomputed upper bounds.

use super::dialect::{AndSeparator, BareVersion, RequirementDialect, UpperRule};
use super::{Comparator, Operator, Requirement};
use crate::error::RequirementError;
use crate::version::Version;
use regex::Regex;
use std::sync::LazyLock;

/// Whitespace between an operator and its version
static OPERATOR_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([<>=!~^]+)\s+").unwrap());

/// `1.0.0 - 2.0.0`
static HYPHEN_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());

/// `1.0.0 <= v < 2.0.0`
static ELM_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s*(<=|<)\s*v\s*(<=|<)\s*(\S+)$").unwrap());

/// One bracket range such as `[1.0,2.0)` or `[1.5]`, optionally followed by a comma
static BRACKET_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\[(])\s*([^,\[\]()\s]*)\s*(,\s*([^,\[\]()\s]*)\s*)?([\])])\s*,?").unwrap()
});

const OPERATOR_CHARS: &[char] = &['<', '>', '=', '!', '~', '^'];

pub(super) fn parse(
    raw: &str,
    dialect: &'static RequirementDialect,
    comma_and: bool,
) -> Result<Requirement, RequirementError> {
    let trimmed = raw.trim();
    let parser = Parser {
        raw,
        dialect,
        comma_and,
    };

    let clauses = if trimmed.is_empty() {
        vec![Vec::new()]
    } else if dialect.brackets && trimmed.starts_with(['[', '(']) {
        parser.bracket_clauses(trimmed)?
    } else {
        split_or(trimmed, dialect.or_separators)
            .into_iter()
            .map(|part| parser.clause(part.trim()))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(Requirement {
        raw: trimmed.to_string(),
        clauses,
        dialect,
    })
}

fn split_or<'a>(text: &'a str, separators: &[&str]) -> Vec<&'a str> {
    separators.iter().fold(vec![text], |parts, sep| {
        parts.into_iter().flat_map(|p| p.split(sep)).collect()
    })
}

struct Parser<'a> {
    raw: &'a str,
    dialect: &'static RequirementDialect,
    comma_and: bool,
}

impl Parser<'_> {
    fn malformed(&self) -> RequirementError {
        RequirementError::malformed(self.raw)
    }

    fn version(&self, text: &str) -> Result<Version, RequirementError> {
        Version::parse(text, self.dialect.version).map_err(|_| self.malformed())
    }

    fn clause(&self, text: &str) -> Result<Vec<Comparator>, RequirementError> {
        if text.is_empty() {
            return Err(self.malformed());
        }

        if self.dialect.elm_ranges {
            if let Some(caps) = ELM_RANGE.captures(text) {
                let lower_op = if &caps[2] == "<=" { Operator::Gte } else { Operator::Gt };
                let upper_op = if &caps[3] == "<=" { Operator::Lte } else { Operator::Lt };
                return Ok(vec![
                    self.plain(lower_op, &caps[1])?,
                    self.plain(upper_op, &caps[4])?,
                ]);
            }
        }

        if self.dialect.hyphen_ranges {
            if let Some(caps) = HYPHEN_RANGE.captures(text) {
                return Ok(vec![
                    self.plain(Operator::Gte, &caps[1])?,
                    self.plain(Operator::Lte, &caps[2])?,
                ]);
            }
        }

        let collapsed = OPERATOR_SPACE.replace_all(text, "$1");
        let mut comparators = Vec::new();
        for token in self.split_and(&collapsed) {
            if let Some(comparator) = self.comparator(token)? {
                comparators.push(comparator);
            }
        }
        Ok(comparators)
    }

    fn split_and<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let pieces: Vec<&str> = if self.comma_and {
            text.split(',').collect()
        } else {
            vec![text]
        };

        pieces
            .into_iter()
            .flat_map(|piece| -> Vec<&'t str> {
                match self.dialect.and_separator {
                    AndSeparator::Whitespace => piece.split_whitespace().collect(),
                    AndSeparator::Comma => piece.split(',').map(str::trim).collect(),
                    AndSeparator::CommaOrWhitespace => piece
                        .split(|c: char| c == ',' || c.is_whitespace())
                        .filter(|t| !t.is_empty())
                        .collect(),
                    AndSeparator::Keyword(keyword) => {
                        piece.split(keyword).map(str::trim).collect()
                    }
                }
            })
            .collect()
    }

    /// Parse one operator/version token; `None` means the token constrains nothing
    fn comparator(&self, token: &str) -> Result<Option<Comparator>, RequirementError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(self.malformed());
        }

        let op_len = token
            .find(|c: char| !OPERATOR_CHARS.contains(&c))
            .unwrap_or(token.len());
        let (op_text, version_text) = token.split_at(op_len);
        if version_text.is_empty() {
            return Err(self.malformed());
        }

        let (operator, rule) = if op_text.is_empty() {
            match self.dialect.bare {
                BareVersion::Exact | BareVersion::PartialWildcard => (Operator::Eq, UpperRule::None),
                BareVersion::Caret => (Operator::Caret, UpperRule::Caret),
                BareVersion::Minimum => (Operator::Gte, UpperRule::None),
            }
        } else {
            self.dialect
                .operator(op_text)
                .ok_or_else(|| RequirementError::unsupported_operator(op_text, self.raw))?
        };

        if self.dialect.wildcards {
            if let Some((prefix, suffix)) = self.split_wildcard(version_text)? {
                let operator = if op_text.is_empty() { Operator::Eq } else { operator };
                return self.wildcard(operator, prefix, suffix, version_text);
            }
        }

        let version = self.version(version_text)?;
        let precision = version.release_segments().len();

        if op_text.is_empty()
            && self.dialect.bare == BareVersion::PartialWildcard
            && precision < 3
            && !version.has_qualifiers()
        {
            return self.wildcard(Operator::Eq, version_text, "", version_text);
        }

        let upper = match rule {
            UpperRule::None => None,
            _ => Some(self.upper_bound(rule, &version.release_segments())?),
        };

        Ok(Some(Comparator {
            operator,
            version,
            upper,
            prefix_match: false,
            version_text: version_text.to_string(),
            precision,
            wildcard_suffix: String::new(),
        }))
    }

    /// Split `1.2.*` into (`1.2`, `.*`); `None` when no wildcard is present
    fn split_wildcard<'t>(
        &self,
        text: &'t str,
    ) -> Result<Option<(&'t str, &'t str)>, RequirementError> {
        let is_wild = |s: &str| matches!(s, "*" | "x" | "X");
        let parts: Vec<&str> = text.split('.').collect();
        let Some(first) = parts.iter().position(|p| is_wild(p)) else {
            return Ok(None);
        };
        if !parts[first..].iter().all(|p| is_wild(p)) {
            return Err(self.malformed());
        }
        let prefix_len = parts[..first].iter().map(|p| p.len() + 1).sum::<usize>();
        let prefix = &text[..prefix_len.saturating_sub(1)];
        Ok(Some((prefix, &text[prefix.len()..])))
    }

    /// Build the range a wildcard stands for
    fn wildcard(
        &self,
        operator: Operator,
        prefix: &str,
        suffix: &str,
        version_text: &str,
    ) -> Result<Option<Comparator>, RequirementError> {
        if prefix.is_empty() {
            return match operator {
                Operator::NotEq | Operator::Lt | Operator::Gt => Err(self.malformed()),
                _ => Ok(None),
            };
        }

        let version = self.version(prefix)?;
        let release = version.release_segments();
        let precision = release.len();
        let next = self.increment_last(&release)?;

        let (operator, version, upper, prefix_match) = match operator {
            Operator::Eq | Operator::Tilde => (Operator::Tilde, version, Some(next), true),
            Operator::NotEq => (Operator::NotEq, version, Some(next), true),
            Operator::Caret => {
                let upper = self.upper_bound(UpperRule::Caret, &release)?;
                (Operator::Caret, version, Some(upper), true)
            }
            Operator::Gt => (Operator::Gte, next, None, false),
            Operator::Lte => (Operator::Lt, next, None, false),
            other => (other, version, None, false),
        };

        Ok(Some(Comparator {
            operator,
            version,
            upper,
            prefix_match,
            version_text: version_text.to_string(),
            precision,
            wildcard_suffix: suffix.to_string(),
        }))
    }

    /// Comparator with no range sugar, used by hyphen and Elm ranges
    fn plain(&self, operator: Operator, text: &str) -> Result<Comparator, RequirementError> {
        let version = self.version(text)?;
        Ok(Comparator {
            operator,
            precision: version.release_segments().len(),
            version,
            upper: None,
            prefix_match: false,
            version_text: text.to_string(),
            wildcard_suffix: String::new(),
        })
    }

    fn upper_bound(&self, rule: UpperRule, release: &[u64]) -> Result<Version, RequirementError> {
        if release.is_empty() {
            return Err(self.malformed());
        }
        let mut segments = release.to_vec();
        match rule {
            UpperRule::None => {}
            UpperRule::Caret => {
                let idx = segments
                    .iter()
                    .position(|n| *n != 0)
                    .unwrap_or(segments.len() - 1);
                segments[idx] = segments[idx].checked_add(1).ok_or_else(|| self.malformed())?;
                segments[idx + 1..].iter_mut().for_each(|n| *n = 0);
            }
            UpperRule::Pessimistic | UpperRule::PaddedPessimistic => {
                if rule == UpperRule::PaddedPessimistic && segments.len() < 3 {
                    segments.push(0);
                }
                if segments.len() > 1 {
                    segments.pop();
                }
                return self.increment_last(&segments);
            }
        }
        self.bound_version(&segments)
    }

    fn increment_last(&self, release: &[u64]) -> Result<Version, RequirementError> {
        let mut segments = release.to_vec();
        let last = segments.last_mut().ok_or_else(|| self.malformed())?;
        *last = last.checked_add(1).ok_or_else(|| self.malformed())?;
        self.bound_version(&segments)
    }

    fn bound_version(&self, segments: &[u64]) -> Result<Version, RequirementError> {
        let mut text = segments
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        if let Some(floor) = self.dialect.version.upper_floor {
            text = format!("{text}.{floor}");
        }
        self.version(&text)
    }

    /// Maven/NuGet interval notation; each interval is its own clause
    fn bracket_clauses(&self, text: &str) -> Result<Vec<Vec<Comparator>>, RequirementError> {
        let mut clauses = Vec::new();
        let mut rest = text;
        while !rest.trim().is_empty() {
            let caps = BRACKET_RANGE
                .captures(rest)
                .ok_or_else(|| self.malformed())?;
            let open = &caps[1];
            let close = &caps[5];
            let lower = caps.get(2).map_or("", |m| m.as_str());
            let has_comma = caps.get(3).is_some();
            let upper = caps.get(4).map_or("", |m| m.as_str());

            let mut clause = Vec::new();
            if !has_comma {
                if open != "[" || close != "]" || lower.is_empty() {
                    return Err(self.malformed());
                }
                clause.push(self.plain(Operator::Eq, lower)?);
            } else {
                if !lower.is_empty() {
                    let op = if open == "[" { Operator::Gte } else { Operator::Gt };
                    clause.push(self.plain(op, lower)?);
                }
                if !upper.is_empty() {
                    let op = if close == "]" { Operator::Lte } else { Operator::Lt };
                    clause.push(self.plain(op, upper)?);
                }
            }
            clauses.push(clause);
            rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
        }
        Ok(clauses)
    }
}
