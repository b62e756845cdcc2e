//! Requirement rewriting toward a chosen target version

use super::{Comparator, Operator, Requirement};
use crate::version::Version;
use tracing::warn;

impl Requirement {
    /// Rewrite a single-comparator requirement so it points at `target`
    ///
    /// Operator text, `v` prefix, wildcard suffix and precision are kept.
    /// Requirements with several comparators, `!=` exclusions and bounds the
    /// target already satisfies are returned unchanged.
    pub fn updated_for(&self, target: &Version) -> Requirement {
        let Some(text) = self.rewritten_text(target) else {
            return self.clone();
        };

        match Requirement::parse(text.as_str(), self.dialect) {
            Ok(updated) => updated,
            Err(e) => {
                warn!(requirement = %self.raw, target = %target, error = %e, "rewritten requirement does not parse");
                self.clone()
            }
        }
    }

    fn rewritten_text(&self, target: &Version) -> Option<String> {
        if self.clauses.len() != 1 {
            return None;
        }
        let [comparator] = self.clauses[0].as_slice() else {
            return None;
        };

        let replacement = match comparator.operator {
            Operator::NotEq => return None,
            Operator::Gte | Operator::Gt | Operator::Lt | Operator::Lte
                if comparator.matches(target) =>
            {
                return None
            }
            Operator::Lt => comparator.text_after(target),
            Operator::Lte if comparator.truncates(target) => comparator.text_after(target),
            _ => comparator.text_for(target),
        };

        Some(self.raw.replacen(&comparator.version_text, &replacement, 1))
    }
}

impl Comparator {
    fn v_prefix(&self) -> &str {
        let mut chars = self.version_text.chars();
        match (chars.next(), chars.next()) {
            (Some('v' | 'V'), Some(c)) if c.is_ascii_digit() => &self.version_text[..1],
            _ => "",
        }
    }

    /// Target spelled at this comparator's precision
    fn text_for(&self, target: &Version) -> String {
        let release = target.release_segments();
        let body = if target.has_qualifiers() || release.is_empty() || self.precision == 0 {
            strip_v(target.as_str()).to_string()
        } else {
            join(&at_precision(&release, self.precision))
        };
        format!("{}{}{}", self.v_prefix(), body, self.wildcard_suffix)
    }

    /// Whether writing `target` at this precision drops a non-zero segment
    fn truncates(&self, target: &Version) -> bool {
        self.precision > 0
            && !target.has_qualifiers()
            && target
                .release_segments()
                .iter()
                .skip(self.precision)
                .any(|n| *n != 0)
    }

    /// Smallest version at this precision that is above `target`
    fn text_after(&self, target: &Version) -> String {
        let release = target.release_segments();
        if release.is_empty() || self.precision == 0 {
            return self.text_for(target);
        }
        let mut segments = at_precision(&release, self.precision);
        if let Some(last) = segments.last_mut() {
            *last = last.saturating_add(1);
        }
        format!("{}{}{}", self.v_prefix(), join(&segments), self.wildcard_suffix)
    }
}

fn at_precision(release: &[u64], precision: usize) -> Vec<u64> {
    let mut segments: Vec<u64> = release.iter().copied().take(precision).collect();
    segments.resize(precision, 0);
    segments
}

fn join(segments: &[u64]) -> String {
    segments
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

fn strip_v(text: &str) -> &str {
    match text.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => text,
    }
}
