//! Security advisories

use crate::requirement::Requirement;
use crate::version::Version;
use serde::Serialize;

/// A published vulnerability for one dependency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityAdvisory {
    /// Name of the affected dependency
    pub dependency_name: String,
    /// Ranges known to be vulnerable
    pub vulnerable_versions: Vec<Requirement>,
    /// Ranges known to be patched or unaffected
    pub safe_versions: Vec<Requirement>,
}

impl SecurityAdvisory {
    pub fn new(dependency_name: impl Into<String>) -> Self {
        Self {
            dependency_name: dependency_name.into(),
            vulnerable_versions: Vec::new(),
            safe_versions: Vec::new(),
        }
    }

    /// Adds a vulnerable range (builder pattern)
    pub fn with_vulnerable(mut self, range: Requirement) -> Self {
        self.vulnerable_versions.push(range);
        self
    }

    /// Adds a safe range (builder pattern)
    pub fn with_safe(mut self, range: Requirement) -> Self {
        self.safe_versions.push(range);
        self
    }

    /// Whether this advisory concerns the named dependency
    pub fn applies_to(&self, name: &str) -> bool {
        self.dependency_name.eq_ignore_ascii_case(name)
    }

    /// Whether `version` is affected
    ///
    /// A safe range wins over a vulnerable one. When only safe ranges are
    /// listed, everything outside them is vulnerable; when only vulnerable
    /// ranges are listed, everything outside them is safe.
    pub fn vulnerable(&self, version: &Version) -> bool {
        if self.safe_versions.iter().any(|r| r.satisfied_by(version)) {
            return false;
        }
        if self.vulnerable_versions.iter().any(|r| r.satisfied_by(version)) {
            return true;
        }
        if !self.vulnerable_versions.is_empty() {
            return false;
        }
        !self.safe_versions.is_empty()
    }
}

/// True if any advisory reports `version` as vulnerable
pub fn is_vulnerable(advisories: &[SecurityAdvisory], version: &Version) -> bool {
    advisories.iter().any(|a| a.vulnerable(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::NPM;
    use crate::version::SEMVER;

    fn v(s: &str) -> Version {
        Version::parse(s, &SEMVER).unwrap()
    }

    fn r(s: &str) -> Requirement {
        Requirement::parse(s, &NPM).unwrap()
    }

    #[test]
    fn test_vulnerable_range_only() {
        let advisory = SecurityAdvisory::new("lodash").with_vulnerable(r("<1.3.0"));
        assert!(advisory.vulnerable(&v("1.2.5")));
        assert!(!advisory.vulnerable(&v("1.3.0")));
    }

    #[test]
    fn test_safe_range_only() {
        let advisory = SecurityAdvisory::new("lodash").with_safe(r(">=1.3.0"));
        assert!(advisory.vulnerable(&v("1.2.5")));
        assert!(!advisory.vulnerable(&v("1.3.1")));
    }

    #[test]
    fn test_safe_wins_over_vulnerable() {
        let advisory = SecurityAdvisory::new("lodash")
            .with_vulnerable(r("<2.0.0"))
            .with_safe(r("~1.4.2"));
        assert!(advisory.vulnerable(&v("1.4.1")));
        assert!(!advisory.vulnerable(&v("1.4.3")));
    }

    #[test]
    fn test_empty_advisory_is_not_vulnerable() {
        assert!(!SecurityAdvisory::new("lodash").vulnerable(&v("1.0.0")));
    }

    #[test]
    fn test_applies_to_is_case_insensitive() {
        assert!(SecurityAdvisory::new("Django").applies_to("django"));
        assert!(!SecurityAdvisory::new("django").applies_to("flask"));
    }

    #[test]
    fn test_is_vulnerable_any() {
        let advisories = vec![
            SecurityAdvisory::new("a").with_vulnerable(r("<1.0.0")),
            SecurityAdvisory::new("a").with_vulnerable(r(">=2.0.0 <2.1.0")),
        ];
        assert!(is_vulnerable(&advisories, &v("2.0.5")));
        assert!(!is_vulnerable(&advisories, &v("1.5.0")));
        assert!(!is_vulnerable(&[], &v("0.1.0")));
    }
}
