//! The answers of one update check, gathered for formatting

use crate::cooldown::SemverBumpKind;
use crate::domain::{Dependency, ManifestRequirement, Release};
use crate::error::CheckError;
use crate::update::UpdateChecker;
use serde::Serialize;

/// Everything the formatters print about one dependency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub dependency: Dependency,
    pub latest: Option<Release>,
    pub latest_no_unlock: Option<Release>,
    pub security_fix: Option<Release>,
    pub vulnerable: bool,
    /// Requirements rewritten for the no-unlock target, or the latest one
    pub updated_requirements: Vec<ManifestRequirement>,
    pub releases_considered: usize,
    /// Fetch and query failures, in the order they occurred
    pub errors: Vec<String>,
}

impl CheckReport {
    /// Run every query of `checker` and collect the answers
    pub fn from_checker(checker: &UpdateChecker) -> Self {
        let mut errors = Vec::new();
        if let Some(e) = checker.fetch_error() {
            errors.push(e.to_string());
        }

        let mut answer = |result: Result<Option<&Release>, CheckError>| match result {
            Ok(release) => release.cloned(),
            Err(e) => {
                let message = e.to_string();
                if !errors.contains(&message) {
                    errors.push(message);
                }
                None
            }
        };
        let latest = answer(checker.latest_version());
        let latest_no_unlock = answer(checker.latest_version_with_no_unlock());
        let security_fix = answer(checker.lowest_security_fix_version());

        let updated_requirements = latest_no_unlock
            .as_ref()
            .or(latest.as_ref())
            .map(|target| checker.updated_requirements(target))
            .unwrap_or_default();

        Self {
            dependency: checker.dependency().clone(),
            latest,
            latest_no_unlock,
            security_fix,
            vulnerable: checker.is_vulnerable(),
            updated_requirements,
            releases_considered: checker.releases().len(),
            errors,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether the latest release is newer than the current version
    pub fn has_update(&self) -> bool {
        match (&self.latest, &self.dependency.current_version) {
            (Some(latest), Some(current)) => latest.version > *current,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Bump from the current version to `release`
    pub fn bump_kind(&self, release: &Release) -> SemverBumpKind {
        match &self.dependency.current_version {
            Some(current) => SemverBumpKind::between(current, &release.version),
            None => SemverBumpKind::Unknown,
        }
    }

    /// Pairs of (before, after) for requirements whose text changed
    pub fn changed_requirements(
        &self,
    ) -> impl Iterator<Item = (&ManifestRequirement, &ManifestRequirement)> {
        self.dependency
            .requirements
            .iter()
            .zip(self.updated_requirements.iter())
            .filter(|(before, after)| before != after)
    }
}
