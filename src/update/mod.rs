//! Update queries for one dependency
//!
//! This module provides:
//! - The release filter pipeline and its presets
//! - CheckOptions: ignore rules, advisories, cooldown and the clock
//! - UpdateChecker: latest, latest-without-unlock and lowest-security-fix
//!   queries over one memoized release list, plus requirement rewriting

mod filter;

pub use filter::{
    filter_channel, filter_cooldown, filter_ignored, filter_lower_bound, filter_prereleases,
    filter_range_compatible, filter_vulnerable, filter_yanked, select_max, select_min,
    FilterContext, Pipeline, PipelineOutcome, Stage, StageTrace,
};

use crate::cooldown::CooldownPolicy;
use crate::domain::{
    is_vulnerable, Dependency, ManifestRequirement, Release, RequirementSource, SecurityAdvisory,
};
use crate::error::{CheckError, FetchError};
use crate::registry::ReleaseFetcher;
use crate::requirement::Requirement;
use chrono::{DateTime, Utc};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Policies applied by every query of one checker
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Releases matching any of these are never offered
    pub ignored: Vec<Requirement>,
    pub advisories: Vec<SecurityAdvisory>,
    pub cooldown: CooldownPolicy,
    /// Fail instead of returning `None` when ignore rules remove every candidate
    pub raise_on_ignored: bool,
    /// Clock used for cooldown windows
    pub now: DateTime<Utc>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            ignored: Vec::new(),
            advisories: Vec::new(),
            cooldown: CooldownPolicy::default(),
            raise_on_ignored: false,
            now: Utc::now(),
        }
    }
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set ignore rules
    pub fn with_ignored(mut self, ignored: Vec<Requirement>) -> Self {
        self.ignored = ignored;
        self
    }

    /// Set security advisories
    pub fn with_advisories(mut self, advisories: Vec<SecurityAdvisory>) -> Self {
        self.advisories = advisories;
        self
    }

    /// Set the cooldown policy
    pub fn with_cooldown(mut self, cooldown: CooldownPolicy) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set whether an all-ignored candidate list is an error
    pub fn with_raise_on_ignored(mut self, raise: bool) -> Self {
        self.raise_on_ignored = raise;
        self
    }

    /// Set a custom current time (for testing)
    pub fn with_time(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

type QueryResult = Result<Option<Release>, CheckError>;

/// Answers update queries for one dependency
///
/// The release list is fetched once, and each query result is computed at
/// most once per checker.
#[derive(Debug)]
pub struct UpdateChecker {
    dependency: Dependency,
    releases: Vec<Release>,
    fetch_error: Option<FetchError>,
    options: CheckOptions,
    latest: OnceLock<QueryResult>,
    latest_no_unlock: OnceLock<QueryResult>,
    security_fix: OnceLock<QueryResult>,
}

impl UpdateChecker {
    /// Build a checker over an already fetched release list
    ///
    /// A fetch error is kept for reporting and the queries run on an empty list.
    pub fn new(
        dependency: Dependency,
        fetched: Result<Vec<Release>, FetchError>,
        options: CheckOptions,
    ) -> Self {
        let (mut releases, fetch_error) = match fetched {
            Ok(releases) => (releases, None),
            Err(e) => {
                warn!(dependency = %dependency.name, error = %e, "fetching releases failed");
                (Vec::new(), Some(e))
            }
        };

        if options.cooldown.is_enabled() {
            let undated = releases.iter().filter(|r| r.released_at.is_none()).count();
            if undated > 0 {
                warn!(
                    dependency = %dependency.name,
                    count = undated,
                    "releases without a publication date are exempt from cooldown"
                );
            }
        }

        if let (Some(reference), Some(current)) =
            (dependency.git_reference(), dependency.current_version.as_ref())
        {
            releases.push(
                Release::new(current.clone())
                    .with_tag(reference)
                    .mark_latest(),
            );
        }

        Self {
            dependency,
            releases,
            fetch_error,
            options,
            latest: OnceLock::new(),
            latest_no_unlock: OnceLock::new(),
            security_fix: OnceLock::new(),
        }
    }

    /// Fetch releases once through `fetcher` and build a checker over them
    pub async fn fetch(
        dependency: Dependency,
        fetcher: &dyn ReleaseFetcher,
        options: CheckOptions,
    ) -> Self {
        let fetched = fetcher.fetch_releases(&dependency).await;
        Self::new(dependency, fetched, options)
    }

    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    /// Candidate releases as fetched, plus the git sentinel if any
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// The error the fetcher returned, if it failed
    pub fn fetch_error(&self) -> Option<&FetchError> {
        self.fetch_error.as_ref()
    }

    /// Highest release passing the common filters, marked `is_latest`
    pub fn latest_version(&self) -> Result<Option<&Release>, CheckError> {
        cached(&self.latest, || {
            self.query(Pipeline::LATEST, select_max)
                .map(|chosen| chosen.map(Release::mark_latest))
        })
    }

    /// Highest release that also satisfies every existing requirement
    pub fn latest_version_with_no_unlock(&self) -> Result<Option<&Release>, CheckError> {
        cached(&self.latest_no_unlock, || {
            self.query(Pipeline::NO_UNLOCK, select_max)
        })
    }

    /// Lowest non-vulnerable release above the current version
    ///
    /// `None` when the current version is not affected by any advisory.
    pub fn lowest_security_fix_version(&self) -> Result<Option<&Release>, CheckError> {
        cached(&self.security_fix, || {
            if self.dependency.current_version.is_some() && !self.is_vulnerable() {
                return Ok(None);
            }
            self.query(Pipeline::SECURITY_FIX, select_min)
        })
    }

    /// Whether an advisory for this dependency covers the current version
    pub fn is_vulnerable(&self) -> bool {
        let Some(current) = &self.dependency.current_version else {
            return false;
        };
        let relevant: Vec<SecurityAdvisory> = self
            .options
            .advisories
            .iter()
            .filter(|a| a.applies_to(&self.dependency.name))
            .cloned()
            .collect();
        is_vulnerable(&relevant, current)
    }

    /// Requirements rewritten to point at `target`
    ///
    /// Git sources move to the target's tag.
    pub fn updated_requirements(&self, target: &Release) -> Vec<ManifestRequirement> {
        self.dependency
            .requirements
            .iter()
            .map(|m| {
                let mut updated = m.clone();
                updated.requirement = m.requirement.updated_for(&target.version);
                if let Some(source) = m.source.as_ref().filter(|s| s.is_git()) {
                    let reference = target
                        .tag
                        .clone()
                        .unwrap_or_else(|| target.version.to_string());
                    updated.source = Some(RequirementSource::git(source.url.clone(), reference));
                }
                updated
            })
            .collect()
    }

    fn context(&self) -> FilterContext<'_> {
        FilterContext {
            dependency: &self.dependency,
            ignored: &self.options.ignored,
            advisories: &self.options.advisories,
            cooldown: &self.options.cooldown,
            now: self.options.now,
        }
    }

    fn query(
        &self,
        pipeline: Pipeline,
        select: fn(&[Release]) -> Option<&Release>,
    ) -> QueryResult {
        let outcome = pipeline.run(self.releases.clone(), &self.context());

        if self.options.raise_on_ignored && outcome.emptied_by(Stage::Ignored) {
            return Err(CheckError::AllVersionsIgnored {
                dependency: self.dependency.name.clone(),
            });
        }

        let chosen = select(&outcome.releases).cloned();
        if let Some(release) = &chosen {
            info!(dependency = %self.dependency.name, version = %release.version, "selected release");
        }
        Ok(chosen)
    }
}

fn cached<'a>(
    cell: &'a OnceLock<QueryResult>,
    compute: impl FnOnce() -> QueryResult,
) -> Result<Option<&'a Release>, CheckError> {
    match cell.get_or_init(compute) {
        Ok(release) => Ok(release.as_ref()),
        Err(e) => Err(e.clone()),
    }
}
