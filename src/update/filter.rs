//! Release filter pipeline
//!
//! This module provides:
//! - FilterContext: everything a stage may consult besides the releases
//! - Stage: the pure filter stages in their canonical order
//! - Pipeline: the stage presets used by each update query
//! - Selection of the highest or lowest surviving release
//!
//! Every stage keeps input order and never short-circuits, so an empty list
//! flows through the remaining stages and selection yields `None`.

use crate::cooldown::{CooldownPolicy, SemverBumpKind};
use crate::domain::{is_vulnerable, Dependency, Release, SecurityAdvisory};
use crate::requirement::Requirement;
use crate::version::Version;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// Inputs shared by all stages of one pipeline run
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub dependency: &'a Dependency,
    /// User ignore rules
    pub ignored: &'a [Requirement],
    pub advisories: &'a [SecurityAdvisory],
    pub cooldown: &'a CooldownPolicy,
    pub now: DateTime<Utc>,
}

impl FilterContext<'_> {
    fn current(&self) -> Option<&Version> {
        self.dependency.current_version.as_ref()
    }

    fn wants_prereleases(&self) -> bool {
        self.current().is_some_and(Version::is_prerelease)
            || self
                .dependency
                .requirements
                .iter()
                .any(|r| r.requirement.wants_prereleases())
    }
}

/// One filter stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Drop yanked releases
    Yanked,
    /// Keep toolchain releases on the same channel class as the current version
    Channel,
    /// Drop prereleases unless the dependency asks for them
    Prerelease,
    /// Drop releases matching an ignore rule
    Ignored,
    /// Drop releases an advisory still reports as vulnerable
    Vulnerable,
    /// Drop releases still inside their cooldown window
    Cooldown,
    /// Keep releases satisfying every existing requirement
    RangeCompatible,
    /// Keep releases strictly above the current version
    LowerBound,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Yanked => "yanked",
            Stage::Channel => "channel",
            Stage::Prerelease => "prerelease",
            Stage::Ignored => "ignored",
            Stage::Vulnerable => "vulnerable",
            Stage::Cooldown => "cooldown",
            Stage::RangeCompatible => "range-compatible",
            Stage::LowerBound => "lower-bound",
        }
    }

    /// Run this stage over `releases`
    pub fn apply(self, releases: Vec<Release>, ctx: &FilterContext<'_>) -> Vec<Release> {
        match self {
            Stage::Yanked => filter_yanked(releases),
            Stage::Channel => filter_channel(releases, ctx),
            Stage::Prerelease => filter_prereleases(releases, ctx),
            Stage::Ignored => filter_ignored(releases, ctx),
            Stage::Vulnerable => filter_vulnerable(releases, ctx),
            Stage::Cooldown => filter_cooldown(releases, ctx),
            Stage::RangeCompatible => filter_range_compatible(releases, ctx),
            Stage::LowerBound => filter_lower_bound(releases, ctx),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn filter_yanked(releases: Vec<Release>) -> Vec<Release> {
    releases.into_iter().filter(|r| !r.yanked).collect()
}

/// Channel class: floating channel, dated channel, or plain numbered release
fn channel_class(version: &Version) -> Option<(crate::version::Channel, bool)> {
    version.channel().map(|c| (c.channel, c.date.is_some()))
}

pub fn filter_channel(releases: Vec<Release>, ctx: &FilterContext<'_>) -> Vec<Release> {
    let Some(current) = ctx.current() else {
        return releases;
    };
    if !current.dialect().has_channels() {
        return releases;
    }
    let class = channel_class(current);
    releases
        .into_iter()
        .filter(|r| channel_class(&r.version) == class)
        .collect()
}

pub fn filter_prereleases(releases: Vec<Release>, ctx: &FilterContext<'_>) -> Vec<Release> {
    if ctx.wants_prereleases() {
        return releases;
    }
    releases.into_iter().filter(|r| !r.is_prerelease()).collect()
}

pub fn filter_ignored(releases: Vec<Release>, ctx: &FilterContext<'_>) -> Vec<Release> {
    releases
        .into_iter()
        .filter(|r| !ctx.ignored.iter().any(|rule| rule.satisfied_by(&r.version)))
        .collect()
}

pub fn filter_vulnerable(releases: Vec<Release>, ctx: &FilterContext<'_>) -> Vec<Release> {
    let relevant: Vec<SecurityAdvisory> = ctx
        .advisories
        .iter()
        .filter(|a| a.applies_to(&ctx.dependency.name))
        .cloned()
        .collect();
    releases
        .into_iter()
        .filter(|r| !is_vulnerable(&relevant, &r.version))
        .collect()
}

pub fn filter_cooldown(releases: Vec<Release>, ctx: &FilterContext<'_>) -> Vec<Release> {
    let Some(current) = ctx.current() else {
        return releases;
    };
    releases
        .into_iter()
        .filter(|r| {
            let bump = SemverBumpKind::between(current, &r.version);
            !ctx.cooldown.in_cooldown(&ctx.dependency.name, r, bump, ctx.now)
        })
        .collect()
}

pub fn filter_range_compatible(releases: Vec<Release>, ctx: &FilterContext<'_>) -> Vec<Release> {
    releases
        .into_iter()
        .filter(|r| {
            ctx.dependency
                .requirements
                .iter()
                .all(|m| m.requirement.satisfied_by(&r.version))
        })
        .collect()
}

pub fn filter_lower_bound(releases: Vec<Release>, ctx: &FilterContext<'_>) -> Vec<Release> {
    let Some(current) = ctx.current() else {
        return releases;
    };
    releases
        .into_iter()
        .filter(|r| r.version > *current)
        .collect()
}

/// Release counts before and after one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTrace {
    pub stage: Stage,
    pub before: usize,
    pub after: usize,
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub releases: Vec<Release>,
    pub trace: Vec<StageTrace>,
}

impl PipelineOutcome {
    /// Whether `stage` removed every release it received
    pub fn emptied_by(&self, stage: Stage) -> bool {
        self.trace
            .iter()
            .any(|t| t.stage == stage && t.before > 0 && t.after == 0)
    }
}

/// An ordered list of stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipeline {
    stages: &'static [Stage],
}

impl Pipeline {
    /// Stages for `latest_version`
    pub const LATEST: Pipeline = Pipeline {
        stages: &[
            Stage::Yanked,
            Stage::Channel,
            Stage::Prerelease,
            Stage::Ignored,
            Stage::Cooldown,
        ],
    };

    /// Stages for `latest_version_with_no_unlock`
    pub const NO_UNLOCK: Pipeline = Pipeline {
        stages: &[
            Stage::Yanked,
            Stage::Channel,
            Stage::Prerelease,
            Stage::Ignored,
            Stage::Cooldown,
            Stage::RangeCompatible,
        ],
    };

    /// Stages for `lowest_security_fix_version`
    pub const SECURITY_FIX: Pipeline = Pipeline {
        stages: &[
            Stage::Yanked,
            Stage::Channel,
            Stage::Prerelease,
            Stage::Ignored,
            Stage::Vulnerable,
            Stage::Cooldown,
            Stage::LowerBound,
        ],
    };

    pub fn stages(&self) -> &'static [Stage] {
        self.stages
    }

    /// Run every stage in order, recording how many releases each one kept
    pub fn run(&self, releases: Vec<Release>, ctx: &FilterContext<'_>) -> PipelineOutcome {
        let mut trace = Vec::with_capacity(self.stages.len());
        let releases = self.stages.iter().fold(releases, |releases, stage| {
            let before = releases.len();
            let kept = stage.apply(releases, ctx);
            debug!(
                dependency = %ctx.dependency.name,
                stage = %stage,
                before,
                after = kept.len(),
                "filter stage"
            );
            trace.push(StageTrace {
                stage: *stage,
                before,
                after: kept.len(),
            });
            kept
        });
        PipelineOutcome { releases, trace }
    }
}

/// Highest version; equal versions prefer `is_latest`, then input order
pub fn select_max(releases: &[Release]) -> Option<&Release> {
    select(releases, Ordering::Greater)
}

/// Lowest version; equal versions prefer `is_latest`, then input order
pub fn select_min(releases: &[Release]) -> Option<&Release> {
    select(releases, Ordering::Less)
}

fn select(releases: &[Release], wanted: Ordering) -> Option<&Release> {
    releases.iter().fold(None, |best, candidate| match best {
        None => Some(candidate),
        Some(best) => {
            let ord = candidate.version.cmp(&best.version);
            if ord == wanted || (ord == Ordering::Equal && candidate.is_latest && !best.is_latest) {
                Some(candidate)
            } else {
                Some(best)
            }
        }
    })
}
