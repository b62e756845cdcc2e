//! CLI argument parsing module for uptick

use crate::config::{build_advisory, parse_range, update_type_rules, ConfigFile};
use crate::cooldown::{CooldownPolicy, CooldownPrecedence};
use crate::domain::{
    Dependency, EcosystemId, MalformedRequirementPolicy, ManifestRequirement, RequirementSource,
};
use crate::error::ConfigError;
use crate::requirement::UpdateType;
use crate::update::CheckOptions;
use crate::version::Version;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// File name reported for requirements given on the command line
pub const CLI_REQUIREMENT_FILE: &str = "<command line>";

/// Parse duration string in format: Nd (days), Nw (weeks), Nm (months)
fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        value: s.to_string(),
    };
    let s = s.trim();

    let (num_str, days_per_unit) = if let Some(n) = s.strip_suffix('d') {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('w') {
        (n, 7)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 30)
    } else {
        return Err(invalid());
    };

    let num: u64 = num_str.parse().map_err(|_| invalid())?;
    Ok(Duration::from_secs(num * days_per_unit * SECONDS_PER_DAY))
}

/// Whole days in a duration, saturating at `u32::MAX`
pub fn whole_days(duration: Duration) -> u32 {
    u32::try_from(duration.as_secs() / SECONDS_PER_DAY).unwrap_or(u32::MAX)
}

/// Find the newest acceptable release for one dependency
#[derive(Parser, Debug, Clone)]
#[command(name = "uptick", version, about = "Find the newest acceptable release of a dependency")]
pub struct CliArgs {
    /// Package ecosystem (npm, cargo, pip, bundler, maven, ...)
    pub ecosystem: EcosystemId,

    /// Dependency name
    pub name: String,

    /// Currently installed version
    #[arg(long)]
    pub current: Option<String>,

    /// Declared requirement (can be specified multiple times)
    #[arg(short, long, action = ArgAction::Append)]
    pub requirement: Vec<String>,

    /// Treat malformed requirements as unconstrained instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Git reference the dependency is pinned to
    #[arg(long)]
    pub git_ref: Option<String>,

    /// Git repository URL for --git-ref
    #[arg(long, requires = "git_ref")]
    pub git_url: Option<String>,

    // Filters
    /// Version range never to offer (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Update type never to offer, counted from --current (e.g., semver-major)
    #[arg(long, action = ArgAction::Append)]
    pub ignore_update_type: Vec<UpdateType>,

    /// Vulnerable version range of an advisory (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub vulnerable: Vec<String>,

    /// Patched version range of an advisory (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub safe: Vec<String>,

    /// Fail when ignore rules remove every candidate
    #[arg(long)]
    pub raise_on_ignored: bool,

    // Cooldown
    /// Only offer releases published at least this long ago (e.g., 2w, 10d, 1m)
    #[arg(long, value_parser = parse_duration)]
    pub cooldown: Option<Duration>,

    /// Cooldown for major bumps
    #[arg(long, value_parser = parse_duration)]
    pub cooldown_major: Option<Duration>,

    /// Cooldown for minor bumps
    #[arg(long, value_parser = parse_duration)]
    pub cooldown_minor: Option<Duration>,

    /// Cooldown for patch bumps
    #[arg(long, value_parser = parse_duration)]
    pub cooldown_patch: Option<Duration>,

    /// Use the largest configured cooldown for every bump
    #[arg(long)]
    pub cooldown_max: bool,

    // Sources
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read releases from a JSON file instead of the registry
    #[arg(long)]
    pub releases: Option<PathBuf>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Build the dependency described by the arguments
    pub fn dependency(&self) -> Result<Dependency, ConfigError> {
        let dialect = self.ecosystem.dialect();
        let mut dependency = Dependency::new(&self.name, self.ecosystem);

        if let Some(current) = &self.current {
            let version = Version::parse(current, dialect.version)
                .map_err(|e| ConfigError::invalid_version("current version", e))?;
            dependency = dependency.with_current_version(version);
        }

        let policy = if self.lenient {
            MalformedRequirementPolicy::TreatAsUnconstrained
        } else {
            MalformedRequirementPolicy::Abort
        };
        for raw in &self.requirement {
            let mut requirement = ManifestRequirement::parse_with_policy(
                raw.as_str(),
                CLI_REQUIREMENT_FILE,
                dialect.requirement,
                policy,
            )
            .map_err(|e| ConfigError::invalid_requirement("requirement", e))?;
            if let Some(reference) = &self.git_ref {
                requirement =
                    requirement.with_source(RequirementSource::git(self.git_url.clone(), reference));
            }
            dependency = dependency.with_requirement(requirement);
        }

        // A git pin without a declared requirement still needs a source to carry the reference
        if self.requirement.is_empty() {
            if let Some(reference) = &self.git_ref {
                dependency = dependency.with_requirement(
                    ManifestRequirement::parse_with_policy(
                        "",
                        CLI_REQUIREMENT_FILE,
                        dialect.requirement,
                        policy,
                    )
                    .map_err(|e| ConfigError::invalid_requirement("requirement", e))?
                    .with_source(RequirementSource::git(self.git_url.clone(), reference)),
                );
            }
        }

        Ok(dependency)
    }

    /// Cooldown from the config file with command line thresholds applied on top
    pub fn cooldown_policy(&self, config: &ConfigFile) -> CooldownPolicy {
        let mut policy = config.cooldown.clone().unwrap_or_default();
        if let Some(d) = self.cooldown {
            policy.default_days = whole_days(d);
        }
        if let Some(d) = self.cooldown_major {
            policy.semver_major_days = whole_days(d);
        }
        if let Some(d) = self.cooldown_minor {
            policy.semver_minor_days = whole_days(d);
        }
        if let Some(d) = self.cooldown_patch {
            policy.semver_patch_days = whole_days(d);
        }
        if self.cooldown_max {
            policy.precedence = CooldownPrecedence::MaxOfAll;
        }
        policy
    }

    /// Query options for `dependency`, merging the config file with the arguments
    pub fn check_options(
        &self,
        config: &ConfigFile,
        dependency: &Dependency,
    ) -> Result<CheckOptions, ConfigError> {
        let dialect = dependency.ecosystem.dialect().requirement;

        let mut ignored = config.ignore_rules_for(dependency)?;
        for rule in &self.ignore {
            ignored.push(parse_range(rule, dialect, "ignore rule")?);
        }
        ignored.extend(update_type_rules(dependency, &self.ignore_update_type)?);

        let mut advisories = config.advisories_for(dependency)?;
        if !self.vulnerable.is_empty() || !self.safe.is_empty() {
            advisories.push(build_advisory(
                &dependency.name,
                &self.vulnerable,
                &self.safe,
                dialect,
            )?);
        }

        Ok(CheckOptions::new()
            .with_ignored(ignored)
            .with_advisories(advisories)
            .with_cooldown(self.cooldown_policy(config))
            .with_raise_on_ignored(self.raise_on_ignored || config.raise_on_ignored))
    }
}
