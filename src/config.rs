//! Configuration file support
//!
//! This module provides:
//! - `ConfigFile`: the optional TOML file with cooldown, ignore and advisory settings
//! - Conversion of per-dependency entries into `Requirement` and `SecurityAdvisory` values
//!
//! ```toml
//! raise-on-ignored = true
//!
//! [cooldown]
//! default-days = 3
//! semver-major-days = 14
//! exclude = ["internal-*"]
//!
//! [[ignore]]
//! dependency-name = "left-pad"
//! versions = [">= 2.0.0"]
//!
//! [[ignore]]
//! dependency-name = "rails"
//! update-types = ["version-update:semver-major"]
//!
//! [[advisory]]
//! dependency-name = "lodash"
//! vulnerable = ["< 4.17.21"]
//! ```

use crate::cooldown::{CooldownPolicy, NamePattern};
use crate::domain::{Dependency, SecurityAdvisory};
use crate::error::ConfigError;
use crate::requirement::{Requirement, RequirementDialect, UpdateType};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Settings loaded from a TOML file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConfigFile {
    pub cooldown: Option<CooldownPolicy>,
    pub ignore: Vec<IgnoreEntry>,
    pub advisory: Vec<AdvisoryEntry>,
    pub raise_on_ignored: bool,
}

/// Version ranges never offered for matching dependencies
///
/// An entry with neither `versions` nor `update-types` ignores every version.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IgnoreEntry {
    /// Dependency name, `*` wildcards allowed
    pub dependency_name: NamePattern,
    #[serde(default)]
    pub versions: Vec<String>,
    /// Update classes counted from the current version
    #[serde(default)]
    pub update_types: Vec<UpdateType>,
}

impl IgnoreEntry {
    fn rules_for(&self, dependency: &Dependency) -> Result<Vec<Requirement>, ConfigError> {
        let dialect = dependency.ecosystem.dialect().requirement;
        if self.versions.is_empty() && self.update_types.is_empty() {
            return Ok(vec![Requirement::unconstrained(dialect)]);
        }
        let mut rules = self
            .versions
            .iter()
            .map(|rule| parse_range(rule, dialect, "ignore rule"))
            .collect::<Result<Vec<_>, _>>()?;
        rules.extend(update_type_rules(dependency, &self.update_types)?);
        Ok(rules)
    }
}

/// A security advisory for one dependency
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdvisoryEntry {
    pub dependency_name: String,
    #[serde(default)]
    pub vulnerable: Vec<String>,
    #[serde(default)]
    pub safe: Vec<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;
        debug!(
            path = %path.display(),
            ignore_entries = config.ignore.len(),
            advisories = config.advisory.len(),
            "loaded config file"
        );
        Ok(config)
    }

    /// Parse configuration text; `path` only appears in errors
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Ignore rules of every entry matching the dependency name
    pub fn ignore_rules_for(&self, dependency: &Dependency) -> Result<Vec<Requirement>, ConfigError> {
        let mut rules = Vec::new();
        for entry in self.ignore.iter().filter(|e| e.dependency_name.matches(&dependency.name)) {
            rules.extend(entry.rules_for(dependency)?);
        }
        Ok(rules)
    }

    /// Advisories whose dependency name matches
    pub fn advisories_for(
        &self,
        dependency: &Dependency,
    ) -> Result<Vec<SecurityAdvisory>, ConfigError> {
        let dialect = dependency.ecosystem.dialect().requirement;
        self.advisory
            .iter()
            .filter(|entry| entry.dependency_name.eq_ignore_ascii_case(&dependency.name))
            .map(|entry| {
                build_advisory(&entry.dependency_name, &entry.vulnerable, &entry.safe, dialect)
            })
            .collect()
    }
}

/// Advisory ranges share the comma-tolerant syntax of ignore rules
pub fn parse_range(
    raw: &str,
    dialect: &'static RequirementDialect,
    context: &str,
) -> Result<Requirement, ConfigError> {
    Requirement::parse_ignore_rule(raw, dialect)
        .map_err(|e| ConfigError::invalid_requirement(context, e))
}

/// Ignore ranges for update types, counted from the dependency's current version
///
/// Without a current version there is nothing to count from and no range applies.
pub fn update_type_rules(
    dependency: &Dependency,
    kinds: &[UpdateType],
) -> Result<Vec<Requirement>, ConfigError> {
    let Some(current) = &dependency.current_version else {
        if !kinds.is_empty() {
            debug!(dependency = %dependency.name, "update-type ignores skipped without a current version");
        }
        return Ok(Vec::new());
    };
    let dialect = dependency.ecosystem.dialect().requirement;
    let mut rules = Vec::new();
    for kind in kinds {
        let rule = Requirement::ignoring_update_type(*kind, current, dialect)
            .map_err(|e| ConfigError::invalid_requirement("update-type ignore", e))?;
        rules.extend(rule);
    }
    Ok(rules)
}

/// Build an advisory from raw vulnerable and safe ranges
pub fn build_advisory(
    dependency_name: &str,
    vulnerable: &[String],
    safe: &[String],
    dialect: &'static RequirementDialect,
) -> Result<SecurityAdvisory, ConfigError> {
    let mut advisory = SecurityAdvisory::new(dependency_name);
    for range in vulnerable {
        advisory = advisory.with_vulnerable(parse_range(range, dialect, "vulnerable range")?);
    }
    for range in safe {
        advisory = advisory.with_safe(parse_range(range, dialect, "safe range")?);
    }
    Ok(advisory)
}
