//! Dependency information structures

use super::EcosystemId;
use crate::error::RequirementError;
use crate::requirement::{Requirement, RequirementDialect, RequirementInput};
use crate::version::Version;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Where a requirement resolves its releases from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A package registry
    Registry,
    /// Tags of a git repository
    Git,
}

/// Source metadata attached to a requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementSource {
    pub kind: SourceKind,
    /// Registry or repository URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Git ref the manifest currently points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl RequirementSource {
    /// A registry source
    pub fn registry(url: Option<String>) -> Self {
        Self {
            kind: SourceKind::Registry,
            url,
            reference: None,
        }
    }

    /// A git source pinned to `reference`
    pub fn git(url: Option<String>, reference: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Git,
            url,
            reference: Some(reference.into()),
        }
    }

    pub fn is_git(&self) -> bool {
        self.kind == SourceKind::Git
    }
}

/// What to do with requirement text that does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRequirementPolicy {
    /// Return the parse error
    #[default]
    Abort,
    /// Log a warning and treat the requirement as unconstrained
    TreatAsUnconstrained,
}

/// One requirement as declared in one manifest file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestRequirement {
    pub requirement: Requirement,
    /// Manifest file that declares the requirement
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<RequirementSource>,
}

impl ManifestRequirement {
    pub fn new(requirement: Requirement, file: impl Into<String>) -> Self {
        Self {
            requirement,
            file: file.into(),
            source: None,
        }
    }

    /// Sets the source metadata (builder pattern)
    pub fn with_source(mut self, source: RequirementSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Parse requirement text, applying `policy` when it is malformed
    pub fn parse_with_policy(
        input: impl Into<RequirementInput>,
        file: impl Into<String>,
        dialect: &'static RequirementDialect,
        policy: MalformedRequirementPolicy,
    ) -> Result<Self, RequirementError> {
        let file = file.into();
        let requirement = match (Requirement::parse(input, dialect), policy) {
            (Ok(requirement), _) => requirement,
            (Err(e), MalformedRequirementPolicy::Abort) => return Err(e),
            (Err(e), MalformedRequirementPolicy::TreatAsUnconstrained) => {
                warn!(file = %file, error = %e, "ignoring malformed requirement");
                Requirement::unconstrained(dialect)
            }
        };
        Ok(Self::new(requirement, file))
    }
}

/// A package dependency and what its manifests require of it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Currently resolved version, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<Version>,
    /// One entry per manifest location
    pub requirements: Vec<ManifestRequirement>,
    /// Selects the version and requirement dialects
    pub ecosystem: EcosystemId,
}

impl Dependency {
    /// Creates a new dependency with no version and no requirements
    pub fn new(name: impl Into<String>, ecosystem: EcosystemId) -> Self {
        Self {
            name: name.into(),
            current_version: None,
            requirements: Vec::new(),
            ecosystem,
        }
    }

    /// Sets the current version (builder pattern)
    pub fn with_current_version(mut self, version: Version) -> Self {
        self.current_version = Some(version);
        self
    }

    /// Adds a manifest requirement (builder pattern)
    pub fn with_requirement(mut self, requirement: ManifestRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// The git ref the dependency is pinned to, if any requirement has a git source
    pub fn git_reference(&self) -> Option<&str> {
        self.requirements
            .iter()
            .filter_map(|r| r.source.as_ref())
            .find(|s| s.is_git())
            .and_then(|s| s.reference.as_deref())
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.current_version {
            Some(version) => write!(f, "{}@{} [{}]", self.name, version, self.ecosystem),
            None => write!(f, "{} [{}]", self.name, self.ecosystem),
        }
    }
}
