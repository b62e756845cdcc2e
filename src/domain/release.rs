//! Release records reported by fetchers
//!
//! A Release is one candidate version of a dependency together with its
//! publication date, yanked flag and, for git ecosystems, the tag it came from.

use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One fetchable candidate version of a dependency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Release {
    /// The parsed version
    pub version: Version,
    /// When this version was published, if the source reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
    /// Whether the registry withdrew this version
    pub yanked: bool,
    /// Raw tag or ref for git-based sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Set by the engine, never by fetchers
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_latest: bool,
}

impl Release {
    /// Create a release with no metadata
    pub fn new(version: Version) -> Self {
        Self {
            version,
            released_at: None,
            yanked: false,
            tag: None,
            is_latest: false,
        }
    }

    /// Sets the publication date (builder pattern)
    pub fn with_released_at(mut self, released_at: DateTime<Utc>) -> Self {
        self.released_at = Some(released_at);
        self
    }

    /// Marks the release as yanked (builder pattern)
    pub fn with_yanked(mut self, yanked: bool) -> Self {
        self.yanked = yanked;
        self
    }

    /// Sets the git tag (builder pattern)
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub(crate) fn mark_latest(mut self) -> Self {
        self.is_latest = true;
        self
    }

    pub fn is_prerelease(&self) -> bool {
        self.version.is_prerelease()
    }
}
