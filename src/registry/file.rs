//! Local release file fetcher
//!
//! Reads releases from a JSON array such as:
//!
//! ```json
//! [
//!   { "version": "1.0.0", "released_at": "2024-01-15T10:00:00Z" },
//!   { "version": "1.0.1", "yanked": true },
//!   { "version": "v2.0.0", "tag": "v2.0.0" }
//! ]
//! ```

use super::{parse_reported, sorted};
use crate::domain::{Dependency, Release};
use crate::error::FetchError;
use crate::registry::ReleaseFetcher;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fetcher backed by a JSON file on disk
pub struct ReleaseFileFetcher {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ReleaseEntry {
    version: String,
    released_at: Option<DateTime<Utc>>,
    #[serde(default)]
    yanked: bool,
    tag: Option<String>,
}

impl ReleaseFileFetcher {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ReleaseFetcher for ReleaseFileFetcher {
    fn registry_name(&self) -> &'static str {
        "release file"
    }

    async fn fetch_releases(&self, dependency: &Dependency) -> Result<Vec<Release>, FetchError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::release_file(&self.path, e.to_string()))?;
        let entries: Vec<ReleaseEntry> = serde_json::from_str(&content)
            .map_err(|e| FetchError::release_file(&self.path, e.to_string()))?;

        let releases = entries
            .into_iter()
            .filter_map(|entry| {
                let mut release =
                    Release::new(parse_reported(&entry.version, dependency)?).with_yanked(entry.yanked);
                if let Some(released_at) = entry.released_at {
                    release = release.with_released_at(released_at);
                }
                if let Some(tag) = entry.tag {
                    release = release.with_tag(tag);
                }
                Some(release)
            })
            .collect();

        Ok(sorted(releases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EcosystemId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_reads_releases() {
        let file = write_file(
            r#"[
                { "version": "1.1.0", "released_at": "2024-02-01T00:00:00Z" },
                { "version": "1.0.0", "yanked": true },
                { "version": "garbage!" },
                { "version": "v2.0.0", "tag": "v2.0.0" }
            ]"#,
        );
        let dep = Dependency::new("left-pad", EcosystemId::Npm);
        let releases = ReleaseFileFetcher::new(file.path())
            .fetch_releases(&dep)
            .await
            .unwrap();

        let versions: Vec<&str> = releases.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["1.0.0", "1.1.0", "v2.0.0"]);
        assert!(releases[0].yanked);
        assert!(releases[1].released_at.is_some());
        assert_eq!(releases[2].tag.as_deref(), Some("v2.0.0"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dep = Dependency::new("left-pad", EcosystemId::Npm);
        let result = ReleaseFileFetcher::new("/nonexistent/releases.json")
            .fetch_releases(&dep)
            .await;
        assert!(matches!(result, Err(FetchError::ReleaseFile { .. })));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let file = write_file(r#"{"version": "1.0.0"}"#);
        let dep = Dependency::new("left-pad", EcosystemId::Npm);
        let result = ReleaseFileFetcher::new(file.path()).fetch_releases(&dep).await;
        assert!(matches!(result, Err(FetchError::ReleaseFile { .. })));
    }
}
