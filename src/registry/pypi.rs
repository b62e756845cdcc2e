//! PyPI JSON API fetcher
//!
//! Fetches package releases from PyPI.
//! API endpoint: https://pypi.org/pypi/{package}/json

use super::{parse_reported, sorted};
use crate::domain::{Dependency, Release};
use crate::error::FetchError;
use crate::registry::{HttpClient, ReleaseFetcher};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// PyPI API base URL
const PYPI_API_URL: &str = "https://pypi.org/pypi";

/// PyPI fetcher
pub struct PyPIFetcher {
    client: HttpClient,
    base_url: String,
}

/// PyPI package metadata response
#[derive(Debug, Deserialize)]
struct PyPIResponse {
    /// Release files keyed by version
    releases: HashMap<String, Vec<ReleaseFile>>,
}

/// One uploaded distribution file
#[derive(Debug, Deserialize)]
struct ReleaseFile {
    upload_time_iso_8601: Option<String>,
    #[serde(default)]
    yanked: bool,
}

impl PyPIFetcher {
    /// Create a new PyPI fetcher
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: PYPI_API_URL.to_string(),
        }
    }

    /// Point the fetcher at another index (builder pattern)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.base_url, package)
    }
}

/// Earliest upload time across the files of one release
fn earliest_upload(files: &[ReleaseFile]) -> Option<DateTime<Utc>> {
    files
        .iter()
        .filter_map(|f| f.upload_time_iso_8601.as_deref())
        .filter_map(|t| t.parse::<DateTime<Utc>>().ok())
        .min()
}

#[async_trait]
impl ReleaseFetcher for PyPIFetcher {
    fn registry_name(&self) -> &'static str {
        "PyPI"
    }

    async fn fetch_releases(&self, dependency: &Dependency) -> Result<Vec<Release>, FetchError> {
        let url = self.build_url(&dependency.name);
        let response: PyPIResponse = self
            .client
            .get_json(&url, &dependency.name, self.registry_name())
            .await?;

        let releases = response
            .releases
            .into_iter()
            .filter_map(|(raw, files)| {
                let version = parse_reported(&raw, dependency)?;
                // A release is yanked only when every file is
                let yanked = !files.is_empty() && files.iter().all(|f| f.yanked);
                let mut release = Release::new(version).with_yanked(yanked);
                if let Some(released_at) = earliest_upload(&files) {
                    release = release.with_released_at(released_at);
                }
                Some(release)
            })
            .collect();

        Ok(sorted(releases))
    }
}
