//! npm Registry fetcher
//!
//! Fetches package releases from the npm registry.
//! API endpoint: https://registry.npmjs.org/{package}
//!
//! Deprecated versions are reported as yanked.

use super::{parse_reported, sorted};
use crate::domain::{Dependency, Release};
use crate::error::FetchError;
use crate::registry::{HttpClient, ReleaseFetcher};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// npm registry base URL
const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// npm Registry fetcher
pub struct NpmFetcher {
    client: HttpClient,
    base_url: String,
}

/// npm package metadata response
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    /// Publish time keyed by version
    #[serde(default)]
    time: HashMap<String, String>,
    /// Available versions
    #[serde(default)]
    versions: HashMap<String, NpmVersion>,
}

#[derive(Debug, Deserialize)]
struct NpmVersion {
    /// Deprecation message; any value marks the version deprecated
    deprecated: Option<serde_json::Value>,
}

impl NpmFetcher {
    /// Create a new npm fetcher
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: NPM_REGISTRY_URL.to_string(),
        }
    }

    /// Point the fetcher at another registry (builder pattern)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, package)
    }
}

#[async_trait]
impl ReleaseFetcher for NpmFetcher {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn fetch_releases(&self, dependency: &Dependency) -> Result<Vec<Release>, FetchError> {
        let url = self.build_url(&dependency.name);
        let response: NpmPackageResponse = self
            .client
            .get_json(&url, &dependency.name, self.registry_name())
            .await?;

        let releases = response
            .versions
            .into_iter()
            .filter_map(|(raw, meta)| {
                let version = parse_reported(&raw, dependency)?;
                let mut release = Release::new(version).with_yanked(meta.deprecated.is_some());
                if let Some(released_at) = response
                    .time
                    .get(&raw)
                    .and_then(|t| t.parse::<DateTime<Utc>>().ok())
                {
                    release = release.with_released_at(released_at);
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
    use mockito::Server;

    fn fetcher(base_url: &str) -> NpmFetcher {
        NpmFetcher::new(HttpClient::new().unwrap().with_max_retries(0)).with_base_url(base_url)
    }

    #[test]
    fn test_build_url_scoped_package() {
        let fetcher = NpmFetcher::new(HttpClient::new().unwrap());
        assert_eq!(
            fetcher.build_url("@types/node"),
            "https://registry.npmjs.org/@types/node"
        );
    }

    #[tokio::test]
    async fn test_fetch_releases() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/left-pad")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "left-pad",
                    "versions": {
                        "1.1.0": {},
                        "1.0.0": {},
                        "1.0.1": { "deprecated": "use String.prototype.padStart" },
                        "not-a-version": {}
                    },
                    "time": {
                        "created": "2014-03-14T00:00:00.000Z",
                        "1.0.0": "2014-03-14T00:00:00.000Z",
                        "1.0.1": "2015-01-01T00:00:00.000Z"
                    }
                }"#,
            )
            .create_async()
            .await;

        let dep = Dependency::new("left-pad", EcosystemId::Npm);
        let releases = fetcher(&server.url()).fetch_releases(&dep).await.unwrap();

        mock.assert_async().await;
        let versions: Vec<&str> = releases.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["1.0.0", "1.0.1", "1.1.0"]);
        assert!(releases[0].released_at.is_some());
        assert!(releases[1].yanked);
        assert!(releases[2].released_at.is_none());
    }

    #[tokio::test]
    async fn test_fetch_releases_not_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/nope")
            .with_status(404)
            .with_body(r#"{"error":"Not found"}"#)
            .create_async()
            .await;

        let dep = Dependency::new("nope", EcosystemId::Npm);
        let result = fetcher(&server.url()).fetch_releases(&dep).await;

        mock.assert_async().await;
        assert_eq!(result, Err(FetchError::package_not_found("nope", "npm")));
    }
}
