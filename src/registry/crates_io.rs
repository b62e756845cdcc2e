//! crates.io API fetcher
//!
//! Fetches crate releases from crates.io.
//! API endpoint: https://crates.io/api/v1/crates/{crate}
//!
//! Note: crates.io requires a User-Agent header (handled by HttpClient)
//! and has rate limiting (1 request/second).

use super::{parse_reported, sorted};
use crate::domain::{Dependency, Release};
use crate::error::FetchError;
use crate::registry::{HttpClient, ReleaseFetcher};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// crates.io API base URL
const CRATES_IO_API_URL: &str = "https://crates.io/api/v1/crates";

/// Rate limit: 1 request per second
const RATE_LIMIT_INTERVAL: Duration = Duration::from_secs(1);

/// crates.io fetcher with rate limiting
pub struct CratesIoFetcher {
    client: HttpClient,
    base_url: String,
    last_request: Mutex<Option<Instant>>,
}

/// crates.io crate response
#[derive(Debug, Deserialize)]
struct CratesIoResponse {
    versions: Vec<CrateVersion>,
}

/// Crate version information
#[derive(Debug, Deserialize)]
struct CrateVersion {
    /// Version number
    num: String,
    created_at: String,
    yanked: bool,
}

impl CratesIoFetcher {
    /// Create a new crates.io fetcher
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: CRATES_IO_API_URL.to_string(),
            last_request: Mutex::new(None),
        }
    }

    /// Point the fetcher at another API root (builder pattern)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Build the URL for a crate
    fn build_url(&self, crate_name: &str) -> String {
        format!("{}/{}", self.base_url, crate_name)
    }

    /// Wait until one interval has passed since the previous request
    async fn apply_rate_limit(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(elapsed) = last_request.map(|t| t.elapsed()) {
            if elapsed < RATE_LIMIT_INTERVAL {
                tokio::time::sleep(RATE_LIMIT_INTERVAL - elapsed).await;
            }
        }
        *last_request = Some(Instant::now());
    }
}

#[async_trait]
impl ReleaseFetcher for CratesIoFetcher {
    fn registry_name(&self) -> &'static str {
        "crates.io"
    }

    async fn fetch_releases(&self, dependency: &Dependency) -> Result<Vec<Release>, FetchError> {
        self.apply_rate_limit().await;

        let url = self.build_url(&dependency.name);
        let response: CratesIoResponse = self
            .client
            .get_json(&url, &dependency.name, self.registry_name())
            .await?;

        let releases = response
            .versions
            .into_iter()
            .filter_map(|v| {
                let version = parse_reported(&v.num, dependency)?;
                let mut release = Release::new(version).with_yanked(v.yanked);
                if let Ok(released_at) = v.created_at.parse::<DateTime<Utc>>() {
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

    #[test]
    fn test_build_url() {
        let fetcher = CratesIoFetcher::new(HttpClient::new().unwrap());
        assert_eq!(
            fetcher.build_url("serde"),
            "https://crates.io/api/v1/crates/serde"
        );
    }

    #[tokio::test]
    async fn test_fetch_releases_keeps_yanked_flag() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/serde")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "versions": [
                        { "num": "1.0.200", "created_at": "2024-05-01T10:00:00.000000+00:00", "yanked": false },
                        { "num": "1.0.199", "created_at": "2024-04-20T10:00:00.000000+00:00", "yanked": true }
                    ]
                }"#,
            )
            .create_async()
            .await;

        let fetcher = CratesIoFetcher::new(HttpClient::new().unwrap()).with_base_url(&server.url());
        let dep = Dependency::new("serde", EcosystemId::Cargo);
        let releases = fetcher.fetch_releases(&dep).await.unwrap();

        mock.assert_async().await;
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].version.as_str(), "1.0.199");
        assert!(releases[0].yanked);
        assert!(releases[1].released_at.is_some());
    }

    #[tokio::test]
    async fn test_rate_limit_spaces_requests() {
        let fetcher = CratesIoFetcher::new(HttpClient::new().unwrap());
        let start = Instant::now();
        fetcher.apply_rate_limit().await;
        fetcher.apply_rate_limit().await;
        assert!(start.elapsed() >= RATE_LIMIT_INTERVAL);
    }
}
