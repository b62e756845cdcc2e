//! RubyGems Registry fetcher
//!
//! Fetches gem releases from the RubyGems registry.
//! API endpoint: https://rubygems.org/api/v1/versions/{gem}.json
//!
//! Platform-specific builds of one version are collapsed into a single
//! release carrying the earliest build date.

use super::{parse_reported, sorted};
use crate::domain::{Dependency, Release};
use crate::error::FetchError;
use crate::registry::{HttpClient, ReleaseFetcher};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// RubyGems registry base URL
const RUBYGEMS_API_URL: &str = "https://rubygems.org/api/v1/versions";

/// RubyGems Registry fetcher
pub struct RubyGemsFetcher {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GemVersion {
    number: String,
    created_at: Option<String>,
}

impl RubyGemsFetcher {
    /// Create a new RubyGems fetcher
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: RUBYGEMS_API_URL.to_string(),
        }
    }

    /// Point the fetcher at another gem server (builder pattern)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Build the URL for a gem
    fn build_url(&self, gem: &str) -> String {
        format!("{}/{}.json", self.base_url, gem)
    }
}

#[async_trait]
impl ReleaseFetcher for RubyGemsFetcher {
    fn registry_name(&self) -> &'static str {
        "rubygems"
    }

    async fn fetch_releases(&self, dependency: &Dependency) -> Result<Vec<Release>, FetchError> {
        let url = self.build_url(&dependency.name);
        let response: Vec<GemVersion> = self
            .client
            .get_json(&url, &dependency.name, self.registry_name())
            .await?;

        let mut by_number: HashMap<String, Option<DateTime<Utc>>> = HashMap::new();
        for gem in response {
            let created_at = gem
                .created_at
                .as_deref()
                .and_then(|t| t.parse::<DateTime<Utc>>().ok());
            by_number
                .entry(gem.number)
                .and_modify(|earliest| {
                    *earliest = match (*earliest, created_at) {
                        (Some(a), Some(b)) => Some(a.min(b)),
                        (a, b) => a.or(b),
                    }
                })
                .or_insert(created_at);
        }

        let releases = by_number
            .into_iter()
            .filter_map(|(number, created_at)| {
                let release = Release::new(parse_reported(&number, dependency)?);
                Some(match created_at {
                    Some(at) => release.with_released_at(at),
                    None => release,
                })
            })
            .collect();

        Ok(sorted(releases))
    }
}
