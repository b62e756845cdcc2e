//! Release fetchers
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm Registry fetcher
//! - PyPI JSON API fetcher
//! - crates.io API fetcher
//! - RubyGems API fetcher
//! - A fetcher reading releases from a local JSON file

mod client;
mod crates_io;
mod file;
mod npm;
mod pypi;
mod rubygems;

pub use client::HttpClient;
pub use crates_io::CratesIoFetcher;
pub use file::ReleaseFileFetcher;
pub use npm::NpmFetcher;
pub use pypi::PyPIFetcher;
pub use rubygems::RubyGemsFetcher;

use crate::domain::{Dependency, EcosystemId, Release};
use crate::error::FetchError;
use crate::version::Version;
use async_trait::async_trait;
use tracing::debug;

/// Trait for release sources
#[async_trait]
pub trait ReleaseFetcher: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch every known release of a dependency
    async fn fetch_releases(&self, dependency: &Dependency) -> Result<Vec<Release>, FetchError>;
}

/// Create a registry fetcher for the given ecosystem
pub fn create_fetcher(
    ecosystem: EcosystemId,
    client: HttpClient,
) -> Result<Box<dyn ReleaseFetcher>, FetchError> {
    match ecosystem {
        EcosystemId::Npm | EcosystemId::Bun => Ok(Box::new(NpmFetcher::new(client))),
        EcosystemId::Pip | EcosystemId::Uv => Ok(Box::new(PyPIFetcher::new(client))),
        EcosystemId::Cargo => Ok(Box::new(CratesIoFetcher::new(client))),
        EcosystemId::Bundler => Ok(Box::new(RubyGemsFetcher::new(client))),
        other => Err(FetchError::UnsupportedEcosystem {
            ecosystem: other.name().to_string(),
        }),
    }
}

/// Parse a version reported by a registry, discarding entries that are not
/// valid in the dependency's dialect
fn parse_reported(raw: &str, dependency: &Dependency) -> Option<Version> {
    let dialect = dependency.ecosystem.dialect().version;
    if !Version::is_correct(raw, dialect) {
        debug!(dependency = %dependency.name, version = raw, "skipping unrecognised version");
        return None;
    }
    Version::parse(raw, dialect).ok()
}

/// Deterministic order for fetched releases
fn sorted(mut releases: Vec<Release>) -> Vec<Release> {
    releases.sort_by(|a, b| a.version.cmp(&b.version));
    releases
}
