//! uptick - release selection engine
//!
//! This library decides which released version of a dependency to offer:
//! - Version and requirement dialects for npm, Cargo, PEP 440, RubyGems,
//!   Maven, NuGet, Hex, Go modules, Rust toolchains and more
//! - A filter pipeline over fetched releases (yanked, prerelease, ignore
//!   rules, advisories, cooldown, requirement ranges)
//! - The latest, latest-without-unlock and lowest security fix queries
//! - Requirement rewriting for the chosen release
//! - Release fetchers for npm, PyPI, crates.io, RubyGems and local files

pub mod cli;
pub mod config;
pub mod cooldown;
pub mod dialect;
pub mod domain;
pub mod error;
pub mod output;
pub mod progress;
pub mod registry;
pub mod requirement;
pub mod update;
pub mod version;
