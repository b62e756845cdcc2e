//! Core domain models for uptick
//!
//! This module contains the fundamental types the engine works on:
//! - Ecosystem identifiers that select a dialect
//! - Dependencies and the requirements their manifests declare
//! - Release records reported by fetchers
//! - Security advisories

mod advisory;
mod dependency;
mod ecosystem;
mod release;

pub use advisory::{is_vulnerable, SecurityAdvisory};
pub use dependency::{
    Dependency, ManifestRequirement, MalformedRequirementPolicy, RequirementSource, SourceKind,
};
pub use ecosystem::EcosystemId;
pub use release::Release;
