//! Ecosystem identifiers for supported package managers

use crate::error::DialectNotRegistered;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported package ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcosystemId {
    /// npm registry (package.json)
    Npm,
    /// Bun (package.json, npm registry)
    Bun,
    /// Cargo (Cargo.toml)
    Cargo,
    /// Composer (composer.json)
    Composer,
    /// Bundler (Gemfile)
    Bundler,
    /// Crystal shards (shard.yml)
    CrystalShards,
    /// pip (requirements.txt, pyproject.toml)
    Pip,
    /// uv (pyproject.toml)
    Uv,
    /// Conda (environment.yml)
    Conda,
    /// Go modules (go.mod)
    GoModules,
    /// Maven (pom.xml)
    Maven,
    /// Gradle (build.gradle)
    Gradle,
    /// NuGet (*.csproj)
    Nuget,
    /// Hex (mix.exs)
    Hex,
    /// Elm (elm.json)
    Elm,
    /// Terraform providers and modules
    Terraform,
    /// rust-toolchain.toml
    RustToolchain,
    /// GitHub Actions workflow refs
    GithubActions,
    /// pre-commit hook revs
    PreCommit,
}

impl EcosystemId {
    /// Returns the identifier as written in configuration and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            EcosystemId::Npm => "npm",
            EcosystemId::Bun => "bun",
            EcosystemId::Cargo => "cargo",
            EcosystemId::Composer => "composer",
            EcosystemId::Bundler => "bundler",
            EcosystemId::CrystalShards => "crystal_shards",
            EcosystemId::Pip => "pip",
            EcosystemId::Uv => "uv",
            EcosystemId::Conda => "conda",
            EcosystemId::GoModules => "go_modules",
            EcosystemId::Maven => "maven",
            EcosystemId::Gradle => "gradle",
            EcosystemId::Nuget => "nuget",
            EcosystemId::Hex => "hex",
            EcosystemId::Elm => "elm",
            EcosystemId::Terraform => "terraform",
            EcosystemId::RustToolchain => "rust_toolchain",
            EcosystemId::GithubActions => "github_actions",
            EcosystemId::PreCommit => "pre_commit",
        }
    }

    /// Returns all supported ecosystems
    pub fn all() -> &'static [EcosystemId] {
        &[
            EcosystemId::Npm,
            EcosystemId::Bun,
            EcosystemId::Cargo,
            EcosystemId::Composer,
            EcosystemId::Bundler,
            EcosystemId::CrystalShards,
            EcosystemId::Pip,
            EcosystemId::Uv,
            EcosystemId::Conda,
            EcosystemId::GoModules,
            EcosystemId::Maven,
            EcosystemId::Gradle,
            EcosystemId::Nuget,
            EcosystemId::Hex,
            EcosystemId::Elm,
            EcosystemId::Terraform,
            EcosystemId::RustToolchain,
            EcosystemId::GithubActions,
            EcosystemId::PreCommit,
        ]
    }

    /// Whether dependencies of this ecosystem are usually pinned to git refs
    pub fn is_git_based(&self) -> bool {
        matches!(
            self,
            EcosystemId::GithubActions | EcosystemId::PreCommit | EcosystemId::GoModules
        )
    }
}

impl fmt::Display for EcosystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EcosystemId {
    type Err = DialectNotRegistered;

    /// Accepts the snake_case name, and the kebab-case spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        EcosystemId::all()
            .iter()
            .copied()
            .find(|id| id.name() == normalized)
            .ok_or_else(|| DialectNotRegistered(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for id in EcosystemId::all() {
            assert_eq!(id.name().parse::<EcosystemId>(), Ok(*id));
        }
    }

    #[test]
    fn test_from_str_accepts_kebab_case() {
        assert_eq!(
            "github-actions".parse::<EcosystemId>(),
            Ok(EcosystemId::GithubActions)
        );
        assert_eq!("Cargo".parse::<EcosystemId>(), Ok(EcosystemId::Cargo));
    }

    #[test]
    fn test_from_str_unknown() {
        assert_eq!(
            "cobol".parse::<EcosystemId>(),
            Err(DialectNotRegistered("cobol".to_string()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EcosystemId::CrystalShards), "crystal_shards");
        assert_eq!(format!("{}", EcosystemId::Npm), "npm");
    }

    #[test]
    fn test_serde_serialization() {
        let json = serde_json::to_string(&EcosystemId::RustToolchain).unwrap();
        assert_eq!(json, "\"rust_toolchain\"");

        let id: EcosystemId = serde_json::from_str("\"go_modules\"").unwrap();
        assert_eq!(id, EcosystemId::GoModules);
    }

    #[test]
    fn test_git_based() {
        assert!(EcosystemId::GithubActions.is_git_based());
        assert!(!EcosystemId::Npm.is_git_based());
    }
}
