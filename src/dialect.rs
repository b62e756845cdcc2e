//! Ecosystem dialect registry
//!
//! Every ecosystem maps to one version dialect and one requirement dialect.
//! The table is built once on first use; adding an ecosystem is one row.

use crate::domain::EcosystemId;
use crate::error::DialectNotRegistered;
use crate::requirement::{
    RequirementDialect, CARGO, COMPOSER, CONDA, ELM, GEMSPEC, HEX, MAVEN_RANGE, NPM, NUGET_RANGE,
    PEP508, PINNED, TERRAFORM, TOOLCHAIN_PIN,
};
use crate::version::VersionDialect;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The version and requirement syntax of one ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub version: &'static VersionDialect,
    pub requirement: &'static RequirementDialect,
}

impl Dialect {
    fn of(requirement: &'static RequirementDialect) -> Self {
        Self {
            version: requirement.version,
            requirement,
        }
    }

    /// Look up the dialect registered for an ecosystem
    pub fn registered(id: EcosystemId) -> Result<Dialect, DialectNotRegistered> {
        REGISTRY
            .get(&id)
            .copied()
            .ok_or_else(|| DialectNotRegistered(id.name().to_string()))
    }

    /// Look up a dialect by ecosystem name
    pub fn for_name(name: &str) -> Result<Dialect, DialectNotRegistered> {
        Self::registered(name.parse()?)
    }
}

static REGISTRY: LazyLock<HashMap<EcosystemId, Dialect>> = LazyLock::new(|| {
    HashMap::from([
        (EcosystemId::Npm, Dialect::of(&NPM)),
        (EcosystemId::Bun, Dialect::of(&NPM)),
        (EcosystemId::Cargo, Dialect::of(&CARGO)),
        (EcosystemId::Composer, Dialect::of(&COMPOSER)),
        (EcosystemId::Bundler, Dialect::of(&GEMSPEC)),
        (EcosystemId::CrystalShards, Dialect::of(&GEMSPEC)),
        (EcosystemId::Pip, Dialect::of(&PEP508)),
        (EcosystemId::Uv, Dialect::of(&PEP508)),
        (EcosystemId::Conda, Dialect::of(&CONDA)),
        (EcosystemId::GoModules, Dialect::of(&PINNED)),
        (EcosystemId::Maven, Dialect::of(&MAVEN_RANGE)),
        (EcosystemId::Gradle, Dialect::of(&MAVEN_RANGE)),
        (EcosystemId::Nuget, Dialect::of(&NUGET_RANGE)),
        (EcosystemId::Hex, Dialect::of(&HEX)),
        (EcosystemId::Elm, Dialect::of(&ELM)),
        (EcosystemId::Terraform, Dialect::of(&TERRAFORM)),
        (EcosystemId::RustToolchain, Dialect::of(&TOOLCHAIN_PIN)),
        (EcosystemId::GithubActions, Dialect::of(&PINNED)),
        (EcosystemId::PreCommit, Dialect::of(&PINNED)),
    ])
});

impl EcosystemId {
    /// The dialect for this ecosystem
    ///
    /// # Panics
    ///
    /// Panics if the ecosystem has no row in the dialect table, which is a
    /// programming error rather than bad input.
    pub fn dialect(&self) -> Dialect {
        match Dialect::registered(*self) {
            Ok(dialect) => dialect,
            Err(e) => panic!("{e}"),
        }
    }
}
