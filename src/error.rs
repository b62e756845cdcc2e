//! Application error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: Malformed version strings
//! - RequirementError: Malformed or unsupported requirement expressions
//! - FetchError: Issues with release fetchers and package registries
//! - DialectNotRegistered: Ecosystem names with no dialect table entry
//! - CheckError: Update queries that cannot produce an answer
//! - ConfigError: Issues with CLI options and configuration files

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Version parsing errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Requirement parsing errors
    #[error(transparent)]
    Requirement(#[from] RequirementError),

    /// Release fetcher errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Unknown ecosystem
    #[error(transparent)]
    Dialect(#[from] DialectNotRegistered),

    /// Update query errors
    #[error(transparent)]
    Check(#[from] CheckError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while parsing a version string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The text is not a valid version in the requested dialect
    #[error("malformed version '{0}'")]
    Malformed(String),
}

/// Errors raised while parsing a requirement expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequirementError {
    /// The requirement text could not be parsed
    #[error("malformed requirement '{0}'")]
    Malformed(String),

    /// The requirement uses an operator the dialect does not know
    #[error("unsupported operator '{operator}' in requirement '{raw}'")]
    UnsupportedOperator { operator: String, raw: String },
}

/// Errors related to fetching releases
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// No fetcher exists for the ecosystem
    #[error("no release fetcher available for {ecosystem}")]
    UnsupportedEcosystem { ecosystem: String },

    /// A local release file could not be read or decoded
    #[error("failed to read releases from {path}: {message}")]
    ReleaseFile { path: PathBuf, message: String },
}

/// Raised when looking up a dialect for an ecosystem name that has none
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no dialect registered for ecosystem '{0}'")]
pub struct DialectNotRegistered(pub String);

/// Errors raised by update queries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// Every candidate release was removed by an ignore rule
    #[error("all versions of '{dependency}' are ignored")]
    AllVersionsIgnored { dependency: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid duration format
    #[error("invalid duration format '{value}': expected format like '2w', '10d', '1m'")]
    InvalidDuration { value: String },

    /// Failed to read the configuration file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this tool
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// An update type other than major, minor or patch
    #[error("invalid update type '{value}': expected 'version-update:semver-major', '-minor' or '-patch'")]
    InvalidUpdateType { value: String },

    /// An invalid name pattern
    #[error("invalid name pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// An ignore rule, advisory range or requirement that failed to parse
    #[error("invalid {context}: {source}")]
    InvalidRequirement {
        context: String,
        #[source]
        source: RequirementError,
    },

    /// A version given on the command line that failed to parse
    #[error("invalid {context}: {source}")]
    InvalidVersion {
        context: String,
        #[source]
        source: VersionError,
    },
}

impl VersionError {
    /// Creates a new Malformed error
    pub fn malformed(raw: impl Into<String>) -> Self {
        VersionError::Malformed(raw.into())
    }
}

impl RequirementError {
    /// Creates a new Malformed error
    pub fn malformed(raw: impl Into<String>) -> Self {
        RequirementError::Malformed(raw.into())
    }

    /// Creates a new UnsupportedOperator error
    pub fn unsupported_operator(operator: impl Into<String>, raw: impl Into<String>) -> Self {
        RequirementError::UnsupportedOperator {
            operator: operator.into(),
            raw: raw.into(),
        }
    }
}

impl FetchError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        FetchError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FetchError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FetchError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        FetchError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        FetchError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new ReleaseFile error
    pub fn release_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        FetchError::ReleaseFile {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidRequirement error
    pub fn invalid_requirement(context: impl Into<String>, source: RequirementError) -> Self {
        ConfigError::InvalidRequirement {
            context: context.into(),
            source,
        }
    }

    /// Creates a new InvalidVersion error
    pub fn invalid_version(context: impl Into<String>, source: VersionError) -> Self {
        ConfigError::InvalidVersion {
            context: context.into(),
            source,
        }
    }
}
