//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: reading and writing requirements.yaml / Chart.yaml
//! - ResolveError: per-dependency version resolution failures (skipped, never fatal)
//! - RegistryError: repository index download failures (logged only)
//! - ToolError: git, gh and helm invocation failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest or chart metadata errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Version resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Repository index errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// External tool errors
    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Errors related to chart files on disk
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The chart declares no dependencies (requirements.yaml is absent)
    #[error("chart {path} has no requirements")]
    NotFound { path: PathBuf },

    /// Failed to read a chart file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a chart file
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML or JSON (de)serialization error
    #[error("failed to parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Chart metadata lacks a required field
    #[error("chart metadata {path} has no {field}")]
    MissingField { path: PathBuf, field: &'static str },

    /// Chart version is not a valid semantic version
    #[error("invalid chart version '{version}' in {path}: {message}")]
    InvalidChartVersion {
        path: PathBuf,
        version: String,
        message: String,
    },
}

/// Errors resolving the latest version of a single dependency
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A version string is not valid semver
    #[error("invalid version '{version}' for dependency {name}: {message}")]
    InvalidVersion {
        name: String,
        version: String,
        message: String,
    },

    /// No cached index exists for the repository
    #[error("no index cached for repository {repository} (expected at {path})")]
    IndexMissing { repository: String, path: PathBuf },

    /// The cached index could not be parsed
    #[error("failed to parse index {path}: {message}")]
    IndexParse { path: PathBuf, message: String },

    /// The chart is not listed in the repository index
    #[error("chart {name} not found in repository {repository}")]
    ChartNotFound { name: String, repository: String },

    /// The index lists the chart but no usable version
    #[error("no valid version of chart {name} found in repository {repository}")]
    NoVersionAvailable { name: String, repository: String },

    /// A local (file://) dependency could not be loaded
    #[error("failed to load local chart {name}: {source}")]
    LocalChart {
        name: String,
        #[source]
        source: Box<ManifestError>,
    },
}

/// Errors refreshing a repository index
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Repository URL is not usable
    #[error("invalid repository URL '{repository}': {message}")]
    InvalidUrl { repository: String, message: String },

    /// Network request failed
    #[error("failed to fetch index of {repository}: {message}")]
    NetworkError { repository: String, message: String },

    /// Timeout
    #[error("timeout while fetching index of {repository}")]
    Timeout { repository: String },

    /// The downloaded document is not a repository index
    #[error("invalid index from {repository}: {message}")]
    InvalidResponse { repository: String, message: String },

    /// Failed to store the index in the cache directory
    #[error("failed to write index cache {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from external tools (git, gh, helm)
#[derive(Error, Debug)]
pub enum ToolError {
    /// A required external binary is not installed
    #[error("{tool} is not installed or not on PATH")]
    ToolMissing { tool: String },

    /// An external command exited unsuccessfully
    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// The repository has no remote configured
    #[error("git repository has no remote '{remote}' configured")]
    NoRemote { remote: String },

    /// The remote URL cannot be turned into an authenticated push URL
    #[error("invalid git remote '{remote}': {message}")]
    InvalidRemote { remote: String, message: String },

    /// Author name or email could not be resolved
    #[error("no git author {field} given and none found in the global git config")]
    IdentityMissing { field: &'static str },

    /// Missing push credential
    #[error("{variable} environment variable not set")]
    CredentialMissing { variable: &'static str },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns true if this only signals an absent requirements file
    pub fn is_not_found(&self) -> bool {
        matches!(self, ManifestError::NotFound { .. })
    }
}

impl ResolveError {
    /// Creates a new InvalidVersion error
    pub fn invalid_version(
        name: impl Into<String>,
        version: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ResolveError::InvalidVersion {
            name: name.into(),
            version: version.into(),
            message: message.into(),
        }
    }

    /// Creates a new ChartNotFound error
    pub fn chart_not_found(name: impl Into<String>, repository: impl Into<String>) -> Self {
        ResolveError::ChartNotFound {
            name: name.into(),
            repository: repository.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new NetworkError
    pub fn network_error(repository: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::NetworkError {
            repository: repository.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(repository: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::InvalidResponse {
            repository: repository.into(),
            message: message.into(),
        }
    }
}

impl ToolError {
    /// Creates a new CommandFailed error
    pub fn command_failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        ToolError::CommandFailed {
            command: command.into(),
            stderr: stderr.into(),
        }
    }
}
