use std::path::PathBuf;

/// Violations of the `root/<application>/<environment>/<file>` layout.
///
/// Every variant carries the folder that broke the rule so the message
/// points straight at what needs fixing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("configuration folder `{}` does not have any applications defined", .0.display())]
    NoApplications(PathBuf),

    #[error(
        "application folder `{}` should only contain folders, one for each environment",
        .0.display()
    )]
    NonFolderInApplication(PathBuf),

    #[error(
        "application folder `{}` does not have any environments defined, maybe delete this folder",
        .0.display()
    )]
    NoEnvironments(PathBuf),

    #[error("environment folder `{}` should contain a configuration file", .0.display())]
    MissingConfigurationFile(PathBuf),

    #[error(
        "environment folder `{}` should contain only a single configuration file",
        .0.display()
    )]
    NotASingleConfigurationFile(PathBuf),
}

impl StructureError {
    /// The folder the violation was found in.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NoApplications(p)
            | Self::NonFolderInApplication(p)
            | Self::NoEnvironments(p)
            | Self::MissingConfigurationFile(p)
            | Self::NotASingleConfigurationFile(p) => p,
        }
    }
}

/// An application or environment folder name that breaks the naming rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "invalid name: `{name}`, only alphanumeric values with underscores and dashes are allowed, \
     starting with an alphanumeric, and a maximum of {max_len} characters"
)]
pub struct NameError {
    pub name: String,
    pub max_len: usize,
}

/// Preconditions of the grouping step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("the configuration file list cannot be empty")]
    EmptyFileList,

    /// Two folders collapse to the same template identifier once `_` and
    /// `-` are stripped.
    #[error(
        "`{first}` and `{second}` both map to the template identifier `{identifier}`\n\n  \
         Rename one of the folders so the identifiers differ."
    )]
    DuplicateIdentifier {
        identifier: String,
        first: String,
        second: String,
    },
}

/// Failures reported by (or about) the remote configuration service.
#[derive(Debug, thiserror::Error)]
pub enum RemoteOperationError {
    #[error("{operation} failed with status {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("{operation} failed: {reason}")]
    Transport { operation: String, reason: String },

    #[error(
        "unable to create new configuration version, the `{application}` application, \
         the `{environment}` environment"
    )]
    VersionNotCreated {
        application: String,
        environment: String,
    },

    #[error(
        "unable to remove old configuration version, the `{application}` application, \
         the `{environment}` environment, version: {version} ({reason})"
    )]
    VersionNotRemoved {
        application: String,
        environment: String,
        version: i64,
        reason: String,
    },

    #[error("the deployment strategy starting with `{prefix}` is missing")]
    DeploymentStrategyMissing { prefix: String },

    #[error(
        "configuration profile `{environment}` for application `{application}` \
         does not have a corresponding environment"
    )]
    EnvironmentMissing {
        application: String,
        environment: String,
    },

    #[error(
        "the `{environment}` environment from the `{application}` application is not ready \
         for deployment (state: {state})"
    )]
    EnvironmentNotReady {
        application: String,
        environment: String,
        state: String,
    },

    #[error(
        "failure deploying version {version} to the `{environment}` environment for the \
         `{application}` application (state: {state})"
    )]
    DeploymentFailed {
        application: String,
        environment: String,
        version: i64,
        state: String,
    },

    #[error(
        "remote application `{name}` has no folder in the configuration store\n\n  \
         Either add the folder or remove the application from the service."
    )]
    UnknownApplication { name: String },

    #[error(
        "configuration profile `{environment}` of the `{application}` application has no \
         environment folder in the configuration store"
    )]
    MissingEnvironment {
        application: String,
        environment: String,
    },
}

/// All domain errors for acs.
#[derive(Debug, thiserror::Error)]
pub enum AcsError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteOperationError),

    #[error(
        "Path not found: {}\n\n  \
         Check that the path is correct and exists.",
        .path.display()
    )]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Template error: {detail}")]
    Template { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AcsError>;
