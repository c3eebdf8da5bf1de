use serde::{Deserialize, Serialize};

/// State an environment must be in before a deployment may start.
pub const READY_FOR_DEPLOYMENT: &str = "ReadyForDeployment";

/// Terminal success state of a deployment.
pub const DEPLOYMENT_COMPLETE: &str = "COMPLETE";

/// One page of a paginated list call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// A remote application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Application {
    /// Name of the configuration store folder this application is fed from.
    ///
    /// The description holds the folder name; applications created without
    /// one fall back to their name minus the managed prefix.
    pub fn folder_name<'a>(&'a self, prefix: &str) -> &'a str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => self.name.strip_prefix(prefix).unwrap_or(&self.name),
        }
    }
}

/// A configuration profile. Its name is the environment it feeds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigurationProfile {
    pub application_id: String,
    pub id: String,
    pub name: String,
}

/// Summary of an immutable hosted configuration version.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedConfigurationVersion {
    pub version_number: i64,
}

/// Content to store as a new hosted configuration version.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConfigurationVersion<'a> {
    pub content: &'a [u8],
    pub content_type: &'a str,
    pub description: String,
}

/// A deployment target environment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    pub id: String,
    pub name: String,
    pub state: String,
}

impl Environment {
    pub fn is_ready(&self) -> bool {
        self.state == READY_FOR_DEPLOYMENT
    }
}

/// A past or running deployment of a configuration version.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Deployment {
    pub deployment_number: i64,
    /// The service reports versions as strings.
    pub configuration_version: String,
    pub state: String,
}

impl Deployment {
    /// Deployed version as a number; `None` for non-numeric (non-hosted) versions.
    pub fn version_number(&self) -> Option<i64> {
        self.configuration_version.parse().ok()
    }

    pub fn is_complete(&self) -> bool {
        self.state == DEPLOYMENT_COMPLETE
    }
}

/// Policy governing how a version is rolled out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentStrategy {
    pub id: String,
    pub name: String,
}

/// Body of a start-deployment request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartDeployment {
    pub deployment_strategy_id: String,
    pub configuration_profile_id: String,
    pub configuration_version: String,
    pub description: String,
}
