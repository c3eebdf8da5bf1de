use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use crate::core::errors::{RemoteOperationError, Result};
use crate::core::models::remote::{
    Application, ConfigurationProfile, Deployment, DeploymentStrategy, Environment,
    HostedConfigurationVersion, NewConfigurationVersion, Page, StartDeployment,
};
use crate::core::traits::config_service::ConfigService;

/// In-process stand-in for the remote service, used by the service tests.
///
/// List calls return pages of `page_size` items so pagination is exercised.
/// Hosted versions are keyed by `(application id, profile id)`.
pub struct InMemoryConfigService {
    pub page_size: usize,
    pub applications: Vec<Application>,
    pub profiles: Vec<ConfigurationProfile>,
    pub environments: BTreeMap<String, Vec<Environment>>,
    pub strategies: Vec<DeploymentStrategy>,
    /// State returned by `start_deployment`.
    pub deployment_state: String,
    /// Version numbers whose deletion fails.
    pub undeletable: HashSet<i64>,
    /// When set, creating a version reports this number instead of the next one.
    pub stale_create: Option<i64>,
    versions: RefCell<BTreeMap<(String, String), BTreeMap<i64, Vec<u8>>>>,
    deployments: RefCell<BTreeMap<(String, String), Vec<Deployment>>>,
    started: RefCell<Vec<StartDeployment>>,
    calls: RefCell<Vec<String>>,
}

impl Default for InMemoryConfigService {
    fn default() -> Self {
        Self {
            page_size: 2,
            applications: Vec::new(),
            profiles: Vec::new(),
            environments: BTreeMap::new(),
            strategies: Vec::new(),
            deployment_state: "COMPLETE".into(),
            undeletable: HashSet::new(),
            stale_create: None,
            versions: RefCell::new(BTreeMap::new()),
            deployments: RefCell::new(BTreeMap::new()),
            started: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl InMemoryConfigService {
    pub fn add_application(&mut self, id: &str, name: &str, description: Option<&str>) {
        self.applications.push(Application {
            id: id.into(),
            name: name.into(),
            description: description.map(str::to_string),
        });
    }

    pub fn add_profile(&mut self, application_id: &str, id: &str, name: &str) {
        self.profiles.push(ConfigurationProfile {
            application_id: application_id.into(),
            id: id.into(),
            name: name.into(),
        });
    }

    pub fn add_environment(&mut self, application_id: &str, id: &str, name: &str, state: &str) {
        self.environments
            .entry(application_id.into())
            .or_default()
            .push(Environment {
                id: id.into(),
                name: name.into(),
                state: state.into(),
            });
    }

    pub fn add_version(&self, application_id: &str, profile_id: &str, number: i64, content: &str) {
        self.versions
            .borrow_mut()
            .entry((application_id.into(), profile_id.into()))
            .or_default()
            .insert(number, content.as_bytes().to_vec());
    }

    pub fn add_deployment(&self, application_id: &str, environment_id: &str, number: i64, version: &str) {
        self.deployments
            .borrow_mut()
            .entry((application_id.into(), environment_id.into()))
            .or_default()
            .push(Deployment {
                deployment_number: number,
                configuration_version: version.into(),
                state: "COMPLETE".into(),
            });
    }

    /// Version numbers currently stored for a profile, ascending.
    pub fn version_numbers(&self, application_id: &str, profile_id: &str) -> Vec<i64> {
        self.versions
            .borrow()
            .get(&(application_id.to_string(), profile_id.to_string()))
            .map(|v| v.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn version_content(&self, application_id: &str, profile_id: &str, number: i64) -> Option<String> {
        self.versions
            .borrow()
            .get(&(application_id.to_string(), profile_id.to_string()))
            .and_then(|v| v.get(&number))
            .map(|c| String::from_utf8_lossy(c).into_owned())
    }

    pub fn deployments_of(&self, application_id: &str, environment_id: &str) -> Vec<Deployment> {
        self.deployments
            .borrow()
            .get(&(application_id.to_string(), environment_id.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Start-deployment requests received so far.
    pub fn started(&self) -> Vec<StartDeployment> {
        self.started.borrow().clone()
    }

    /// Names of the calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }

    fn page<T: Clone>(&self, items: &[T], next_token: Option<&str>) -> Page<T> {
        let start: usize = next_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(items.len());
        Page {
            items: items[start.min(end)..end].to_vec(),
            next_token: (end < items.len()).then(|| end.to_string()),
        }
    }
}

impl ConfigService for InMemoryConfigService {
    fn list_applications(&self, next_token: Option<&str>) -> Result<Page<Application>> {
        self.record("list_applications");
        Ok(self.page(&self.applications, next_token))
    }

    fn list_configuration_profiles(
        &self,
        application_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<ConfigurationProfile>> {
        self.record("list_configuration_profiles");
        let profiles: Vec<_> = self
            .profiles
            .iter()
            .filter(|p| p.application_id == application_id)
            .cloned()
            .collect();
        Ok(self.page(&profiles, next_token))
    }

    fn list_hosted_configuration_versions(
        &self,
        application_id: &str,
        profile_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<HostedConfigurationVersion>> {
        self.record("list_hosted_configuration_versions");
        // Newest first, like the real service.
        let versions: Vec<_> = self
            .version_numbers(application_id, profile_id)
            .into_iter()
            .rev()
            .map(|version_number| HostedConfigurationVersion { version_number })
            .collect();
        Ok(self.page(&versions, next_token))
    }

    fn get_hosted_configuration_version(
        &self,
        application_id: &str,
        profile_id: &str,
        version_number: i64,
    ) -> Result<Vec<u8>> {
        self.record("get_hosted_configuration_version");
        self.versions
            .borrow()
            .get(&(application_id.to_string(), profile_id.to_string()))
            .and_then(|v| v.get(&version_number))
            .cloned()
            .ok_or_else(|| {
                RemoteOperationError::Status {
                    operation: "GetHostedConfigurationVersion".into(),
                    status: 404,
                    body: format!("version {version_number} not found"),
                }
                .into()
            })
    }

    fn create_hosted_configuration_version(
        &self,
        application_id: &str,
        profile_id: &str,
        version: &NewConfigurationVersion<'_>,
    ) -> Result<HostedConfigurationVersion> {
        self.record("create_hosted_configuration_version");
        let mut versions = self.versions.borrow_mut();
        let stored = versions
            .entry((application_id.into(), profile_id.into()))
            .or_default();
        let next = stored.keys().next_back().copied().unwrap_or(0) + 1;
        stored.insert(next, version.content.to_vec());
        Ok(HostedConfigurationVersion {
            version_number: self.stale_create.unwrap_or(next),
        })
    }

    fn delete_hosted_configuration_version(
        &self,
        application_id: &str,
        profile_id: &str,
        version_number: i64,
    ) -> Result<()> {
        self.record("delete_hosted_configuration_version");
        if self.undeletable.contains(&version_number) {
            return Err(RemoteOperationError::Status {
                operation: "DeleteHostedConfigurationVersion".into(),
                status: 409,
                body: "version is deployed".into(),
            }
            .into());
        }
        if let Some(stored) = self
            .versions
            .borrow_mut()
            .get_mut(&(application_id.to_string(), profile_id.to_string()))
        {
            stored.remove(&version_number);
        }
        Ok(())
    }

    fn list_environments(
        &self,
        application_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<Environment>> {
        self.record("list_environments");
        let environments = self
            .environments
            .get(application_id)
            .cloned()
            .unwrap_or_default();
        Ok(self.page(&environments, next_token))
    }

    fn list_deployments(
        &self,
        application_id: &str,
        environment_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<Deployment>> {
        self.record("list_deployments");
        let mut deployments = self.deployments_of(application_id, environment_id);
        deployments.reverse();
        Ok(self.page(&deployments, next_token))
    }

    fn list_deployment_strategies(
        &self,
        next_token: Option<&str>,
    ) -> Result<Page<DeploymentStrategy>> {
        self.record("list_deployment_strategies");
        Ok(self.page(&self.strategies, next_token))
    }

    fn start_deployment(
        &self,
        application_id: &str,
        environment_id: &str,
        request: &StartDeployment,
    ) -> Result<Deployment> {
        self.record("start_deployment");
        self.started.borrow_mut().push(request.clone());
        let mut deployments = self.deployments.borrow_mut();
        let list = deployments
            .entry((application_id.into(), environment_id.into()))
            .or_default();
        let deployment = Deployment {
            deployment_number: list.len() as i64 + 1,
            configuration_version: request.configuration_version.clone(),
            state: self.deployment_state.clone(),
        };
        list.push(deployment.clone());
        Ok(deployment)
    }
}
