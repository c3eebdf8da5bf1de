use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::app_config::AcsConfig;
use crate::core::errors::{RemoteOperationError, Result};
use crate::core::models::remote::{
    Application, ConfigurationProfile, Environment, StartDeployment,
};
use crate::core::models::report::{DeployOutcome, DeployReport};
use crate::core::traits::config_service::{ConfigService, collect_pages};

/// Rolls the latest hosted version of every managed profile out to the
/// environment of the same name, when it is not deployed there yet.
pub struct DeployService<'a, S: ConfigService> {
    pub service: &'a S,
    pub config: &'a AcsConfig,
}

impl<S: ConfigService> DeployService<'_, S> {
    /// Deploy every managed application, or only those whose folder name is
    /// in `only` when given.
    pub fn deploy(&self, only: Option<&BTreeSet<String>>) -> Result<Vec<DeployReport>> {
        let strategy_id = self.deployment_strategy_id()?;
        let prefix = self.config.service.application_prefix.as_str();

        let applications = collect_pages(|token| self.service.list_applications(token))?;
        let mut managed: Vec<&Application> = applications
            .iter()
            .filter(|a| a.name.starts_with(prefix))
            .filter(|a| only.is_none_or(|names| names.contains(a.folder_name(prefix))))
            .collect();
        managed.sort_by(|a, b| a.folder_name(prefix).cmp(b.folder_name(prefix)));

        let mut reports = Vec::new();
        for application in managed {
            let name = application.folder_name(prefix);
            let environments =
                collect_pages(|token| self.service.list_environments(&application.id, token))?;
            let mut profiles = collect_pages(|token| {
                self.service
                    .list_configuration_profiles(&application.id, token)
            })?;
            profiles.sort_by(|a, b| a.name.cmp(&b.name));

            for profile in &profiles {
                let environment = ready_environment(&environments, profile, name)?;
                reports.push(self.deploy_profile(&strategy_id, profile, environment, name)?);
            }
        }

        Ok(reports)
    }

    fn deployment_strategy_id(&self) -> Result<String> {
        let prefix = &self.config.service.deployment_strategy_prefix;
        let strategies =
            collect_pages(|token| self.service.list_deployment_strategies(token))?;

        strategies
            .into_iter()
            .find(|s| s.name.starts_with(prefix.as_str()))
            .map(|s| {
                debug!(strategy = %s.name, "using deployment strategy");
                s.id
            })
            .ok_or_else(|| {
                RemoteOperationError::DeploymentStrategyMissing {
                    prefix: prefix.clone(),
                }
                .into()
            })
    }

    fn deploy_profile(
        &self,
        strategy_id: &str,
        profile: &ConfigurationProfile,
        environment: &Environment,
        application: &str,
    ) -> Result<DeployReport> {
        let report = |outcome: DeployOutcome| DeployReport {
            application: application.to_string(),
            environment: environment.name.clone(),
            outcome,
        };

        let latest = collect_pages(|token| {
            self.service.list_hosted_configuration_versions(
                &profile.application_id,
                &profile.id,
                token,
            )
        })?
        .into_iter()
        .map(|v| v.version_number)
        .max();
        let Some(latest) = latest else {
            debug!(application, environment = %environment.name, "no hosted version to deploy");
            return Ok(report(DeployOutcome::NoVersion));
        };

        let deployed = collect_pages(|token| {
            self.service
                .list_deployments(&profile.application_id, &environment.id, token)
        })?
        .into_iter()
        .max_by_key(|d| d.deployment_number)
        .and_then(|d| d.version_number());

        if deployed.is_some_and(|version| version >= latest) {
            debug!(application, environment = %environment.name, version = latest, "already deployed");
            return Ok(report(DeployOutcome::UpToDate { version: latest }));
        }

        let request = StartDeployment {
            deployment_strategy_id: strategy_id.to_string(),
            configuration_profile_id: profile.id.clone(),
            configuration_version: latest.to_string(),
            description: format!(
                "Version {latest} of the `{application}` application configuration"
            ),
        };
        let deployment = self.service.start_deployment(
            &profile.application_id,
            &environment.id,
            &request,
        )?;

        if !deployment.is_complete() {
            return Err(RemoteOperationError::DeploymentFailed {
                application: application.to_string(),
                environment: environment.name.clone(),
                version: latest,
                state: deployment.state,
            }
            .into());
        }

        info!(application, environment = %environment.name, version = latest, "deployed");
        Ok(report(DeployOutcome::Deployed { version: latest }))
    }
}

/// The environment a profile deploys to: same name, ready for deployment.
fn ready_environment<'e>(
    environments: &'e [Environment],
    profile: &ConfigurationProfile,
    application: &str,
) -> Result<&'e Environment> {
    let environment = environments
        .iter()
        .find(|e| e.name == profile.name)
        .ok_or_else(|| RemoteOperationError::EnvironmentMissing {
            application: application.to_string(),
            environment: profile.name.clone(),
        })?;

    if !environment.is_ready() {
        return Err(RemoteOperationError::EnvironmentNotReady {
            application: application.to_string(),
            environment: environment.name.clone(),
            state: environment.state.clone(),
        }
        .into());
    }

    Ok(environment)
}
