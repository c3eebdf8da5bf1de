use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::app_config::AcsConfig;
use crate::core::errors::{AcsError, RemoteOperationError, Result};
use crate::core::models::config_tree::ApplicationMap;
use crate::core::models::remote::{ConfigurationProfile, NewConfigurationVersion};
use crate::core::models::report::{SyncOutcome, SyncReport};
use crate::core::traits::config_service::{ConfigService, collect_pages};

/// Pushes configuration file contents into hosted configuration versions.
///
/// Every managed remote application must have a folder in the store, and
/// every one of its configuration profiles an environment folder. A new
/// version is stored only when the file differs from the latest one; old
/// versions beyond the retention count are deleted afterwards.
pub struct SyncService<'a, S: ConfigService> {
    pub service: &'a S,
    pub config: &'a AcsConfig,
}

impl<S: ConfigService> SyncService<'_, S> {
    pub fn sync(&self, tree: &ApplicationMap) -> Result<Vec<SyncReport>> {
        let prefix = self.config.service.application_prefix.as_str();
        let applications = collect_pages(|token| self.service.list_applications(token))?;

        let mut managed: Vec<_> = applications
            .iter()
            .filter(|a| a.name.starts_with(prefix))
            .collect();
        managed.sort_by(|a, b| a.folder_name(prefix).cmp(b.folder_name(prefix)));
        debug!(
            total = applications.len(),
            managed = managed.len(),
            "listed remote applications"
        );

        let mut reports = Vec::new();
        for application in managed {
            let folder = application.folder_name(prefix);
            let environments =
                tree.get(folder)
                    .ok_or_else(|| RemoteOperationError::UnknownApplication {
                        name: folder.to_string(),
                    })?;

            let mut profiles = collect_pages(|token| {
                self.service
                    .list_configuration_profiles(&application.id, token)
            })?;
            profiles.sort_by(|a, b| a.name.cmp(&b.name));

            for profile in &profiles {
                reports.push(self.sync_profile(profile, folder, environments)?);
            }
        }

        Ok(reports)
    }

    fn sync_profile(
        &self,
        profile: &ConfigurationProfile,
        application: &str,
        environments: &BTreeMap<String, PathBuf>,
    ) -> Result<SyncReport> {
        let file = environments.get(&profile.name).ok_or_else(|| {
            RemoteOperationError::MissingEnvironment {
                application: application.to_string(),
                environment: profile.name.clone(),
            }
        })?;

        let content = read_config_file(file)?;
        let outcome = match self.version_numbers(profile)?.first().copied() {
            None => self.create_version(profile, application, 0, &content)?,
            Some(latest) => {
                let current = self.service.get_hosted_configuration_version(
                    &profile.application_id,
                    &profile.id,
                    latest,
                )?;
                if current == content {
                    debug!(application, environment = %profile.name, version = latest, "content unchanged");
                    SyncOutcome::Unchanged { version: latest }
                } else {
                    self.create_version(profile, application, latest, &content)?
                }
            }
        };

        let removed = self.remove_old_versions(profile, application)?;

        Ok(SyncReport {
            application: application.to_string(),
            environment: profile.name.clone(),
            outcome,
            removed,
        })
    }

    /// Hosted version numbers of a profile, newest first.
    fn version_numbers(&self, profile: &ConfigurationProfile) -> Result<Vec<i64>> {
        let mut numbers: Vec<i64> = collect_pages(|token| {
            self.service.list_hosted_configuration_versions(
                &profile.application_id,
                &profile.id,
                token,
            )
        })?
        .into_iter()
        .map(|v| v.version_number)
        .collect();
        numbers.sort_unstable_by(|a, b| b.cmp(a));
        Ok(numbers)
    }

    fn create_version(
        &self,
        profile: &ConfigurationProfile,
        application: &str,
        current: i64,
        content: &[u8],
    ) -> Result<SyncOutcome> {
        let request = NewConfigurationVersion {
            content,
            content_type: &self.config.sync.content_type,
            description: version_description(application, &profile.name),
        };
        let created = self.service.create_hosted_configuration_version(
            &profile.application_id,
            &profile.id,
            &request,
        )?;

        if created.version_number <= current {
            return Err(RemoteOperationError::VersionNotCreated {
                application: application.to_string(),
                environment: profile.name.clone(),
            }
            .into());
        }

        info!(
            application,
            environment = %profile.name,
            version = created.version_number,
            "created hosted configuration version"
        );
        Ok(SyncOutcome::Created {
            version: created.version_number,
        })
    }

    /// Delete every version older than the `retain_versions` newest ones.
    fn remove_old_versions(
        &self,
        profile: &ConfigurationProfile,
        application: &str,
    ) -> Result<Vec<i64>> {
        let old: Vec<i64> = self
            .version_numbers(profile)?
            .into_iter()
            .skip(self.config.sync.retain_versions)
            .collect();

        for &version in &old {
            self.service
                .delete_hosted_configuration_version(&profile.application_id, &profile.id, version)
                .map_err(|e| RemoteOperationError::VersionNotRemoved {
                    application: application.to_string(),
                    environment: profile.name.clone(),
                    version,
                    reason: e.to_string(),
                })?;
            debug!(application, environment = %profile.name, version, "removed old version");
        }

        Ok(old)
    }
}

fn version_description(application: &str, environment: &str) -> String {
    format!(
        "Configuration that will be deployed to the `{environment}` environment \
         of the `{application}` application"
    )
}

/// Read a configuration file, naming it in the error when it is missing.
fn read_config_file(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(AcsError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read(path)?)
}
