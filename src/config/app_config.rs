use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::errors::{AcsError, Result};

/// Project-level configuration file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "acs.toml";

/// Largest page the service accepts for list calls.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Top-level acs configuration.
///
/// Every section is optional; missing values fall back to the defaults the
/// deployment template and the pipelines were written against.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcsConfig {
    pub service: ServiceSection,
    pub sync: SyncSection,
    pub template: TemplateSection,
}

impl AcsConfig {
    /// Load the configuration.
    ///
    /// Lookup order: `explicit` (must exist), `./acs.toml`, then
    /// `<config dir>/acs/config.toml`. Without any file the defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(AcsError::InvalidConfig {
                    detail: format!("config file {} not found", path.display()),
                });
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        let config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content).map_err(|e| AcsError::InvalidConfig {
                    detail: format!("Failed to parse {}: {e}", path.display()),
                })?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    fn discover() -> Option<PathBuf> {
        let project = PathBuf::from(PROJECT_CONFIG_FILE);
        if project.is_file() {
            return Some(project);
        }
        dirs::config_dir()
            .map(|dir| dir.join("acs").join("config.toml"))
            .filter(|p| p.is_file())
    }

    /// Reject values the sync and deploy flows cannot work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |detail: &str| {
            Err(AcsError::InvalidConfig {
                detail: detail.to_string(),
            })
        };

        if self.service.page_size == 0 || self.service.page_size > MAX_PAGE_SIZE {
            return invalid("service.page_size must be between 1 and 50");
        }
        if self.service.timeout_secs == 0 {
            return invalid("service.timeout_secs must be greater than 0");
        }
        if self.service.application_prefix.is_empty() {
            return invalid("service.application_prefix cannot be empty");
        }
        if self.service.deployment_strategy_prefix.is_empty() {
            return invalid("service.deployment_strategy_prefix cannot be empty");
        }
        if self.sync.retain_versions == 0 {
            return invalid("sync.retain_versions must keep at least 1 version");
        }
        if self.sync.content_type.trim().is_empty() {
            return invalid("sync.content_type cannot be empty");
        }
        validate_simple_filename(&self.template.output_file)
    }
}

/// Reject file names that would escape the output folder.
fn validate_simple_filename(name: &str) -> Result<()> {
    let is_simple = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some();

    if is_simple {
        Ok(())
    } else {
        Err(AcsError::InvalidConfig {
            detail: format!("template.output_file '{name}' must be a plain file name"),
        })
    }
}

/// The `[service]` section: where and how to reach the remote service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceSection {
    /// Base URL of the configuration service API.
    pub endpoint: Option<String>,
    /// Bearer token sent with every request (optional).
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub page_size: u32,
    /// Only remote applications whose name starts with this are managed.
    pub application_prefix: String,
    /// Deployments use the first strategy whose name starts with this.
    pub deployment_strategy_prefix: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            timeout_secs: 30,
            page_size: MAX_PAGE_SIZE,
            application_prefix: "acs/".into(),
            deployment_strategy_prefix: "acs-".into(),
        }
    }
}

/// The `[sync]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSection {
    /// Content type stored with every new hosted version.
    pub content_type: String,
    /// Number of most recent hosted versions kept per profile.
    pub retain_versions: usize,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            content_type: "text/plain".into(),
            retain_versions: 2,
        }
    }
}

/// The `[template]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateSection {
    /// Handlebars template used instead of the built-in one.
    pub path: Option<PathBuf>,
    pub output_file: String,
}

impl Default for TemplateSection {
    fn default() -> Self {
        Self {
            path: None,
            output_file: "template.yaml".into(),
        }
    }
}
