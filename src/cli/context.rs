use crate::adapters::appconfig::http_client::HttpConfigService;
use crate::cli::Cli;
use crate::config::app_config::AcsConfig;
use crate::core::errors::Result;

/// Settings shared by every command: the loaded configuration with the
/// command-line overrides applied.
pub struct Context {
    pub config: AcsConfig,
}

impl Context {
    pub fn load(args: &Cli) -> Result<Self> {
        let mut config = AcsConfig::load(args.config.as_deref())?;

        if let Some(endpoint) = &args.endpoint {
            config.service.endpoint = Some(endpoint.clone());
        }
        if let Some(token) = &args.token {
            config.service.token = Some(token.clone());
        }

        Ok(Self { config })
    }

    /// Client for the remote configuration service.
    pub fn config_service(&self) -> Result<HttpConfigService> {
        HttpConfigService::from_config(&self.config.service)
    }
}
