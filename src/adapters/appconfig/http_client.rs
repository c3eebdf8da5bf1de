use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::app_config::ServiceSection;
use crate::core::errors::{AcsError, RemoteOperationError, Result};
use crate::core::models::remote::{
    Application, ConfigurationProfile, Deployment, DeploymentStrategy, Environment,
    HostedConfigurationVersion, NewConfigurationVersion, Page, StartDeployment,
};
use crate::core::traits::config_service::ConfigService;

/// Header carrying the number of a hosted configuration version.
const VERSION_NUMBER_HEADER: &str = "Version-Number";

/// Header carrying the description of a new hosted configuration version.
const DESCRIPTION_HEADER: &str = "Description";

/// Blocking client for an AppConfig-compatible REST API.
///
/// Requests run one at a time on a private current-thread runtime. Request
/// signing is left to whatever sits at `endpoint` (a gateway or proxy); an
/// optional bearer token is sent with every call.
pub struct HttpConfigService {
    base: Url,
    token: Option<String>,
    page_size: u32,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

/// Status-checked response of one call.
struct Reply {
    headers: HeaderMap,
    body: Vec<u8>,
}

impl HttpConfigService {
    pub fn new(
        endpoint: &str,
        token: Option<String>,
        timeout: Duration,
        page_size: u32,
    ) -> Result<Self> {
        let base = Url::parse(endpoint).map_err(|e| AcsError::InvalidConfig {
            detail: format!("invalid service endpoint '{endpoint}': {e}"),
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(AcsError::InvalidConfig {
                detail: format!("service endpoint '{endpoint}' must be an http(s) URL"),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("acs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AcsError::InvalidConfig {
                detail: format!("Failed to create HTTP client: {e}"),
            })?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            base,
            token: token.filter(|t| !t.is_empty()),
            page_size,
            client,
            runtime,
        })
    }

    /// Build a client from the `[service]` section; the endpoint is required.
    pub fn from_config(service: &ServiceSection) -> Result<Self> {
        let endpoint = service
            .endpoint
            .as_deref()
            .ok_or_else(|| AcsError::InvalidConfig {
                detail: "no service endpoint configured\n\n  \
                         Pass --endpoint, set ACS_ENDPOINT, or add `endpoint` under \
                         [service] in acs.toml."
                    .into(),
            })?;
        Self::new(
            endpoint,
            service.token.clone(),
            Duration::from_secs(service.timeout_secs),
            service.page_size,
        )
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send(&self, operation: &str, request: RequestBuilder) -> Result<Reply> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        debug!(operation, "calling configuration service");

        let transport = |e: reqwest::Error| RemoteOperationError::Transport {
            operation: operation.to_string(),
            reason: e.to_string(),
        };

        self.runtime.block_on(async {
            let resp = request.send().await.map_err(transport)?;
            let status = resp.status();
            let headers = resp.headers().clone();
            let body = resp.bytes().await.map_err(transport)?.to_vec();

            if !status.is_success() {
                return Err(RemoteOperationError::Status {
                    operation: operation.to_string(),
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&body).into_owned(),
                }
                .into());
            }

            Ok::<Reply, AcsError>(Reply { headers, body })
        })
    }

    fn decode<T: DeserializeOwned>(operation: &str, reply: &Reply) -> Result<T> {
        serde_json::from_slice(&reply.body).map_err(|e| {
            RemoteOperationError::Transport {
                operation: operation.to_string(),
                reason: format!("unexpected response: {e}"),
            }
            .into()
        })
    }

    fn list<T: DeserializeOwned>(
        &self,
        operation: &str,
        segments: &[&str],
        next_token: Option<&str>,
    ) -> Result<Page<T>> {
        let mut request = self
            .client
            .get(self.url(segments))
            .query(&[("max_results", self.page_size.to_string())]);
        if let Some(token) = next_token {
            request = request.query(&[("next_token", token)]);
        }
        let reply = self.send(operation, request)?;
        Self::decode(operation, &reply)
    }
}

impl ConfigService for HttpConfigService {
    fn list_applications(&self, next_token: Option<&str>) -> Result<Page<Application>> {
        self.list("ListApplications", &["applications"], next_token)
    }

    fn list_configuration_profiles(
        &self,
        application_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<ConfigurationProfile>> {
        self.list(
            "ListConfigurationProfiles",
            &["applications", application_id, "configurationprofiles"],
            next_token,
        )
    }

    fn list_hosted_configuration_versions(
        &self,
        application_id: &str,
        profile_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<HostedConfigurationVersion>> {
        self.list(
            "ListHostedConfigurationVersions",
            &[
                "applications",
                application_id,
                "configurationprofiles",
                profile_id,
                "hostedconfigurationversions",
            ],
            next_token,
        )
    }

    fn get_hosted_configuration_version(
        &self,
        application_id: &str,
        profile_id: &str,
        version_number: i64,
    ) -> Result<Vec<u8>> {
        let version = version_number.to_string();
        let url = self.url(&[
            "applications",
            application_id,
            "configurationprofiles",
            profile_id,
            "hostedconfigurationversions",
            &version,
        ]);
        let reply = self.send("GetHostedConfigurationVersion", self.client.get(url))?;
        Ok(reply.body)
    }

    fn create_hosted_configuration_version(
        &self,
        application_id: &str,
        profile_id: &str,
        version: &NewConfigurationVersion<'_>,
    ) -> Result<HostedConfigurationVersion> {
        const OPERATION: &str = "CreateHostedConfigurationVersion";
        let invalid_header = |e: reqwest::header::InvalidHeaderValue| {
            RemoteOperationError::Transport {
                operation: OPERATION.to_string(),
                reason: format!("invalid header value: {e}"),
            }
        };

        let url = self.url(&[
            "applications",
            application_id,
            "configurationprofiles",
            profile_id,
            "hostedconfigurationversions",
        ]);
        let request = self
            .client
            .post(url)
            .header(
                CONTENT_TYPE,
                HeaderValue::from_str(version.content_type).map_err(invalid_header)?,
            )
            .header(
                DESCRIPTION_HEADER,
                HeaderValue::from_str(&version.description).map_err(invalid_header)?,
            )
            .body(version.content.to_vec());

        let reply = self.send(OPERATION, request)?;
        let version_number = reply
            .headers
            .get(VERSION_NUMBER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| RemoteOperationError::Transport {
                operation: OPERATION.to_string(),
                reason: format!("response is missing a numeric {VERSION_NUMBER_HEADER} header"),
            })?;

        Ok(HostedConfigurationVersion { version_number })
    }

    fn delete_hosted_configuration_version(
        &self,
        application_id: &str,
        profile_id: &str,
        version_number: i64,
    ) -> Result<()> {
        let version = version_number.to_string();
        let url = self.url(&[
            "applications",
            application_id,
            "configurationprofiles",
            profile_id,
            "hostedconfigurationversions",
            &version,
        ]);
        self.send("DeleteHostedConfigurationVersion", self.client.delete(url))?;
        Ok(())
    }

    fn list_environments(
        &self,
        application_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<Environment>> {
        self.list(
            "ListEnvironments",
            &["applications", application_id, "environments"],
            next_token,
        )
    }

    fn list_deployments(
        &self,
        application_id: &str,
        environment_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<Deployment>> {
        self.list(
            "ListDeployments",
            &[
                "applications",
                application_id,
                "environments",
                environment_id,
                "deployments",
            ],
            next_token,
        )
    }

    fn list_deployment_strategies(
        &self,
        next_token: Option<&str>,
    ) -> Result<Page<DeploymentStrategy>> {
        self.list("ListDeploymentStrategies", &["deploymentstrategies"], next_token)
    }

    fn start_deployment(
        &self,
        application_id: &str,
        environment_id: &str,
        request: &StartDeployment,
    ) -> Result<Deployment> {
        const OPERATION: &str = "StartDeployment";
        let url = self.url(&[
            "applications",
            application_id,
            "environments",
            environment_id,
            "deployments",
        ]);
        let reply = self.send(OPERATION, self.client.post(url).json(request))?;
        Self::decode(OPERATION, &reply)
    }
}
