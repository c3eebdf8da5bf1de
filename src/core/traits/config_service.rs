use crate::core::errors::Result;
use crate::core::models::remote::{
    Application, ConfigurationProfile, Deployment, DeploymentStrategy, Environment,
    HostedConfigurationVersion, NewConfigurationVersion, Page, StartDeployment,
};

/// Port for the remote configuration-management service.
///
/// Implementations live in `adapters::appconfig`. List calls return one page
/// at a time; pass the previous page's `next_token` to continue.
pub trait ConfigService {
    fn list_applications(&self, next_token: Option<&str>) -> Result<Page<Application>>;

    fn list_configuration_profiles(
        &self,
        application_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<ConfigurationProfile>>;

    fn list_hosted_configuration_versions(
        &self,
        application_id: &str,
        profile_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<HostedConfigurationVersion>>;

    /// Raw content of one hosted configuration version.
    fn get_hosted_configuration_version(
        &self,
        application_id: &str,
        profile_id: &str,
        version_number: i64,
    ) -> Result<Vec<u8>>;

    /// Store a new version and return its summary.
    fn create_hosted_configuration_version(
        &self,
        application_id: &str,
        profile_id: &str,
        version: &NewConfigurationVersion<'_>,
    ) -> Result<HostedConfigurationVersion>;

    fn delete_hosted_configuration_version(
        &self,
        application_id: &str,
        profile_id: &str,
        version_number: i64,
    ) -> Result<()>;

    fn list_environments(
        &self,
        application_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<Environment>>;

    fn list_deployments(
        &self,
        application_id: &str,
        environment_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<Deployment>>;

    fn list_deployment_strategies(
        &self,
        next_token: Option<&str>,
    ) -> Result<Page<DeploymentStrategy>>;

    fn start_deployment(
        &self,
        application_id: &str,
        environment_id: &str,
        request: &StartDeployment,
    ) -> Result<Deployment>;
}

/// Drain every page of a list call.
pub fn collect_pages<T, F>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<&str>) -> Result<Page<T>>,
{
    let mut items = Vec::new();
    let mut next_token: Option<String> = None;

    loop {
        let page = fetch(next_token.as_deref())?;
        items.extend(page.items);
        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_pages_follows_tokens() {
        let pages = vec![
            Page {
                items: vec![1, 2],
                next_token: Some("b".to_string()),
            },
            Page {
                items: vec![3],
                next_token: Some("c".to_string()),
            },
            Page {
                items: vec![4],
                next_token: None,
            },
        ];
        let mut seen_tokens = Vec::new();
        let mut iter = pages.into_iter();

        let all = collect_pages(|token| {
            seen_tokens.push(token.map(str::to_string));
            Ok(iter.next().unwrap())
        })
        .unwrap();

        assert_eq!(all, vec![1, 2, 3, 4]);
        assert_eq!(
            seen_tokens,
            vec![None, Some("b".to_string()), Some("c".to_string())]
        );
    }

    #[test]
    fn collect_pages_stops_on_empty_token() {
        let all = collect_pages(|_| {
            Ok(Page {
                items: vec!["only"],
                next_token: Some(String::new()),
            })
        })
        .unwrap();
        assert_eq!(all, vec!["only"]);
    }
}
