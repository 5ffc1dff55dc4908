use liftoff_cloud::{CloudProvider, ResourceRef, RuntimeSettings};
use liftoff_core::DeploymentConfig;

use crate::error::DeployError;
use crate::progress::{Progress, Status};
use crate::publish::PublishedArtifact;
use crate::strategy::DeploymentStrategy;

/// Public address of the running service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub url: String,
}

/// Issue the deploy request and wait for the provider to report completion.
pub async fn deploy(
    provider: &impl CloudProvider,
    strategy: &dyn DeploymentStrategy,
    config: &DeploymentConfig,
    settings: RuntimeSettings,
    artifact: Option<PublishedArtifact>,
    progress: &mut dyn Progress,
) -> Result<ResourceRef, DeployError> {
    let request = strategy.deploy_request(config, settings, artifact)?;

    progress.update(
        Status::Running,
        &format!("releasing {} '{}'", strategy.service_kind(), config.app_name),
    );
    let service = provider
        .deploy(&request)
        .await
        .map_err(|e| DeployError::DeployFailed {
            source: Box::new(e),
        })?;
    progress.update(Status::Done, &format!("{service} is running"));
    Ok(service)
}

pub async fn resolve_endpoint(
    provider: &impl CloudProvider,
    strategy: &dyn DeploymentStrategy,
    config: &DeploymentConfig,
    service: &ResourceRef,
    progress: &mut dyn Progress,
) -> Result<Endpoint, DeployError> {
    let host = provider
        .get_endpoint(service)
        .await
        .map_err(|e| DeployError::EndpointUnresolved {
            service: service.to_string(),
            source: Some(e),
        })?
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| DeployError::EndpointUnresolved {
            service: service.to_string(),
            source: None,
        })?;

    let url = strategy.endpoint_url(config, &host);
    progress.update(Status::Done, &format!("endpoint {url}"));
    Ok(Endpoint { host, url })
}
