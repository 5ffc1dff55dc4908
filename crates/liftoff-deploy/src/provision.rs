use liftoff_cloud::{
    CloudProvider, ProviderError, RegistryCredential, ResourceKind, ResourceRef, ResourceSpec,
};
use liftoff_core::DeploymentConfig;

use crate::error::DeployError;
use crate::progress::{Progress, Status};
use crate::strategy::DeploymentStrategy;

/// Compute-side resources and, for the container topology, registry login.
#[derive(Debug)]
pub struct Provisioned {
    pub resources: Vec<ResourceRef>,
    pub credential: Option<RegistryCredential>,
}

/// Find the resource, or create it when absent.
pub async fn ensure(
    provider: &impl CloudProvider,
    spec: &ResourceSpec,
    progress: &mut dyn Progress,
) -> Result<ResourceRef, DeployError> {
    let failed = |e: ProviderError| DeployError::ProvisionFailed {
        resource: format!("{} '{}'", spec.kind(), spec.name()),
        source: e,
    };

    if let Some(existing) = provider.find_resource(spec).await.map_err(failed)? {
        tracing::debug!(resource = %existing, id = %existing.id, "reusing");
        progress.update(Status::Skipped, &format!("{existing} already exists"));
        return Ok(existing);
    }

    progress.update(
        Status::Running,
        &format!("creating {} '{}'", spec.kind(), spec.name()),
    );
    let created = provider.create_resource(spec).await.map_err(failed)?;
    progress.update(Status::Done, &format!("created {created}"));
    Ok(created)
}

pub async fn ensure_group(
    provider: &impl CloudProvider,
    config: &DeploymentConfig,
    progress: &mut dyn Progress,
) -> Result<ResourceRef, DeployError> {
    let spec = ResourceSpec::ResourceGroup {
        name: config.resource_group.clone(),
        location: config.region.clone(),
    };
    ensure(provider, &spec, progress).await
}

/// Ensure each compute resource in order. Registry credentials are fetched
/// here so they exist before anything tries to publish.
pub async fn ensure_compute(
    provider: &impl CloudProvider,
    strategy: &dyn DeploymentStrategy,
    config: &DeploymentConfig,
    progress: &mut dyn Progress,
) -> Result<Provisioned, DeployError> {
    let mut resources = Vec::new();
    let mut credential = None;

    for spec in strategy.compute_resources(config) {
        let resource = ensure(provider, &spec, progress).await?;

        if resource.kind == ResourceKind::Registry {
            let login = provider.get_credentials(&resource).await.map_err(|e| {
                DeployError::ProvisionFailed {
                    resource: format!("credentials for {resource}"),
                    source: e,
                }
            })?;
            progress.update(
                Status::Done,
                &format!("registry login ready for {}", login.login_server),
            );
            credential = Some(login);
        }

        resources.push(resource);
    }

    Ok(Provisioned {
        resources,
        credential,
    })
}
