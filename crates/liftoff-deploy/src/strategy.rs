//! Topology-specific decisions, kept free of cloud calls.
//!
//! The pipeline asks a [`DeploymentStrategy`] which resources to provision,
//! whether an image is published, where runtime settings go, and how the
//! final request and URL look. Everything else is shared.

use liftoff_build::bundle;
use liftoff_cloud::{
    ContainerDeployment, DeployRequest, ResourceKind, ResourceRef, ResourceSpec, RuntimeSettings,
    SourceDeployment,
};
use liftoff_core::{DeploymentConfig, Topology};

use crate::error::DeployError;
use crate::prereq::{self, Tool};
use crate::publish::PublishedArtifact;

pub trait DeploymentStrategy: Send + Sync {
    fn topology(&self) -> Topology;

    /// Local tools the topology shells out to.
    fn required_tools(&self) -> &'static [Tool];

    /// Resources created after the resource group, in creation order.
    fn compute_resources(&self, config: &DeploymentConfig) -> Vec<ResourceSpec>;

    /// Whether an image is built and pushed before deploying.
    fn publishes_artifact(&self) -> bool;

    /// Resource whose settings are overwritten before deploy. `None` when
    /// settings travel with the deploy request instead.
    fn settings_target<'a>(&self, resources: &'a [ResourceRef]) -> Option<&'a ResourceRef>;

    fn deploy_request(
        &self,
        config: &DeploymentConfig,
        settings: RuntimeSettings,
        artifact: Option<PublishedArtifact>,
    ) -> Result<DeployRequest, DeployError>;

    fn endpoint_url(&self, config: &DeploymentConfig, host: &str) -> String;

    /// Kind of the resource that serves traffic.
    fn service_kind(&self) -> ResourceKind;
}

/// Pick the strategy for a topology.
pub fn for_topology(topology: Topology) -> Box<dyn DeploymentStrategy> {
    match topology {
        Topology::Container => Box::new(ContainerInstanceStrategy),
        Topology::AppService => Box::new(AppServiceStrategy),
    }
}

/// Registry, image push, container instance with a DNS label.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerInstanceStrategy;

impl DeploymentStrategy for ContainerInstanceStrategy {
    fn topology(&self) -> Topology {
        Topology::Container
    }

    fn required_tools(&self) -> &'static [Tool] {
        &[prereq::AZ, prereq::DOCKER]
    }

    fn compute_resources(&self, config: &DeploymentConfig) -> Vec<ResourceSpec> {
        vec![ResourceSpec::Registry {
            name: config.registry_name.clone(),
            resource_group: config.resource_group.clone(),
            location: config.region.clone(),
            sku: config.registry_sku.clone(),
        }]
    }

    fn publishes_artifact(&self) -> bool {
        true
    }

    // Container instances only take environment at create time.
    fn settings_target<'a>(&self, _resources: &'a [ResourceRef]) -> Option<&'a ResourceRef> {
        None
    }

    fn deploy_request(
        &self,
        config: &DeploymentConfig,
        settings: RuntimeSettings,
        artifact: Option<PublishedArtifact>,
    ) -> Result<DeployRequest, DeployError> {
        let artifact = artifact.ok_or(DeployError::ArtifactMissing)?;

        Ok(DeployRequest::Container(ContainerDeployment {
            name: config.app_name.clone(),
            resource_group: config.resource_group.clone(),
            location: config.region.clone(),
            image: artifact.image.to_string(),
            credential: artifact.credential,
            dns_label: config.dns_label.clone(),
            cpu: config.cpu,
            memory_gb: config.memory_gb,
            settings,
        }))
    }

    fn endpoint_url(&self, config: &DeploymentConfig, host: &str) -> String {
        format!("http://{host}:{}", config.port)
    }

    fn service_kind(&self) -> ResourceKind {
        ResourceKind::ContainerInstance
    }
}

/// App service plan and web app; the platform builds from source.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppServiceStrategy;

impl DeploymentStrategy for AppServiceStrategy {
    fn topology(&self) -> Topology {
        Topology::AppService
    }

    fn required_tools(&self) -> &'static [Tool] {
        &[prereq::AZ]
    }

    fn compute_resources(&self, config: &DeploymentConfig) -> Vec<ResourceSpec> {
        vec![
            ResourceSpec::AppServicePlan {
                name: config.plan_name.clone(),
                resource_group: config.resource_group.clone(),
                location: config.region.clone(),
                sku: config.plan_sku.clone(),
            },
            ResourceSpec::WebApp {
                name: config.app_name.clone(),
                resource_group: config.resource_group.clone(),
                plan: config.plan_name.clone(),
                runtime: config.runtime_stack.clone(),
            },
        ]
    }

    fn publishes_artifact(&self) -> bool {
        false
    }

    fn settings_target<'a>(&self, resources: &'a [ResourceRef]) -> Option<&'a ResourceRef> {
        resources.iter().find(|r| r.kind == ResourceKind::WebApp)
    }

    fn deploy_request(
        &self,
        config: &DeploymentConfig,
        _settings: RuntimeSettings,
        _artifact: Option<PublishedArtifact>,
    ) -> Result<DeployRequest, DeployError> {
        let source_dir = bundle::create_bundle(&config.project_dir, &config.build.include, None)
            .map_err(|e| DeployError::DeployFailed {
                source: Box::new(e),
            })?;

        Ok(DeployRequest::Source(SourceDeployment {
            app_name: config.app_name.clone(),
            resource_group: config.resource_group.clone(),
            location: config.region.clone(),
            plan: config.plan_name.clone(),
            runtime: config.runtime_stack.clone(),
            source_dir,
        }))
    }

    fn endpoint_url(&self, _config: &DeploymentConfig, host: &str) -> String {
        format!("https://{host}")
    }

    fn service_kind(&self) -> ResourceKind {
        ResourceKind::WebApp
    }
}
