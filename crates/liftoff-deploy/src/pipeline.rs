use liftoff_cloud::{CloudProvider, ContainerEngine, ResourceRef, ToolProbe};
use liftoff_core::{DeploymentConfig, RunToken};

use crate::error::{DeployError, PipelineError};
use crate::execute::{self, Endpoint};
use crate::phase::Phase;
use crate::progress::Progress;
use crate::strategy::DeploymentStrategy;
use crate::{auth, configure, prereq, provision, publish, report, secrets};

/// Result of a completed run.
#[derive(Debug)]
pub struct Deployment {
    pub endpoint: Endpoint,
    pub service: ResourceRef,
    /// Phases that ran to completion, in order.
    pub completed: Vec<Phase>,
    /// Rendered operator summary.
    pub summary: String,
}

/// Runs the phases strictly in order and stops at the first failure.
///
/// ```text
/// Validate → LoadSecrets → Authenticate → ProvisionGroup
///   → ProvisionComputeResource → PublishArtifact (container only)
///   → ConfigureRuntime → Deploy → ResolveEndpoint → Report
/// ```
///
/// Nothing is rolled back on failure; provisioning is find-or-create, so a
/// re-run picks up where the failed one stopped.
pub struct Pipeline<'a, P, C, T> {
    provider: &'a P,
    engine: &'a C,
    probe: &'a T,
    strategy: &'a dyn DeploymentStrategy,
    config: &'a DeploymentConfig,
}

impl<'a, P, C, T> Pipeline<'a, P, C, T>
where
    P: CloudProvider,
    C: ContainerEngine,
    T: ToolProbe,
{
    pub fn new(
        provider: &'a P,
        engine: &'a C,
        probe: &'a T,
        strategy: &'a dyn DeploymentStrategy,
        config: &'a DeploymentConfig,
    ) -> Self {
        Self {
            provider,
            engine,
            probe,
            strategy,
            config,
        }
    }

    pub async fn run(&self, progress: &mut dyn Progress) -> Result<Deployment, PipelineError> {
        let (provider, strategy, config) = (self.provider, self.strategy, self.config);
        let token = &config.token;
        let mut completed = Vec::with_capacity(Phase::ALL.len());

        tracing::info!(
            topology = %strategy.topology(),
            %token,
            resource_group = %config.resource_group,
            "deployment started"
        );

        progress.phase(Phase::Validate);
        let result = prereq::validate(self.probe, strategy.required_tools(), progress).await;
        finish(Phase::Validate, &mut completed, token, result)?;

        progress.phase(Phase::LoadSecrets);
        let result = secrets::load(config, progress).await;
        let secret_set = finish(Phase::LoadSecrets, &mut completed, token, result)?;

        progress.phase(Phase::Authenticate);
        let result = auth::ensure_session(provider, progress).await;
        finish(Phase::Authenticate, &mut completed, token, result)?;

        progress.phase(Phase::ProvisionGroup);
        let result = provision::ensure_group(provider, config, progress).await;
        let group = finish(Phase::ProvisionGroup, &mut completed, token, result)?;

        progress.phase(Phase::ProvisionComputeResource);
        let result = provision::ensure_compute(provider, strategy, config, progress).await;
        let provisioned = finish(Phase::ProvisionComputeResource, &mut completed, token, result)?;

        let artifact = if strategy.publishes_artifact() {
            progress.phase(Phase::PublishArtifact);
            let result = match provisioned.credential {
                Some(credential) => {
                    publish::publish(self.engine, config, credential, progress).await
                }
                None => Err(DeployError::ArtifactMissing),
            };
            Some(finish(Phase::PublishArtifact, &mut completed, token, result)?)
        } else {
            tracing::debug!("topology builds from source, skipping image publish");
            None
        };

        progress.phase(Phase::ConfigureRuntime);
        let settings = configure::runtime_settings(config, &secret_set);
        drop(secret_set);
        let mut resources = vec![group];
        resources.extend(provisioned.resources);
        let result = configure::apply(provider, strategy, &resources, settings, progress).await;
        let settings = finish(Phase::ConfigureRuntime, &mut completed, token, result)?;

        progress.phase(Phase::Deploy);
        let result =
            execute::deploy(provider, strategy, config, settings, artifact, progress).await;
        let service = finish(Phase::Deploy, &mut completed, token, result)?;

        progress.phase(Phase::ResolveEndpoint);
        let result =
            execute::resolve_endpoint(provider, strategy, config, &service, progress).await;
        let endpoint = finish(Phase::ResolveEndpoint, &mut completed, token, result)?;

        progress.phase(Phase::Report);
        let summary = report::render(config, strategy, &endpoint);
        progress.summary(&summary);
        completed.push(Phase::Report);

        tracing::info!(url = %endpoint.url, "deployment finished");
        Ok(Deployment {
            endpoint,
            service,
            completed,
            summary,
        })
    }
}

fn finish<T>(
    phase: Phase,
    completed: &mut Vec<Phase>,
    token: &RunToken,
    result: Result<T, DeployError>,
) -> Result<T, PipelineError> {
    match result {
        Ok(value) => {
            tracing::debug!(%phase, "phase complete");
            completed.push(phase);
            Ok(value)
        }
        Err(source) => {
            tracing::error!(%phase, error = %source, "phase failed");
            Err(PipelineError {
                phase,
                completed: completed.clone(),
                token: Some(token.clone()),
                source,
            })
        }
    }
}
