use liftoff_cloud::{AzureProvider, DockerCli, SystemProbe};
use liftoff_deploy::{ConsoleProgress, DeployError, Phase, Pipeline, PipelineError, strategy};

use super::{Overrides, Project};

/// Run the deployment pipeline against Azure with the local docker CLI.
pub async fn deploy(project: &Project, overrides: Overrides) -> anyhow::Result<()> {
    let config = project.load_config().map_err(|e| PipelineError {
        phase: Phase::Validate,
        completed: Vec::new(),
        token: None,
        source: DeployError::Config { source: e },
    })?;
    let deployment = overrides.resolve(config, project);
    tracing::debug!(
        topology = %deployment.topology,
        token = %deployment.token,
        resource_group = %deployment.resource_group,
        "resolved deployment"
    );

    let strategy = strategy::for_topology(deployment.topology);
    let provider = AzureProvider::new();
    let engine = DockerCli::new();
    let probe = SystemProbe;

    let mut progress = ConsoleProgress;
    Pipeline::new(&provider, &engine, &probe, strategy.as_ref(), &deployment)
        .run(&mut progress)
        .await?;

    Ok(())
}
