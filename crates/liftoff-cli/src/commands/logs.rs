use liftoff_cloud::AzureProvider;
use liftoff_core::{RunToken, Topology};
use liftoff_deploy::strategy;

use super::{Overrides, Project};

/// Stream logs of the service a deploy with `run_token` created.
pub async fn logs(
    project: &Project,
    run_token: RunToken,
    topology: Option<Topology>,
    follow: bool,
) -> anyhow::Result<()> {
    let config = project.load_config()?;
    let deployment = Overrides {
        topology,
        run_token: Some(run_token),
        ..Overrides::default()
    }
    .resolve(config, project);
    let kind = strategy::for_topology(deployment.topology).service_kind();

    let client = AzureProvider::new();
    client
        .stream_logs(kind, &deployment.resource_group, &deployment.app_name, follow)
        .await?;

    Ok(())
}
