use liftoff_cloud::ToolProbe;

use crate::error::DeployError;
use crate::progress::{Progress, Status};

/// An external command-line tool the pipeline shells out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tool {
    pub name: &'static str,
    pub install_hint: &'static str,
}

pub const AZ: Tool = Tool {
    name: "az",
    install_hint: "https://learn.microsoft.com/cli/azure/install-azure-cli",
};

pub const DOCKER: Tool = Tool {
    name: "docker",
    install_hint: "https://docs.docker.com/get-docker/",
};

/// Confirm every tool answers `--version`, stopping at the first that does not.
pub async fn validate(
    probe: &impl ToolProbe,
    tools: &[Tool],
    progress: &mut dyn Progress,
) -> Result<(), DeployError> {
    for tool in tools {
        match probe.probe(tool.name).await {
            Ok(version) => {
                tracing::debug!(tool = tool.name, %version, "tool found");
                progress.update(Status::Done, &format!("{} found ({version})", tool.name));
            }
            Err(e) => {
                return Err(DeployError::MissingTool {
                    tool: tool.name.to_owned(),
                    hint: tool.install_hint.to_owned(),
                    source: e,
                });
            }
        }
    }
    Ok(())
}
