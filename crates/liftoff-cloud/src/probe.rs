use crate::error::ExecError;
use crate::executor::{CommandExecutor, RealExecutor};

/// Checks that a local tool can be run.
#[allow(async_fn_in_trait)]
pub trait ToolProbe: Send + Sync {
    /// Run `<tool> --version`, returning its first output line.
    async fn probe(&self, tool: &str) -> Result<String, ExecError>;
}

/// Probes tools on the real `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl ToolProbe for SystemProbe {
    async fn probe(&self, tool: &str) -> Result<String, ExecError> {
        let out = RealExecutor::new(tool)
            .exec(&["--version".to_owned()])
            .await?;
        Ok(out
            .lines()
            .next()
            .map_or_else(String::new, |line| line.trim().to_owned()))
    }
}
