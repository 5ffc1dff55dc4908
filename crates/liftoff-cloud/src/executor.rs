use std::path::Path;
use std::process::Stdio;

use crate::error::ExecError;

/// Abstraction over external CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor: Send + Sync {
    /// Execute a command and capture stdout.
    async fn exec(&self, args: &[String]) -> Result<String, ExecError>;

    /// Execute a command, streaming output to the terminal.
    async fn exec_streaming(&self, args: &[String]) -> Result<(), ExecError>;

    /// Execute a command in `dir`, streaming output to the terminal.
    async fn exec_streaming_in(&self, dir: &Path, args: &[String]) -> Result<(), ExecError>;

    /// Execute a command with data piped to stdin.
    async fn exec_with_stdin(&self, args: &[String], stdin_data: &[u8])
    -> Result<String, ExecError>;
}

/// Runs a real program found on `PATH`.
#[derive(Debug, Clone)]
pub struct RealExecutor {
    program: String,
}

impl RealExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, args: &[String]) -> tokio::process::Command {
        tracing::debug!(command = %summary(&self.program, args), "exec");
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(args);
        cmd
    }

    fn not_found(&self, source: std::io::Error) -> ExecError {
        ExecError::NotFound {
            program: self.program.clone(),
            source,
        }
    }

    fn finish(&self, args: &[String], output: std::process::Output) -> Result<String, ExecError> {
        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| ExecError::InvalidUtf8 {
                program: self.program.clone(),
                source: e,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(ExecError::CommandFailed {
                command: summary(&self.program, args),
                stderr,
            })
        }
    }

    fn check_status(
        &self,
        args: &[String],
        status: std::process::ExitStatus,
    ) -> Result<(), ExecError> {
        if status.success() {
            Ok(())
        } else {
            Err(ExecError::CommandFailed {
                command: summary(&self.program, args),
                stderr: format!("exit code: {status}"),
            })
        }
    }
}

impl CommandExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, ExecError> {
        let output = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.not_found(e))?;

        self.finish(args, output)
    }

    async fn exec_streaming(&self, args: &[String]) -> Result<(), ExecError> {
        let status = self
            .command(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.not_found(e))?;

        self.check_status(args, status)
    }

    async fn exec_streaming_in(&self, dir: &Path, args: &[String]) -> Result<(), ExecError> {
        let status = self
            .command(args)
            .current_dir(dir)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.not_found(e))?;

        self.check_status(args, status)
    }

    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, ExecError> {
        use tokio::io::AsyncWriteExt;

        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.not_found(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            let stdin_error = |e| ExecError::StdinWrite {
                program: self.program.clone(),
                source: e,
            };
            stdin.write_all(stdin_data).await.map_err(stdin_error)?;
            stdin.shutdown().await.map_err(stdin_error)?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.not_found(e))?;

        self.finish(args, output)
    }
}

/// `program sub-command [sub-command]`, skipping flags and everything after them.
fn summary(program: &str, args: &[String]) -> String {
    let words: Vec<&str> = args
        .iter()
        .take_while(|a| !a.starts_with('-'))
        .take(3)
        .map(String::as_str)
        .collect();
    if words.is_empty() {
        program.to_owned()
    } else {
        format!("{program} {}", words.join(" "))
    }
}
