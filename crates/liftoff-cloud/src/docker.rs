use std::fmt;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;

use crate::error::ExecError;
use crate::executor::{CommandExecutor, RealExecutor};
use crate::provider::RegistryCredential;

/// Container instances run linux/amd64 regardless of the build host.
const TARGET_PLATFORM: &str = "linux/amd64";

/// Local image build and registry push.
#[allow(async_fn_in_trait)]
pub trait ContainerEngine: Send + Sync {
    async fn build(&self, context_dir: &Path, tag: &str) -> Result<(), EngineError>;

    async fn tag(&self, source: &str, target: &str) -> Result<(), EngineError>;

    async fn login(&self, credential: &RegistryCredential) -> Result<(), EngineError>;

    async fn push(&self, image: &str) -> Result<(), EngineError>;
}

/// Fully-qualified image name: `registry/repository:tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub registry: String,
    pub repository: String,
    pub tag: String,
}

impl ImageRef {
    /// Local, registry-less name used for the build step.
    pub fn local(&self) -> String {
        format!("{}:{}", self.repository, self.tag)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.registry, self.repository, self.tag)
    }
}

/// `docker` CLI engine.
pub struct DockerCli<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl DockerCli<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::new("docker"),
        }
    }
}

impl Default for DockerCli<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> DockerCli<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }
}

impl<E: CommandExecutor> ContainerEngine for DockerCli<E> {
    async fn build(&self, context_dir: &Path, tag: &str) -> Result<(), EngineError> {
        let context = context_dir
            .to_str()
            .ok_or_else(|| EngineError::InvalidPath(context_dir.to_path_buf()))?;

        self.executor
            .exec_streaming(&args(["build", "--platform", TARGET_PLATFORM, "--tag", tag, context]))
            .await
            .map_err(|e| EngineError::Build { source: e })
    }

    async fn tag(&self, source: &str, target: &str) -> Result<(), EngineError> {
        self.executor
            .exec(&args(["tag", source, target]))
            .await
            .map(|_| ())
            .map_err(|e| EngineError::Tag { source: e })
    }

    async fn login(&self, credential: &RegistryCredential) -> Result<(), EngineError> {
        self.executor
            .exec_with_stdin(
                &args([
                    "login",
                    &credential.login_server,
                    "--username",
                    &credential.username,
                    "--password-stdin",
                ]),
                credential.password.expose_secret().as_bytes(),
            )
            .await
            .map(|_| ())
            .map_err(|e| EngineError::Login { source: e })
    }

    async fn push(&self, image: &str) -> Result<(), EngineError> {
        self.executor
            .exec_streaming(&args(["push", image]))
            .await
            .map_err(|e| EngineError::Push { source: e })
    }
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("build context path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("image build failed")]
    Build { source: ExecError },

    #[error("image tag failed")]
    Tag { source: ExecError },

    #[error("registry login failed")]
    Login { source: ExecError },

    #[error("image push failed")]
    Push { source: ExecError },
}
