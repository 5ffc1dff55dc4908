use std::fmt;
use std::path::PathBuf;

use liftoff_cloud::{ExecError, ProviderError};
use liftoff_core::RunToken;

use crate::phase::Phase;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a phase stopped the run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("required tool '{tool}' is not available — install it: {hint}")]
    MissingTool {
        tool: String,
        hint: String,
        source: ExecError,
    },

    #[error("invalid configuration")]
    Config { source: liftoff_core::Error },

    #[error("secret file not found at {} — create it with KEY=VALUE lines", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("required secret '{key}' is missing or empty in {}", path.display())]
    RequiredSecretMissing { key: String, path: PathBuf },

    #[error("could not read secret file")]
    SecretParse { source: liftoff_core::Error },

    #[error("authentication failed — run `az login` and retry")]
    AuthenticationFailed {
        #[source]
        source: Option<ProviderError>,
    },

    #[error("failed to provision {resource}")]
    ProvisionFailed {
        resource: String,
        source: ProviderError,
    },

    #[error("image publish failed at {stage} stage")]
    PublishFailed { stage: PublishStage, source: BoxError },

    #[error("failed to configure runtime settings on {target}")]
    ConfigureFailed {
        target: String,
        source: ProviderError,
    },

    #[error("deployment failed")]
    DeployFailed { source: BoxError },

    #[error("no published image to deploy; the container topology publishes before deploying")]
    ArtifactMissing,

    #[error("could not resolve a public endpoint for {service}")]
    EndpointUnresolved {
        service: String,
        #[source]
        source: Option<ProviderError>,
    },
}

impl DeployError {
    pub(crate) fn from_secrets(err: liftoff_core::Error) -> Self {
        match err {
            liftoff_core::Error::ConfigMissing { path } => Self::ConfigMissing { path },
            liftoff_core::Error::RequiredSecretMissing { key, path } => {
                Self::RequiredSecretMissing { key, path }
            }
            other => Self::SecretParse { source: other },
        }
    }
}

/// Sub-step of [`Phase::PublishArtifact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    Package,
    Build,
    Tag,
    Login,
    Push,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Package => "package",
            Self::Build => "build",
            Self::Tag => "tag",
            Self::Login => "registry login",
            Self::Push => "push",
        };
        f.write_str(name)
    }
}

/// First failure of a run, attributed to its phase.
#[derive(Debug, thiserror::Error)]
#[error("{phase} phase failed")]
pub struct PipelineError {
    pub phase: Phase,
    /// Phases that finished before the failure.
    pub completed: Vec<Phase>,
    /// Token of the failed run; `None` when the run never got one.
    pub token: Option<RunToken>,
    pub source: DeployError,
}

impl PipelineError {
    /// Command that re-runs onto the same registry and app names.
    pub fn retry_command(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("LIFTOFF_RUN_TOKEN={token} liftoff deploy"))
    }
}
