pub mod azure;
pub mod docker;
pub mod error;
pub mod executor;
pub mod probe;
pub mod provider;

pub use azure::{AzureProvider, CheckResult, DoctorReport, ProviderCheck};
pub use docker::{ContainerEngine, DockerCli, EngineError, ImageRef};
pub use error::ExecError;
pub use executor::{CommandExecutor, RealExecutor};
pub use probe::{SystemProbe, ToolProbe};
pub use provider::{
    CloudProvider, ContainerDeployment, DeployRequest, ProviderError, RegistryCredential,
    ResourceKind, ResourceRef, ResourceSpec, RuntimeSettings, SourceDeployment,
};
