//! Narrow provider interface the deployment pipeline is written against.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ExecError;

/// Cloud operations needed to provision, configure, and release a service.
///
/// Production code uses [`AzureProvider`](crate::AzureProvider); pipeline
/// tests use mocks or an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait CloudProvider: Send + Sync {
    /// Account of the active CLI session, or `None` when logged out.
    async fn current_account(&self) -> Result<Option<String>, ProviderError>;

    /// Interactive login. Blocks until the operator completes or aborts it.
    async fn login(&self) -> Result<(), ProviderError>;

    /// Look a resource up by name; `None` when it does not exist.
    async fn find_resource(&self, spec: &ResourceSpec)
    -> Result<Option<ResourceRef>, ProviderError>;

    async fn create_resource(&self, spec: &ResourceSpec) -> Result<ResourceRef, ProviderError>;

    /// Registry login credentials.
    async fn get_credentials(
        &self,
        registry: &ResourceRef,
    ) -> Result<RegistryCredential, ProviderError>;

    /// Overwrite environment and startup command on an existing compute resource.
    async fn apply_settings(
        &self,
        target: &ResourceRef,
        settings: &RuntimeSettings,
    ) -> Result<(), ProviderError>;

    /// Create or update the running service. Returns once the provider reports completion.
    async fn deploy(&self, request: &DeployRequest) -> Result<ResourceRef, ProviderError>;

    /// Public hostname of a deployed service, `None` when none is assigned.
    async fn get_endpoint(&self, service: &ResourceRef) -> Result<Option<String>, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    ResourceGroup,
    Registry,
    AppServicePlan,
    WebApp,
    ContainerInstance,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ResourceGroup => "resource group",
            Self::Registry => "container registry",
            Self::AppServicePlan => "app service plan",
            Self::WebApp => "web app",
            Self::ContainerInstance => "container instance",
        };
        f.write_str(label)
    }
}

/// Desired state of one infrastructure resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceSpec {
    ResourceGroup {
        name: String,
        location: String,
    },
    Registry {
        name: String,
        resource_group: String,
        location: String,
        sku: String,
    },
    AppServicePlan {
        name: String,
        resource_group: String,
        location: String,
        sku: String,
    },
    WebApp {
        name: String,
        resource_group: String,
        plan: String,
        runtime: String,
    },
}

impl ResourceSpec {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::ResourceGroup { .. } => ResourceKind::ResourceGroup,
            Self::Registry { .. } => ResourceKind::Registry,
            Self::AppServicePlan { .. } => ResourceKind::AppServicePlan,
            Self::WebApp { .. } => ResourceKind::WebApp,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::ResourceGroup { name, .. }
            | Self::Registry { name, .. }
            | Self::AppServicePlan { name, .. }
            | Self::WebApp { name, .. } => name,
        }
    }

    /// Resource group the resource lives in; a group is its own.
    pub fn resource_group(&self) -> &str {
        match self {
            Self::ResourceGroup { name, .. } => name,
            Self::Registry { resource_group, .. }
            | Self::AppServicePlan { resource_group, .. }
            | Self::WebApp { resource_group, .. } => resource_group,
        }
    }

    /// Reference for a resource matching this spec with the given provider id.
    pub fn to_ref(&self, id: impl Into<String>) -> ResourceRef {
        ResourceRef {
            kind: self.kind(),
            name: self.name().to_owned(),
            resource_group: self.resource_group().to_owned(),
            id: id.into(),
        }
    }
}

/// Provider-assigned identity of an existing resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub name: String,
    pub resource_group: String,
    pub id: String,
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

/// Registry login, held in memory only.
#[derive(Debug)]
pub struct RegistryCredential {
    pub login_server: String,
    pub username: String,
    pub password: SecretString,
}

/// Environment and startup command for the running service.
#[derive(Debug, Default)]
pub struct RuntimeSettings {
    pub env: BTreeMap<String, String>,
    pub secrets: BTreeMap<String, SecretString>,
    pub startup_command: String,
    pub port: u16,
}

impl RuntimeSettings {
    /// Names of every variable set, plain and secret.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.env
            .keys()
            .chain(self.secrets.keys())
            .map(String::as_str)
    }
}

#[derive(Debug)]
pub enum DeployRequest {
    /// Run a published image as a container instance.
    Container(ContainerDeployment),
    /// Push source to the app platform and let it build.
    Source(SourceDeployment),
}

#[derive(Debug)]
pub struct ContainerDeployment {
    pub name: String,
    pub resource_group: String,
    pub location: String,
    pub image: String,
    pub credential: RegistryCredential,
    pub dns_label: String,
    pub cpu: f32,
    pub memory_gb: f32,
    pub settings: RuntimeSettings,
}

#[derive(Debug)]
pub struct SourceDeployment {
    pub app_name: String,
    pub resource_group: String,
    pub location: String,
    pub plan: String,
    pub runtime: String,
    pub source_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{operation} failed")]
    Command {
        operation: String,
        source: ExecError,
    },

    #[error("unexpected output from {operation}: {detail}")]
    UnexpectedOutput { operation: String, detail: String },

    #[error("{kind} does not accept runtime settings")]
    SettingsUnsupported { kind: ResourceKind },
}

impl ProviderError {
    pub fn command(operation: impl Into<String>, source: ExecError) -> Self {
        Self::Command {
            operation: operation.into(),
            source,
        }
    }
}
