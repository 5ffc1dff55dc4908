use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default configuration file name, looked up in the project directory.
pub const CONFIG_FILE: &str = "liftoff.toml";

/// liftoff.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiftoffConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub app_service: AppServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Base name every resource name is derived from
    #[serde(default = "default_name")]
    pub name: String,
    /// Azure region (defaults to eastus)
    #[serde(default = "default_region")]
    pub region: String,
    /// Resource group name (defaults to `<name>-rg`)
    pub resource_group: Option<String>,
    /// Deployment topology
    #[serde(default)]
    pub topology: Topology,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Path of the untracked KEY=VALUE file, relative to the project directory
    #[serde(default = "default_secrets_file")]
    pub file: PathBuf,
    /// Keys that must be present and non-empty
    #[serde(default = "default_required_secrets")]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Port the application listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Model identifier handed to the application as `CLAUDE_MODEL`
    #[serde(default = "default_model")]
    pub model: String,
    /// Startup command for the application
    #[serde(default = "default_startup_command")]
    pub startup_command: String,
    /// Additional plain environment variables
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Files/directories copied into the build context.
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    /// Base image of the generated Dockerfile
    #[serde(default = "default_base_image")]
    pub base_image: String,
    /// Additional system packages to install via apt-get
    #[serde(default)]
    pub extra_packages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Image repository name inside the registry
    pub image_name: Option<String>,
    /// Registry SKU
    #[serde(default = "default_registry_sku")]
    pub registry_sku: String,
    /// CPU cores
    #[serde(default = "default_cpu")]
    pub cpu: f32,
    /// Memory in GB
    #[serde(default = "default_memory_gb")]
    pub memory_gb: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppServiceConfig {
    /// Plan name (defaults to `<name>-plan`)
    pub plan: Option<String>,
    /// Plan SKU
    #[serde(default = "default_plan_sku")]
    pub sku: String,
    /// Runtime stack, as accepted by `az webapp create --runtime`
    #[serde(default = "default_runtime_stack")]
    pub runtime: String,
}

/// Where the application ends up running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topology {
    /// Image pushed to a container registry and run as a container instance.
    #[default]
    Container,
    /// Source pushed to a managed app platform which builds it.
    AppService,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container => f.write_str("container"),
            Self::AppService => f.write_str("app-service"),
        }
    }
}

impl FromStr for Topology {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "container" => Ok(Self::Container),
            "app-service" => Ok(Self::AppService),
            other => Err(crate::Error::UnknownTopology(other.to_owned())),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            region: default_region(),
            resource_group: None,
            topology: Topology::default(),
        }
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            file: default_secrets_file(),
            required: default_required_secrets(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            model: default_model(),
            startup_command: default_startup_command(),
            env: BTreeMap::new(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            base_image: default_base_image(),
            extra_packages: Vec::new(),
        }
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            image_name: None,
            registry_sku: default_registry_sku(),
            cpu: default_cpu(),
            memory_gb: default_memory_gb(),
        }
    }
}

impl Default for AppServiceConfig {
    fn default() -> Self {
        Self {
            plan: None,
            sku: default_plan_sku(),
            runtime: default_runtime_stack(),
        }
    }
}

impl LiftoffConfig {
    /// Load from liftoff.toml in the given directory, or return defaults if not found.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        Self::load_file(&project_dir.join(CONFIG_FILE))
    }

    /// Load from an explicit path, or return defaults if the file does not exist.
    pub fn load_file(config_path: &Path) -> crate::Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|e| crate::Error::ConfigLoad {
                path: config_path.to_path_buf(),
                source: e,
            })?;
        toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }
}

fn default_name() -> String {
    "pdf-viewer".to_owned()
}

fn default_region() -> String {
    "eastus".to_owned()
}

fn default_secrets_file() -> PathBuf {
    PathBuf::from(".env")
}

fn default_required_secrets() -> Vec<String> {
    vec!["ANTHROPIC_API_KEY".to_owned()]
}

fn default_port() -> u16 {
    8080
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_owned()
}

fn default_startup_command() -> String {
    "python web_viewer.py".to_owned()
}

fn default_include() -> Vec<String> {
    [
        "web_viewer.py",
        "main.py",
        "process_single.py",
        "llm_client.py",
        "extractors.py",
        "excel_ops.py",
        "requirements.txt",
    ]
    .iter()
    .map(|s| (*s).to_owned())
    .collect()
}

fn default_base_image() -> String {
    "python:3.11-slim".to_owned()
}

fn default_registry_sku() -> String {
    "Basic".to_owned()
}

fn default_cpu() -> f32 {
    1.0
}

fn default_memory_gb() -> f32 {
    1.5
}

fn default_plan_sku() -> String {
    "B1".to_owned()
}

fn default_runtime_stack() -> String {
    "PYTHON:3.11".to_owned()
}
