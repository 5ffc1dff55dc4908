use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, LiftoffConfig, Topology};
use crate::naming::{self, RunToken};

/// Everything a pipeline run needs to know, resolved once at start.
///
/// Names that must be globally unique (registry, app, DNS label, image tag)
/// embed the run token. The resource group and plan keep stable names so a
/// re-run converges on the resources an earlier run created.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentConfig {
    pub topology: Topology,
    pub token: RunToken,
    pub project_dir: PathBuf,
    pub region: String,
    pub resource_group: String,

    pub registry_name: String,
    pub registry_sku: String,
    pub image_name: String,
    pub image_tag: String,
    pub dns_label: String,
    pub cpu: f32,
    pub memory_gb: f32,

    pub app_name: String,
    pub plan_name: String,
    pub plan_sku: String,
    pub runtime_stack: String,

    pub port: u16,
    pub model: String,
    pub startup_command: String,
    pub env: BTreeMap<String, String>,

    pub secrets_file: PathBuf,
    pub required_secrets: Vec<String>,
    pub build: BuildConfig,
}

impl DeploymentConfig {
    pub fn compute(config: &LiftoffConfig, token: RunToken, project_dir: &Path) -> Self {
        let base = &config.project.name;
        let label_base = naming::dns_label(base);
        let unique = naming::unique_label(base, &token);

        let resource_group = match &config.project.resource_group {
            Some(name) => name.clone(),
            None => format!("{label_base}-rg"),
        };
        let plan_name = match &config.app_service.plan {
            Some(name) => name.clone(),
            None => format!("{label_base}-plan"),
        };
        let image_name = match &config.container.image_name {
            Some(name) => name.clone(),
            None => label_base.clone(),
        };

        let secrets_file = if config.secrets.file.is_absolute() {
            config.secrets.file.clone()
        } else {
            project_dir.join(&config.secrets.file)
        };

        Self {
            topology: config.project.topology,
            registry_name: naming::registry_name(base, &token),
            image_tag: token.to_string(),
            token,
            project_dir: project_dir.to_path_buf(),
            region: config.project.region.clone(),
            resource_group,
            registry_sku: config.container.registry_sku.clone(),
            image_name,
            dns_label: unique.clone(),
            cpu: config.container.cpu,
            memory_gb: config.container.memory_gb,
            app_name: unique,
            plan_name,
            plan_sku: config.app_service.sku.clone(),
            runtime_stack: config.app_service.runtime.clone(),
            port: config.runtime.port,
            model: config.runtime.model.clone(),
            startup_command: config.runtime.startup_command.clone(),
            env: config.runtime.env.clone(),
            secrets_file,
            required_secrets: config.secrets.required.clone(),
            build: config.build.clone(),
        }
    }

    /// Plain (non-secret) environment applied to the running service.
    ///
    /// `PORT` and `CLAUDE_MODEL` are always set; `[runtime.env]` may override them.
    pub fn operational_env(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        env.insert("PORT".to_owned(), self.port.to_string());
        env.insert("CLAUDE_MODEL".to_owned(), self.model.clone());
        env.extend(self.env.iter().map(|(k, v)| (k.clone(), v.clone())));
        env
    }
}
