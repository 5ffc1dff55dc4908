#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use liftoff_cloud::{
    CloudProvider, ContainerEngine, DeployRequest, EngineError, ExecError, ProviderError,
    RegistryCredential, ResourceKind, ResourceRef, ResourceSpec, RuntimeSettings, ToolProbe,
};
use liftoff_core::{DeploymentConfig, LiftoffConfig, RunToken, Topology};
use secrecy::{ExposeSecret, SecretString};
use tempfile::TempDir;

// ── Project fixture ──

pub fn project(topology: Topology, secrets: &str) -> (TempDir, DeploymentConfig) {
    project_with_token(topology, secrets, "run42")
}

pub fn project_with_token(
    topology: Topology,
    secrets: &str,
    token: &str,
) -> (TempDir, DeploymentConfig) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("web_viewer.py"), "print('viewer')\n").unwrap();
    std::fs::write(dir.path().join("requirements.txt"), "flask\n").unwrap();
    std::fs::write(dir.path().join(".env"), secrets).unwrap();

    let config = config_for(dir.path(), topology, token);
    (dir, config)
}

pub fn config_for(dir: &Path, topology: Topology, token: &str) -> DeploymentConfig {
    let mut raw = LiftoffConfig::default();
    raw.project.topology = topology;
    raw.secrets.required = vec!["API_KEY".to_owned()];
    raw.build.include = vec!["web_viewer.py".to_owned(), "requirements.txt".to_owned()];
    let token: RunToken = token.parse().unwrap();
    DeploymentConfig::compute(&raw, token, dir)
}

// ── Cloud ──

#[derive(Debug, Default)]
pub struct CloudState {
    pub account: Option<String>,
    /// Whether `login` establishes a session.
    pub login_works: bool,
    pub resources: Vec<ResourceRef>,
    pub calls: Vec<String>,
    /// (target name, setting keys) per apply_settings call.
    pub applied: Vec<(String, Vec<String>)>,
    /// Secret values carried by the last deploy request.
    pub deployed_secrets: BTreeMap<String, String>,
    pub deployed_env: BTreeMap<String, String>,
    pub deployed_image: Option<String>,
    pub deployed_source: Option<PathBuf>,
    pub fail_deploy: bool,
    pub no_endpoint: bool,
    hosts: BTreeMap<String, String>,
}

/// In-memory provider with find-or-create semantics.
#[derive(Debug, Default)]
pub struct FakeCloud {
    state: Mutex<CloudState>,
}

impl FakeCloud {
    pub fn signed_in() -> Self {
        let cloud = Self::default();
        cloud.with(|s| s.account = Some("operator@example.com".to_owned()));
        cloud
    }

    pub fn signed_out(login_works: bool) -> Self {
        let cloud = Self::default();
        cloud.with(|s| s.login_works = login_works);
        cloud
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut CloudState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn calls(&self) -> Vec<String> {
        self.with(|s| s.calls.clone())
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.with(|s| s.resources.iter().filter(|r| r.kind == kind).count())
    }

    fn record(&self, call: String) {
        self.with(|s| s.calls.push(call));
    }
}

impl CloudProvider for FakeCloud {
    async fn current_account(&self) -> Result<Option<String>, ProviderError> {
        self.record("current_account".to_owned());
        Ok(self.with(|s| s.account.clone()))
    }

    async fn login(&self) -> Result<(), ProviderError> {
        self.record("login".to_owned());
        self.with(|s| {
            if s.login_works {
                s.account = Some("operator@example.com".to_owned());
            }
        });
        Ok(())
    }

    async fn find_resource(
        &self,
        spec: &ResourceSpec,
    ) -> Result<Option<ResourceRef>, ProviderError> {
        self.record(format!("find {} {}", spec.kind(), spec.name()));
        Ok(self.with(|s| {
            s.resources
                .iter()
                .find(|r| r.kind == spec.kind() && r.name == spec.name())
                .cloned()
        }))
    }

    async fn create_resource(&self, spec: &ResourceSpec) -> Result<ResourceRef, ProviderError> {
        self.record(format!("create {} {}", spec.kind(), spec.name()));
        let created = spec.to_ref(format!("/fake/{}/{}", spec.resource_group(), spec.name()));
        self.with(|s| s.resources.push(created.clone()));
        Ok(created)
    }

    async fn get_credentials(
        &self,
        registry: &ResourceRef,
    ) -> Result<RegistryCredential, ProviderError> {
        self.record(format!("credentials {}", registry.name));
        Ok(RegistryCredential {
            login_server: format!("{}.azurecr.io", registry.name),
            username: registry.name.clone(),
            password: SecretString::from("registry-password"),
        })
    }

    async fn apply_settings(
        &self,
        target: &ResourceRef,
        settings: &RuntimeSettings,
    ) -> Result<(), ProviderError> {
        self.record(format!("apply_settings {}", target.name));
        let keys = settings.keys().map(str::to_owned).collect();
        self.with(|s| s.applied.push((target.name.clone(), keys)));
        Ok(())
    }

    async fn deploy(&self, request: &DeployRequest) -> Result<ResourceRef, ProviderError> {
        self.record("deploy".to_owned());
        if self.with(|s| s.fail_deploy) {
            return Err(ProviderError::command(
                "create container instance",
                ExecError::CommandFailed {
                    command: "az container create".to_owned(),
                    stderr: "QuotaExceeded".to_owned(),
                },
            ));
        }

        match request {
            DeployRequest::Container(c) => {
                self.with(|s| {
                    s.deployed_secrets = secret_values(&c.settings);
                    s.deployed_env = c.settings.env.clone();
                    s.deployed_image = Some(c.image.clone());
                    s.hosts.insert(
                        c.name.clone(),
                        format!("{}.{}.azurecontainer.io", c.dns_label, c.location),
                    );
                });
                Ok(ResourceRef {
                    kind: ResourceKind::ContainerInstance,
                    name: c.name.clone(),
                    resource_group: c.resource_group.clone(),
                    id: format!("/fake/{}/{}", c.resource_group, c.name),
                })
            }
            DeployRequest::Source(src) => {
                self.with(|s| {
                    s.deployed_source = Some(src.source_dir.clone());
                    s.hosts.insert(
                        src.app_name.clone(),
                        format!("{}.azurewebsites.net", src.app_name),
                    );
                });
                Ok(ResourceRef {
                    kind: ResourceKind::WebApp,
                    name: src.app_name.clone(),
                    resource_group: src.resource_group.clone(),
                    id: format!("/fake/{}/{}", src.resource_group, src.app_name),
                })
            }
        }
    }

    async fn get_endpoint(&self, service: &ResourceRef) -> Result<Option<String>, ProviderError> {
        self.record(format!("endpoint {}", service.name));
        Ok(self.with(|s| {
            if s.no_endpoint {
                None
            } else {
                s.hosts.get(&service.name).cloned()
            }
        }))
    }
}

fn secret_values(settings: &RuntimeSettings) -> BTreeMap<String, String> {
    settings
        .secrets
        .iter()
        .map(|(k, v)| (k.clone(), v.expose_secret().to_owned()))
        .collect()
}

// ── Container engine ──

#[derive(Debug, Default)]
pub struct FakeEngine {
    calls: Mutex<Vec<String>>,
    /// Dockerfile found in the build context.
    pub dockerfile: Mutex<Option<String>>,
    /// Whether the build context contained the local secret file.
    pub context_had_env: Mutex<bool>,
    pub fail_push: bool,
}

impl FakeEngine {
    pub fn failing_push() -> Self {
        Self {
            fail_push: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ContainerEngine for FakeEngine {
    async fn build(&self, context_dir: &Path, tag: &str) -> Result<(), EngineError> {
        self.record(format!("build {tag}"));
        let dockerfile = context_dir.join("Dockerfile");
        if dockerfile.exists() {
            *self.dockerfile.lock().unwrap() = Some(std::fs::read_to_string(dockerfile).unwrap());
        }
        *self.context_had_env.lock().unwrap() = context_dir.join(".env").exists();
        Ok(())
    }

    async fn tag(&self, source: &str, target: &str) -> Result<(), EngineError> {
        self.record(format!("tag {source} {target}"));
        Ok(())
    }

    async fn login(&self, credential: &RegistryCredential) -> Result<(), EngineError> {
        self.record(format!("login {}", credential.login_server));
        Ok(())
    }

    async fn push(&self, image: &str) -> Result<(), EngineError> {
        self.record(format!("push {image}"));
        if self.fail_push {
            return Err(EngineError::Push {
                source: ExecError::CommandFailed {
                    command: "docker push".to_owned(),
                    stderr: "denied: requested access to the resource is denied".to_owned(),
                },
            });
        }
        Ok(())
    }
}

// ── Tool probe ──

#[derive(Debug, Default)]
pub struct FakeProbe {
    pub missing: Vec<&'static str>,
}

impl FakeProbe {
    pub fn missing(tool: &'static str) -> Self {
        Self {
            missing: vec![tool],
        }
    }
}

impl ToolProbe for FakeProbe {
    async fn probe(&self, tool: &str) -> Result<String, ExecError> {
        if self.missing.iter().any(|m| *m == tool) {
            Err(ExecError::NotFound {
                program: tool.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        } else {
            Ok(format!("{tool} 1.0.0"))
        }
    }
}
