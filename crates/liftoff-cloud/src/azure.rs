use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ExecError;
use crate::executor::{CommandExecutor, RealExecutor};
use crate::provider::{
    CloudProvider, ContainerDeployment, DeployRequest, ProviderError, RegistryCredential,
    ResourceKind, ResourceRef, ResourceSpec, RuntimeSettings, SourceDeployment,
};

/// Resource provider namespaces the deployments rely on.
const REQUIRED_NAMESPACES: &[(&str, &str)] = &[
    ("Container Registry", "Microsoft.ContainerRegistry"),
    ("Container Instances", "Microsoft.ContainerInstance"),
    ("App Service", "Microsoft.Web"),
];

/// Azure operations through the `az` CLI, parameterized over the executor for testability.
pub struct AzureProvider<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl AzureProvider<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::new("az"),
        }
    }
}

impl Default for AzureProvider<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> AzureProvider<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Run a query that prints a single value; empty output becomes `None`.
    async fn query(
        &self,
        operation: &str,
        cmd: Vec<String>,
    ) -> Result<Option<String>, ProviderError> {
        let out = self
            .executor
            .exec(&cmd)
            .await
            .map_err(|e| ProviderError::command(operation, e))?;
        let value = out.trim();
        Ok((!value.is_empty()).then(|| value.to_owned()))
    }

    // ── Doctor ──

    /// Run all diagnostic checks without early return.
    /// Returns a report with pass/fail for each check item.
    pub async fn doctor(&self) -> DoctorReport {
        let mut report = DoctorReport::default();

        // 1. az CLI
        match self
            .executor
            .exec(&args(["version", "--query", "\"azure-cli\"", "--output", "tsv"]))
            .await
        {
            Ok(v) => report.az = CheckResult::ok(v.trim()),
            Err(e) => {
                report.az = CheckResult::fail(&e.to_string());
                return report;
            }
        }

        // 2. Active account
        match self
            .executor
            .exec(&args(["account", "show", "--query", "user.name", "--output", "tsv"]))
            .await
        {
            Ok(a) if !a.trim().is_empty() => report.account = CheckResult::ok(a.trim()),
            _ => {
                report.account = CheckResult::fail("no active session — run: az login");
                return report;
            }
        }

        // 3. Subscription
        match self
            .executor
            .exec(&args(["account", "show", "--query", "name", "--output", "tsv"]))
            .await
        {
            Ok(s) if !s.trim().is_empty() => report.subscription = CheckResult::ok(s.trim()),
            _ => report.subscription = CheckResult::fail("no default subscription"),
        }

        // 4. Resource providers
        for (label, namespace) in REQUIRED_NAMESPACES {
            let state = self
                .executor
                .exec(&args([
                    "provider",
                    "show",
                    "--namespace",
                    namespace,
                    "--query",
                    "registrationState",
                    "--output",
                    "tsv",
                ]))
                .await;

            let result = match state {
                Ok(s) if s.trim() == "Registered" => CheckResult::ok("Registered"),
                Ok(s) => CheckResult::fail(&format!(
                    "{} — run: az provider register --namespace {namespace}",
                    s.trim()
                )),
                Err(e) => CheckResult::fail(&e.to_string()),
            };
            report.providers.push(ProviderCheck {
                name: (*label).to_owned(),
                result,
            });
        }

        report
    }

    // ── Operator commands ──

    /// Stream logs of a deployed container instance or web app.
    pub async fn stream_logs(
        &self,
        kind: ResourceKind,
        resource_group: &str,
        name: &str,
        follow: bool,
    ) -> Result<(), ProviderError> {
        let mut cmd = match kind {
            ResourceKind::ContainerInstance => {
                args(["container", "logs", "--resource-group", resource_group, "--name", name])
            }
            ResourceKind::WebApp => {
                args(["webapp", "log", "tail", "--resource-group", resource_group, "--name", name])
            }
            other => {
                return Err(ProviderError::UnexpectedOutput {
                    operation: "read logs".to_owned(),
                    detail: format!("{other} has no log stream"),
                });
            }
        };
        if follow && kind == ResourceKind::ContainerInstance {
            cmd.push("--follow".to_owned());
        }

        self.executor
            .exec_streaming(&cmd)
            .await
            .map_err(|e| ProviderError::command("read logs", e))
    }

    /// Delete a resource group and everything in it.
    pub async fn delete_resource_group(&self, name: &str, wait: bool) -> Result<(), ProviderError> {
        let mut cmd = args(["group", "delete", "--name", name, "--yes"]);
        if !wait {
            cmd.push("--no-wait".to_owned());
        }

        self.executor
            .exec_streaming(&cmd)
            .await
            .map_err(|e| ProviderError::command("delete resource group", e))
    }

    // ── Deploy helpers ──

    async fn deploy_container(
        &self,
        request: &ContainerDeployment,
    ) -> Result<ResourceRef, ProviderError> {
        let cpu = request.cpu.to_string();
        let memory = request.memory_gb.to_string();
        let port = request.settings.port.to_string();
        let password = request.credential.password.expose_secret();

        let mut cmd = args([
            "container",
            "create",
            "--resource-group",
            &request.resource_group,
            "--name",
            &request.name,
            "--location",
            &request.location,
            "--image",
            &request.image,
            "--registry-login-server",
            &request.credential.login_server,
            "--registry-username",
            &request.credential.username,
            "--registry-password",
            password,
            "--dns-name-label",
            &request.dns_label,
            "--ports",
            &port,
            "--cpu",
            &cpu,
            "--memory",
            &memory,
            "--os-type",
            "Linux",
            "--ip-address",
            "Public",
            "--query",
            "id",
            "--output",
            "tsv",
        ]);

        if !request.settings.startup_command.is_empty() {
            cmd.push("--command-line".to_owned());
            cmd.push(request.settings.startup_command.clone());
        }
        if !request.settings.env.is_empty() {
            cmd.push("--environment-variables".to_owned());
            cmd.extend(request.settings.env.iter().map(|(k, v)| format!("{k}={v}")));
        }
        if !request.settings.secrets.is_empty() {
            cmd.push("--secure-environment-variables".to_owned());
            cmd.extend(
                request
                    .settings
                    .secrets
                    .iter()
                    .map(|(k, v)| format!("{k}={}", v.expose_secret())),
            );
        }

        let id = self
            .executor
            .exec(&cmd)
            .await
            .map_err(|e| ProviderError::command("container create", e))?;

        Ok(ResourceRef {
            kind: ResourceKind::ContainerInstance,
            name: request.name.clone(),
            resource_group: request.resource_group.clone(),
            id: id.trim().to_owned(),
        })
    }

    async fn deploy_source(&self, request: &SourceDeployment) -> Result<ResourceRef, ProviderError> {
        self.executor
            .exec_streaming_in(
                &request.source_dir,
                &args([
                    "webapp",
                    "up",
                    "--name",
                    &request.app_name,
                    "--resource-group",
                    &request.resource_group,
                    "--plan",
                    &request.plan,
                    "--runtime",
                    &request.runtime,
                    "--location",
                    &request.location,
                ]),
            )
            .await
            .map_err(|e| ProviderError::command("webapp up", e))?;

        let id = self
            .query(
                "webapp show",
                args([
                    "webapp",
                    "show",
                    "--name",
                    &request.app_name,
                    "--resource-group",
                    &request.resource_group,
                    "--query",
                    "id",
                    "--output",
                    "tsv",
                ]),
            )
            .await?
            .ok_or_else(|| ProviderError::UnexpectedOutput {
                operation: "webapp show".to_owned(),
                detail: format!("web app '{}' not found after deploy", request.app_name),
            })?;

        Ok(ResourceRef {
            kind: ResourceKind::WebApp,
            name: request.app_name.clone(),
            resource_group: request.resource_group.clone(),
            id,
        })
    }
}

impl<E: CommandExecutor> CloudProvider for AzureProvider<E> {
    async fn current_account(&self) -> Result<Option<String>, ProviderError> {
        match self
            .executor
            .exec(&args(["account", "show", "--query", "user.name", "--output", "tsv"]))
            .await
        {
            Ok(name) if !name.trim().is_empty() => Ok(Some(name.trim().to_owned())),
            Ok(_) => Ok(None),
            // `az account show` exits non-zero with "Please run 'az login'" when logged out
            Err(ExecError::CommandFailed { .. }) => Ok(None),
            Err(e) => Err(ProviderError::command("account show", e)),
        }
    }

    async fn login(&self) -> Result<(), ProviderError> {
        self.executor
            .exec_streaming(&args(["login"]))
            .await
            .map_err(|e| ProviderError::command("login", e))
    }

    async fn find_resource(
        &self,
        spec: &ResourceSpec,
    ) -> Result<Option<ResourceRef>, ProviderError> {
        let cmd = match spec {
            ResourceSpec::ResourceGroup { name, .. } => args([
                "group", "show", "--name", name, "--query", "id", "--output", "tsv",
            ]),
            ResourceSpec::Registry {
                name,
                resource_group,
                ..
            } => args([
                "acr",
                "show",
                "--name",
                name,
                "--resource-group",
                resource_group,
                "--query",
                "id",
                "--output",
                "tsv",
            ]),
            ResourceSpec::AppServicePlan {
                name,
                resource_group,
                ..
            } => args([
                "appservice",
                "plan",
                "show",
                "--name",
                name,
                "--resource-group",
                resource_group,
                "--query",
                "id",
                "--output",
                "tsv",
            ]),
            ResourceSpec::WebApp {
                name,
                resource_group,
                ..
            } => args([
                "webapp",
                "show",
                "--name",
                name,
                "--resource-group",
                resource_group,
                "--query",
                "id",
                "--output",
                "tsv",
            ]),
        };

        match self.executor.exec(&cmd).await {
            // `az appservice plan show` prints nothing and exits 0 for a missing plan
            Ok(id) if id.trim().is_empty() => Ok(None),
            Ok(id) => Ok(Some(spec.to_ref(id.trim()))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(ProviderError::command(format!("look up {}", spec.kind()), e)),
        }
    }

    async fn create_resource(&self, spec: &ResourceSpec) -> Result<ResourceRef, ProviderError> {
        let cmd = match spec {
            ResourceSpec::ResourceGroup { name, location } => args([
                "group",
                "create",
                "--name",
                name,
                "--location",
                location,
                "--query",
                "id",
                "--output",
                "tsv",
            ]),
            ResourceSpec::Registry {
                name,
                resource_group,
                location,
                sku,
            } => args([
                "acr",
                "create",
                "--name",
                name,
                "--resource-group",
                resource_group,
                "--location",
                location,
                "--sku",
                sku,
                "--admin-enabled",
                "true",
                "--query",
                "id",
                "--output",
                "tsv",
            ]),
            ResourceSpec::AppServicePlan {
                name,
                resource_group,
                location,
                sku,
            } => args([
                "appservice",
                "plan",
                "create",
                "--name",
                name,
                "--resource-group",
                resource_group,
                "--location",
                location,
                "--sku",
                sku,
                "--is-linux",
                "--query",
                "id",
                "--output",
                "tsv",
            ]),
            ResourceSpec::WebApp {
                name,
                resource_group,
                plan,
                runtime,
            } => args([
                "webapp",
                "create",
                "--name",
                name,
                "--resource-group",
                resource_group,
                "--plan",
                plan,
                "--runtime",
                runtime,
                "--query",
                "id",
                "--output",
                "tsv",
            ]),
        };

        let id = self
            .executor
            .exec(&cmd)
            .await
            .map_err(|e| ProviderError::command(format!("create {}", spec.kind()), e))?;

        Ok(spec.to_ref(id.trim()))
    }

    async fn get_credentials(
        &self,
        registry: &ResourceRef,
    ) -> Result<RegistryCredential, ProviderError> {
        let login_server = self
            .query(
                "acr show",
                args([
                    "acr",
                    "show",
                    "--name",
                    &registry.name,
                    "--resource-group",
                    &registry.resource_group,
                    "--query",
                    "loginServer",
                    "--output",
                    "tsv",
                ]),
            )
            .await?
            .ok_or_else(|| ProviderError::UnexpectedOutput {
                operation: "acr show".to_owned(),
                detail: "empty login server".to_owned(),
            })?;

        let raw = self
            .executor
            .exec(&args([
                "acr",
                "credential",
                "show",
                "--name",
                &registry.name,
                "--resource-group",
                &registry.resource_group,
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| ProviderError::command("acr credential show", e))?;

        let parsed: AcrCredentials =
            serde_json::from_str(&raw).map_err(|e| ProviderError::UnexpectedOutput {
                operation: "acr credential show".to_owned(),
                detail: e.to_string(),
            })?;

        let password = parsed
            .passwords
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::UnexpectedOutput {
                operation: "acr credential show".to_owned(),
                detail: "no passwords returned — is the admin user enabled?".to_owned(),
            })?;

        Ok(RegistryCredential {
            login_server,
            username: parsed.username,
            password: SecretString::from(password.value),
        })
    }

    async fn apply_settings(
        &self,
        target: &ResourceRef,
        settings: &RuntimeSettings,
    ) -> Result<(), ProviderError> {
        if target.kind != ResourceKind::WebApp {
            return Err(ProviderError::SettingsUnsupported { kind: target.kind });
        }

        let port = settings.port.to_string();
        let mut cmd = args([
            "webapp",
            "config",
            "appsettings",
            "set",
            "--name",
            &target.name,
            "--resource-group",
            &target.resource_group,
            "--output",
            "none",
            "--settings",
        ]);
        // App Service routes traffic to the container port named here
        cmd.push(format!("WEBSITES_PORT={port}"));
        cmd.extend(settings.env.iter().map(|(k, v)| format!("{k}={v}")));
        cmd.extend(
            settings
                .secrets
                .iter()
                .map(|(k, v)| format!("{k}={}", v.expose_secret())),
        );

        self.executor
            .exec(&cmd)
            .await
            .map_err(|e| ProviderError::command("webapp config appsettings set", e))?;

        if !settings.startup_command.is_empty() {
            self.executor
                .exec(&args([
                    "webapp",
                    "config",
                    "set",
                    "--name",
                    &target.name,
                    "--resource-group",
                    &target.resource_group,
                    "--startup-file",
                    &settings.startup_command,
                    "--output",
                    "none",
                ]))
                .await
                .map_err(|e| ProviderError::command("webapp config set", e))?;
        }

        Ok(())
    }

    async fn deploy(&self, request: &DeployRequest) -> Result<ResourceRef, ProviderError> {
        match request {
            DeployRequest::Container(c) => self.deploy_container(c).await,
            DeployRequest::Source(s) => self.deploy_source(s).await,
        }
    }

    async fn get_endpoint(&self, service: &ResourceRef) -> Result<Option<String>, ProviderError> {
        let (group, query) = match service.kind {
            ResourceKind::ContainerInstance => ("container", "ipAddress.fqdn"),
            ResourceKind::WebApp => ("webapp", "defaultHostName"),
            other => {
                return Err(ProviderError::UnexpectedOutput {
                    operation: "resolve endpoint".to_owned(),
                    detail: format!("{other} has no public endpoint"),
                });
            }
        };

        self.query(
            &format!("{group} show"),
            args([
                group,
                "show",
                "--name",
                &service.name,
                "--resource-group",
                &service.resource_group,
                "--query",
                query,
                "--output",
                "tsv",
            ]),
        )
        .await
    }
}

// ── Helper ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

#[derive(Deserialize)]
struct AcrCredentials {
    username: String,
    passwords: Vec<AcrPassword>,
}

#[derive(Deserialize)]
struct AcrPassword {
    value: String,
}

// ── Doctor types ──

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub az: CheckResult,
    pub docker: CheckResult,
    pub account: CheckResult,
    pub subscription: CheckResult,
    pub providers: Vec<ProviderCheck>,
    pub secrets_file: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.az.passed
            && self.docker.passed
            && self.account.passed
            && self.subscription.passed
            && self.secrets_file.passed
            && self.providers.iter().all(|p| p.result.passed)
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("az CLI", &self.az),
            ("docker", &self.docker),
            ("Account", &self.account),
            ("Subscription", &self.subscription),
            ("Secrets file", &self.secrets_file),
        ];
        for (label, check) in rows {
            writeln!(f, "[{}] {label:<22} {}", check.icon(), check.detail)?;
        }
        for p in &self.providers {
            writeln!(f, "[{}] {:<22} {}", p.result.icon(), p.name, p.result.detail)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderCheck {
    pub name: String,
    pub result: CheckResult,
}
