use liftoff_cloud::{AzureProvider, CheckResult, SystemProbe, ToolProbe};
use liftoff_core::Topology;

use super::{Overrides, Project};

pub async fn doctor(project: &Project) -> anyhow::Result<()> {
    let client = AzureProvider::new();
    let mut report = client.doctor().await;

    let config = project.load_config();
    let topology = config
        .as_ref()
        .map(|c| c.project.topology)
        // arch-lint: allow(no-silent-result-drop) reason="a broken config is reported by the secrets file check below"
        .unwrap_or_default();

    report.docker = match SystemProbe.probe("docker").await {
        Ok(version) => CheckResult::ok(&version),
        Err(_) if topology == Topology::AppService => {
            CheckResult::ok("not installed (not needed for app-service)")
        }
        Err(e) => CheckResult::fail(&e.to_string()),
    };

    report.secrets_file = match config {
        Ok(config) => {
            let deployment = Overrides::default().resolve(config, project);
            let path = deployment.secrets_file;
            if path.is_file() {
                CheckResult::ok(&path.display().to_string())
            } else {
                CheckResult::fail(&format!("not found at {}", path.display()))
            }
        }
        Err(e) => CheckResult::fail(&e.to_string()),
    };

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed — see above for details");
    }

    Ok(())
}
