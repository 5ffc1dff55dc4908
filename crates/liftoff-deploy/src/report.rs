use liftoff_cloud::ResourceKind;
use liftoff_core::DeploymentConfig;

use crate::execute::Endpoint;
use crate::strategy::DeploymentStrategy;

/// Final operator summary: where the service lives and what to run next.
pub fn render(
    config: &DeploymentConfig,
    strategy: &dyn DeploymentStrategy,
    endpoint: &Endpoint,
) -> String {
    let rg = &config.resource_group;
    let name = &config.app_name;
    let topology = strategy.topology();

    let mut out = String::new();
    out.push_str(&format!("Deployed {name} ({topology})\n"));
    out.push_str(&format!("  URL:            {}\n", endpoint.url));
    out.push_str(&format!("  Resource group: {rg}\n"));
    out.push_str(&format!("  Run token:      {}\n", config.token));
    out.push('\n');
    out.push_str("Next steps:\n");
    out.push_str(&format!(
        "  Logs:      liftoff logs --run-token {} --topology {topology} --follow\n",
        config.token
    ));
    out.push_str(&format!("             (or: {})\n", raw_logs_command(strategy, rg, name)));
    out.push_str(&format!(
        "  Redeploy:  LIFTOFF_RUN_TOKEN={} liftoff deploy\n",
        config.token
    ));
    out.push_str(&format!(
        "  Tear down: liftoff destroy  (or: az group delete --name {rg} --yes --no-wait)\n"
    ));
    out.push_str(&format!(
        "  Avoid concurrent deploys into {rg}; runs are not locked against each other.\n"
    ));
    out
}

fn raw_logs_command(strategy: &dyn DeploymentStrategy, rg: &str, name: &str) -> String {
    match strategy.service_kind() {
        ResourceKind::WebApp => format!("az webapp log tail --resource-group {rg} --name {name}"),
        _ => format!("az container logs --resource-group {rg} --name {name} --follow"),
    }
}
