use std::collections::BTreeMap;

use liftoff_cloud::{CloudProvider, ResourceRef, RuntimeSettings};
use liftoff_core::{DeploymentConfig, SecretSet};
use secrecy::{ExposeSecret, SecretString};

use crate::error::DeployError;
use crate::progress::{Progress, Status};
use crate::strategy::DeploymentStrategy;

/// Operational environment plus every loaded secret. A secret wins over a
/// plain variable of the same name.
pub fn runtime_settings(config: &DeploymentConfig, secrets: &SecretSet) -> RuntimeSettings {
    let mut env = config.operational_env();
    let secrets: BTreeMap<String, SecretString> = secrets
        .iter()
        .map(|(key, value)| {
            env.remove(key);
            (
                key.to_owned(),
                SecretString::from(value.expose_secret().to_owned()),
            )
        })
        .collect();

    RuntimeSettings {
        env,
        secrets,
        startup_command: config.startup_command.clone(),
        port: config.port,
    }
}

/// Overwrite settings on the strategy's target, or stage them for the deploy
/// request when the topology has none.
pub async fn apply(
    provider: &impl CloudProvider,
    strategy: &dyn DeploymentStrategy,
    resources: &[ResourceRef],
    settings: RuntimeSettings,
    progress: &mut dyn Progress,
) -> Result<RuntimeSettings, DeployError> {
    let keys = settings.keys().collect::<Vec<_>>().join(", ");

    match strategy.settings_target(resources) {
        Some(target) => {
            provider
                .apply_settings(target, &settings)
                .await
                .map_err(|e| DeployError::ConfigureFailed {
                    target: target.to_string(),
                    source: e,
                })?;
            progress.update(
                Status::Done,
                &format!("applied settings to {target}: {keys}"),
            );
        }
        None => {
            progress.update(
                Status::Done,
                &format!("staged settings for container create: {keys}"),
            );
        }
    }

    Ok(settings)
}
