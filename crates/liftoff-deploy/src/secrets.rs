use liftoff_core::{DeploymentConfig, SecretSet};

use crate::error::DeployError;
use crate::progress::{Progress, Status};

/// Read the local secret file and check the required keys.
///
/// Only key names are reported; values stay inside the returned set.
pub async fn load(
    config: &DeploymentConfig,
    progress: &mut dyn Progress,
) -> Result<SecretSet, DeployError> {
    let secrets = SecretSet::load(&config.secrets_file, &config.required_secrets)
        .map_err(DeployError::from_secrets)?;

    let keys: Vec<&str> = secrets.keys().collect();
    progress.update(
        Status::Done,
        &format!(
            "loaded {} secret(s) from {}: {}",
            secrets.len(),
            config.secrets_file.display(),
            keys.join(", ")
        ),
    );
    Ok(secrets)
}
