use liftoff_cloud::{CloudProvider, ProviderError};

use crate::error::DeployError;
use crate::progress::{Progress, Status};

/// Reuse an active session, or run interactive login once and re-check.
pub async fn ensure_session(
    provider: &impl CloudProvider,
    progress: &mut dyn Progress,
) -> Result<String, DeployError> {
    let failed = |e: ProviderError| DeployError::AuthenticationFailed { source: Some(e) };

    if let Some(account) = provider.current_account().await.map_err(failed)? {
        progress.update(Status::Skipped, &format!("already signed in as {account}"));
        return Ok(account);
    }

    progress.update(Status::Running, "no active session, starting interactive login");
    provider.login().await.map_err(failed)?;

    match provider.current_account().await.map_err(failed)? {
        Some(account) => {
            progress.update(Status::Done, &format!("signed in as {account}"));
            Ok(account)
        }
        None => Err(DeployError::AuthenticationFailed { source: None }),
    }
}
