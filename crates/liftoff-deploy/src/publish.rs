use liftoff_build::dockerfile::DockerfileGenerator;
use liftoff_build::{DockerfileSource, bundle, custom};
use liftoff_cloud::{ContainerEngine, ImageRef, RegistryCredential};
use liftoff_core::DeploymentConfig;

use crate::error::{DeployError, PublishStage};
use crate::progress::{Progress, Status};

/// Pushed image plus the login the runtime pulls it with.
#[derive(Debug)]
pub struct PublishedArtifact {
    pub image: ImageRef,
    pub credential: RegistryCredential,
}

/// Package, build, tag, log in, push. Takes ownership of the credential and
/// hands it on with the image.
pub async fn publish(
    engine: &impl ContainerEngine,
    config: &DeploymentConfig,
    credential: RegistryCredential,
    progress: &mut dyn Progress,
) -> Result<PublishedArtifact, DeployError> {
    let generator = DockerfileGenerator::new(&config.build, config.port, &config.startup_command);
    let (dockerfile, source) = custom::resolve_dockerfile(&config.project_dir, &generator)
        .map_err(|e| stage_failed(PublishStage::Package, e))?;
    match &source {
        DockerfileSource::Project(path) => progress.update(
            Status::Done,
            &format!("using project Dockerfile {}", path.display()),
        ),
        DockerfileSource::Generated => progress.update(Status::Done, "generated Dockerfile"),
    }

    let context = bundle::create_bundle(&config.project_dir, &config.build.include, Some(&dockerfile))
        .map_err(|e| stage_failed(PublishStage::Package, e))?;

    let image = ImageRef {
        registry: credential.login_server.clone(),
        repository: config.image_name.clone(),
        tag: config.image_tag.clone(),
    };
    let local = image.local();
    let remote = image.to_string();

    progress.update(Status::Running, &format!("building {local}"));
    engine
        .build(&context, &local)
        .await
        .map_err(|e| stage_failed(PublishStage::Build, e))?;

    engine
        .tag(&local, &remote)
        .await
        .map_err(|e| stage_failed(PublishStage::Tag, e))?;

    engine
        .login(&credential)
        .await
        .map_err(|e| stage_failed(PublishStage::Login, e))?;

    progress.update(Status::Running, &format!("pushing {remote}"));
    engine
        .push(&remote)
        .await
        .map_err(|e| stage_failed(PublishStage::Push, e))?;
    progress.update(Status::Done, &format!("pushed {remote}"));

    Ok(PublishedArtifact { image, credential })
}

fn stage_failed(
    stage: PublishStage,
    err: impl std::error::Error + Send + Sync + 'static,
) -> DeployError {
    DeployError::PublishFailed {
        stage,
        source: Box::new(err),
    }
}
