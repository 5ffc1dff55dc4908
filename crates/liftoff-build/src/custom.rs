use std::path::{Path, PathBuf};

use crate::dockerfile::DockerfileGenerator;

/// Where the Dockerfile for a build came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerfileSource {
    /// The project ships its own Dockerfile.
    Project(PathBuf),
    /// Rendered by [`DockerfileGenerator`].
    Generated,
}

/// Check whether the project has its own Dockerfile.
pub fn has_custom_dockerfile(project_dir: &Path) -> bool {
    project_dir.join("Dockerfile").is_file()
}

/// Use the project's Dockerfile when present, otherwise render one.
pub fn resolve_dockerfile(
    project_dir: &Path,
    generator: &DockerfileGenerator<'_>,
) -> Result<(String, DockerfileSource), CustomDockerfileError> {
    if has_custom_dockerfile(project_dir) {
        let path = project_dir.join("Dockerfile");
        let content = std::fs::read_to_string(&path).map_err(|e| CustomDockerfileError::Read {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "using project Dockerfile");
        Ok((content, DockerfileSource::Project(path)))
    } else {
        Ok((generator.render(), DockerfileSource::Generated))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CustomDockerfileError {
    #[error("failed to read project Dockerfile at {path}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}
