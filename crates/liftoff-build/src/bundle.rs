use std::path::{Component, Path, PathBuf};

/// Build context directory, relative to the project directory.
pub const BUNDLE_DIR: &str = ".liftoff-bundle";

/// Names never copied into a bundle, even when listed or nested in an
/// included directory.
const LIFTOFF_EXCLUDES: &[&str] = &[BUNDLE_DIR, ".git", ".env", "__pycache__"];

/// Bundles the files listed in the packaging manifest into `.liftoff-bundle/`.
///
/// Every `include` entry is copied (directories recursively). When
/// `dockerfile_content` is given it is written as the bundle's Dockerfile;
/// the platform topology ships source without one.
pub fn create_bundle(
    project_dir: &Path,
    include: &[String],
    dockerfile_content: Option<&str>,
) -> Result<PathBuf, BundleError> {
    let bundle_dir = project_dir.join(BUNDLE_DIR);

    // Clean previous bundle
    if bundle_dir.exists() {
        std::fs::remove_dir_all(&bundle_dir).map_err(|e| BundleError::Cleanup {
            path: bundle_dir.clone(),
            source: e,
        })?;
    }
    std::fs::create_dir_all(&bundle_dir).map_err(|e| BundleError::Create {
        path: bundle_dir.clone(),
        source: e,
    })?;

    for entry in include {
        let relative = validate_include(entry)?;

        if is_excluded(&relative) {
            tracing::warn!(path = %entry, "excluded path listed in build include, skipping");
            continue;
        }

        let src = project_dir.join(&relative);
        if !src.exists() {
            return Err(BundleError::MissingInclude { path: src });
        }

        copy_path(&src, &bundle_dir.join(&relative))?;
    }

    if let Some(content) = dockerfile_content {
        let path = bundle_dir.join("Dockerfile");
        std::fs::write(&path, content)
            .map_err(|e| BundleError::WriteDockerfile { path, source: e })?;
    }

    tracing::debug!(dir = %bundle_dir.display(), entries = include.len(), "bundle created");
    Ok(bundle_dir)
}

/// Reject absolute paths and `..` so a manifest can only reach inside the project.
fn validate_include(entry: &str) -> Result<PathBuf, BundleError> {
    let path = PathBuf::from(entry.trim_end_matches('/'));
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if path.as_os_str().is_empty() || escapes {
        return Err(BundleError::InvalidInclude {
            path: entry.to_owned(),
        });
    }
    Ok(path)
}

fn is_excluded(relative: &Path) -> bool {
    relative.components().any(|c| match c {
        Component::Normal(name) => LIFTOFF_EXCLUDES.iter().any(|ex| name == *ex),
        _ => false,
    })
}

fn copy_path(src: &Path, dst: &Path) -> Result<(), BundleError> {
    if src.is_dir() {
        std::fs::create_dir_all(dst).map_err(|e| BundleError::Create {
            path: dst.to_path_buf(),
            source: e,
        })?;
        let entries = std::fs::read_dir(src).map_err(|e| BundleError::ReadDir {
            path: src.to_path_buf(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| BundleError::ReadDir {
                path: src.to_path_buf(),
                source: e,
            })?;
            let name = entry.file_name();
            if LIFTOFF_EXCLUDES.iter().any(|ex| name == *ex) {
                continue;
            }
            copy_path(&entry.path(), &dst.join(&name))?;
        }
        return Ok(());
    }

    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| BundleError::Create {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::copy(src, dst).map_err(|e| BundleError::CopyFile {
        path: src.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to clean up bundle directory {path}")]
    Cleanup {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create directory {path}")]
    Create {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read directory {path}")]
    ReadDir {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy file {path}")]
    CopyFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write Dockerfile at {path}")]
    WriteDockerfile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("build include {path} does not exist")]
    MissingInclude { path: std::path::PathBuf },
    #[error("invalid build include {path:?}: must be a relative path inside the project")]
    InvalidInclude { path: String },
}
