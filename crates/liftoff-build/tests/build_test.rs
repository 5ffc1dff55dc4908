use std::path::Path;

use liftoff_build::bundle::{BUNDLE_DIR, BundleError, create_bundle};
use liftoff_build::custom::{has_custom_dockerfile, resolve_dockerfile};
use liftoff_build::{DockerfileGenerator, DockerfileSource};
use liftoff_core::BuildConfig;
use tempfile::TempDir;

fn includes(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| (*p).to_owned()).collect()
}

/// Lay out a minimal copy of the served application.
fn init_app_project(dir: &Path) {
    std::fs::create_dir_all(dir.join("templates")).unwrap();
    std::fs::write(dir.join("web_viewer.py"), "print('viewer')").unwrap();
    std::fs::write(dir.join("llm_client.py"), "API = None").unwrap();
    std::fs::write(dir.join("requirements.txt"), "anthropic\nopenpyxl\n").unwrap();
    std::fs::write(dir.join("templates/index.html"), "<html></html>").unwrap();
    std::fs::write(dir.join(".env"), "ANTHROPIC_API_KEY=secret").unwrap();
}

// ── Dockerfile Generation Tests ──

#[test]
fn dockerfile_uses_configured_base_image() {
    let config = BuildConfig {
        base_image: "python:3.12-alpine".to_owned(),
        ..Default::default()
    };
    let output = DockerfileGenerator::new(&config, 8080, "python web_viewer.py").render();

    assert!(output.starts_with("FROM python:3.12-alpine\n"));
}

#[test]
fn dockerfile_installs_requirements_when_included() {
    let config = BuildConfig::default();
    let output = DockerfileGenerator::new(&config, 8080, "python web_viewer.py").render();

    assert!(output.contains("COPY requirements.txt requirements.txt"));
    assert!(output.contains("pip install --no-cache-dir -r requirements.txt"));
}

#[test]
fn dockerfile_skips_pip_without_requirements() {
    let config = BuildConfig {
        include: includes(&["web_viewer.py"]),
        ..Default::default()
    };
    let output = DockerfileGenerator::new(&config, 8080, "python web_viewer.py").render();

    assert!(!output.contains("pip install"));
}

#[test]
fn dockerfile_includes_extra_packages() {
    let config = BuildConfig {
        extra_packages: vec!["poppler-utils".to_owned(), "libgl1".to_owned()],
        ..Default::default()
    };
    let output = DockerfileGenerator::new(&config, 8080, "python web_viewer.py").render();

    assert!(output.contains("apt-get install -y --no-install-recommends poppler-utils libgl1"));
}

#[test]
fn dockerfile_no_extra_packages_when_empty() {
    let config = BuildConfig::default();
    let output = DockerfileGenerator::new(&config, 8080, "python web_viewer.py").render();

    assert!(!output.contains("apt-get install"));
}

#[test]
fn dockerfile_exposes_configured_port() {
    let config = BuildConfig::default();
    let output = DockerfileGenerator::new(&config, 3000, "python web_viewer.py").render();

    assert!(output.contains("EXPOSE 3000"));
    assert!(output.contains("ENV PORT=3000"));
    assert!(!output.contains("EXPOSE 8080"));
}

#[test]
fn dockerfile_cmd_uses_startup_command() {
    let config = BuildConfig::default();
    let output = DockerfileGenerator::new(&config, 8080, "gunicorn -b 0.0.0.0:8080 app:app").render();

    assert!(output.contains(r#"CMD ["gunicorn", "-b", "0.0.0.0:8080", "app:app"]"#));
}

#[test]
fn dockerfile_cmd_leaves_quoted_arguments_to_the_shell() {
    let config = BuildConfig::default();
    let output =
        DockerfileGenerator::new(&config, 8080, r#"gunicorn -b "0.0.0.0:8080" app:app"#).render();

    assert!(output.contains("CMD gunicorn -b \"0.0.0.0:8080\" app:app\n"));
    assert!(!output.contains(r#""\"0.0.0.0:8080\"""#));
}

// ── Custom Dockerfile Tests ──

#[test]
fn resolve_prefers_project_dockerfile() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("Dockerfile"), "FROM scratch\n").unwrap();
    let config = BuildConfig::default();
    let generator = DockerfileGenerator::new(&config, 8080, "python web_viewer.py");

    let (content, source) = resolve_dockerfile(tmp.path(), &generator).unwrap();

    assert!(has_custom_dockerfile(tmp.path()));
    assert_eq!(content, "FROM scratch\n");
    assert_eq!(source, DockerfileSource::Project(tmp.path().join("Dockerfile")));
}

#[test]
fn resolve_generates_without_project_dockerfile() {
    let tmp = TempDir::new().unwrap();
    let config = BuildConfig::default();
    let generator = DockerfileGenerator::new(&config, 8080, "python web_viewer.py");

    let (content, source) = resolve_dockerfile(tmp.path(), &generator).unwrap();

    assert!(!has_custom_dockerfile(tmp.path()));
    assert_eq!(source, DockerfileSource::Generated);
    assert_eq!(content, generator.render());
}

// ── Bundle Tests ──

#[test]
fn bundle_copies_listed_files_and_dockerfile() {
    let tmp = TempDir::new().unwrap();
    init_app_project(tmp.path());

    let bundle = create_bundle(
        tmp.path(),
        &includes(&["web_viewer.py", "requirements.txt"]),
        Some("FROM python:3.11-slim\n"),
    )
    .unwrap();

    assert_eq!(bundle, tmp.path().join(BUNDLE_DIR));
    assert!(bundle.join("web_viewer.py").exists());
    assert!(bundle.join("requirements.txt").exists());
    assert!(!bundle.join("llm_client.py").exists());
    assert_eq!(
        std::fs::read_to_string(bundle.join("Dockerfile")).unwrap(),
        "FROM python:3.11-slim\n"
    );
}

#[test]
fn bundle_without_dockerfile_for_source_push() {
    let tmp = TempDir::new().unwrap();
    init_app_project(tmp.path());

    let bundle = create_bundle(tmp.path(), &includes(&["web_viewer.py"]), None).unwrap();

    assert!(bundle.join("web_viewer.py").exists());
    assert!(!bundle.join("Dockerfile").exists());
}

#[test]
fn bundle_copies_directories_recursively() {
    let tmp = TempDir::new().unwrap();
    init_app_project(tmp.path());

    let bundle = create_bundle(tmp.path(), &includes(&["templates/"]), None).unwrap();

    assert_eq!(
        std::fs::read_to_string(bundle.join("templates/index.html")).unwrap(),
        "<html></html>"
    );
}

#[test]
fn bundle_never_copies_secret_file() {
    let tmp = TempDir::new().unwrap();
    init_app_project(tmp.path());
    std::fs::create_dir_all(tmp.path().join("conf")).unwrap();
    std::fs::write(tmp.path().join("conf/.env"), "X=1").unwrap();
    std::fs::write(tmp.path().join("conf/app.ini"), "[app]").unwrap();

    let bundle = create_bundle(tmp.path(), &includes(&[".env", "conf"]), None).unwrap();

    assert!(!bundle.join(".env").exists());
    assert!(!bundle.join("conf/.env").exists());
    assert!(bundle.join("conf/app.ini").exists());
}

#[test]
fn bundle_missing_include_fails() {
    let tmp = TempDir::new().unwrap();
    init_app_project(tmp.path());

    let err = create_bundle(tmp.path(), &includes(&["nope.py"]), None).unwrap_err();

    assert!(matches!(err, BundleError::MissingInclude { .. }));
}

#[test]
fn bundle_rejects_paths_outside_project() {
    let tmp = TempDir::new().unwrap();
    init_app_project(tmp.path());

    let err = create_bundle(tmp.path(), &includes(&["../etc/passwd"]), None).unwrap_err();
    assert!(matches!(err, BundleError::InvalidInclude { .. }));

    let err = create_bundle(tmp.path(), &includes(&["/etc/passwd"]), None).unwrap_err();
    assert!(matches!(err, BundleError::InvalidInclude { .. }));
}

#[test]
fn bundle_cleans_previous_bundle() {
    let tmp = TempDir::new().unwrap();
    init_app_project(tmp.path());
    let stale = tmp.path().join(BUNDLE_DIR).join("stale.txt");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, "old").unwrap();

    create_bundle(tmp.path(), &includes(&["web_viewer.py"]), None).unwrap();

    assert!(!stale.exists());
}
