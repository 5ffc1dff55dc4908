mod common;

use std::path::Path;

use common::{FakeCloud, FakeProbe, project};
use liftoff_cloud::{
    CloudProvider, ContainerEngine, DeployRequest, EngineError, ProviderError, RegistryCredential,
    ResourceKind, ResourceRef, ResourceSpec, RuntimeSettings,
};
use liftoff_core::Topology;
use liftoff_deploy::strategy::{AppServiceStrategy, ContainerInstanceStrategy};
use liftoff_deploy::{Phase, Pipeline, provision};
use mockall::{Sequence, mock};
use secrecy::SecretString;

mock! {
    Provider {}

    impl CloudProvider for Provider {
        async fn current_account(&self) -> Result<Option<String>, ProviderError>;
        async fn login(&self) -> Result<(), ProviderError>;
        async fn find_resource(&self, spec: &ResourceSpec) -> Result<Option<ResourceRef>, ProviderError>;
        async fn create_resource(&self, spec: &ResourceSpec) -> Result<ResourceRef, ProviderError>;
        async fn get_credentials(&self, registry: &ResourceRef) -> Result<RegistryCredential, ProviderError>;
        async fn apply_settings(&self, target: &ResourceRef, settings: &RuntimeSettings) -> Result<(), ProviderError>;
        async fn deploy(&self, request: &DeployRequest) -> Result<ResourceRef, ProviderError>;
        async fn get_endpoint(&self, service: &ResourceRef) -> Result<Option<String>, ProviderError>;
    }
}

mock! {
    Engine {}

    impl ContainerEngine for Engine {
        async fn build(&self, context_dir: &Path, tag: &str) -> Result<(), EngineError>;
        async fn tag(&self, source: &str, target: &str) -> Result<(), EngineError>;
        async fn login(&self, credential: &RegistryCredential) -> Result<(), EngineError>;
        async fn push(&self, image: &str) -> Result<(), EngineError>;
    }
}

fn credential() -> RegistryCredential {
    RegistryCredential {
        login_server: "pdfvieweracrrun42.azurecr.io".to_owned(),
        username: "pdfvieweracrrun42".to_owned(),
        password: SecretString::from("registry-password"),
    }
}

#[tokio::test]
async fn registry_credentials_are_fetched_before_the_image_is_built() {
    let (_dir, config) = project(Topology::Container, "API_KEY=abc123\n");
    let mut provider = MockProvider::new();
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();

    provider
        .expect_current_account()
        .returning(|| Ok(Some("operator@example.com".to_owned())));
    provider.expect_login().never();
    provider.expect_find_resource().returning(|_| Ok(None));
    provider
        .expect_create_resource()
        .returning(|spec| Ok(spec.to_ref(format!("/subscriptions/s/{}", spec.name()))));
    provider
        .expect_get_credentials()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(credential()));
    engine
        .expect_build()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    engine
        .expect_tag()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    engine
        .expect_login()
        .withf(|c| c.login_server == "pdfvieweracrrun42.azurecr.io")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    engine
        .expect_push()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    provider
        .expect_deploy()
        .withf(|request| {
            matches!(
                request,
                DeployRequest::Container(c)
                    if c.image.starts_with("pdfvieweracrrun42.azurecr.io/")
                        && c.credential.username == "pdfvieweracrrun42"
            )
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| {
            Ok(ResourceRef {
                kind: ResourceKind::ContainerInstance,
                name: "pdf-viewer-run42".to_owned(),
                resource_group: "pdf-viewer-rg".to_owned(),
                id: "/subscriptions/s/pdf-viewer-run42".to_owned(),
            })
        });
    provider.expect_apply_settings().never();
    provider
        .expect_get_endpoint()
        .times(1)
        .returning(|_| Ok(Some("pdf-viewer-run42.eastus.azurecontainer.io".to_owned())));

    let mut lines: Vec<String> = Vec::new();
    let deployment = Pipeline::new(
        &provider,
        &engine,
        &FakeProbe::default(),
        &ContainerInstanceStrategy,
        &config,
    )
    .run(&mut lines)
    .await
    .unwrap();

    assert_eq!(deployment.completed, Phase::ALL.to_vec());
    assert_eq!(
        deployment.endpoint.url,
        "http://pdf-viewer-run42.eastus.azurecontainer.io:8080"
    );
}

#[tokio::test]
async fn provisioning_twice_creates_group_and_plan_once() {
    let (_dir, config) = project(Topology::AppService, "API_KEY=abc123\n");
    let cloud = FakeCloud::signed_in();
    let mut first: Vec<String> = Vec::new();
    let mut second: Vec<String> = Vec::new();

    for lines in [&mut first, &mut second] {
        provision::ensure_group(&cloud, &config, &mut *lines)
            .await
            .unwrap();
        provision::ensure_compute(&cloud, &AppServiceStrategy, &config, &mut *lines)
            .await
            .unwrap();
    }

    assert_eq!(cloud.count(ResourceKind::ResourceGroup), 1);
    assert_eq!(cloud.count(ResourceKind::AppServicePlan), 1);
    assert!(first.iter().any(|l| l.starts_with("[ok] created resource group")));
    assert_eq!(
        second.iter().filter(|l| l.ends_with("already exists")).count(),
        3
    );
}

#[tokio::test]
async fn provision_failure_names_the_resource() {
    let (_dir, config) = project(Topology::Container, "API_KEY=abc123\n");
    let mut provider = MockProvider::new();
    provider.expect_find_resource().returning(|_| Ok(None));
    provider.expect_create_resource().returning(|_| {
        Err(ProviderError::UnexpectedOutput {
            operation: "create resource group".to_owned(),
            detail: "AuthorizationFailed".to_owned(),
        })
    });

    let mut lines: Vec<String> = Vec::new();
    let err = provision::ensure_group(&provider, &config, &mut lines)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("failed to provision resource group '{}'", config.resource_group)
    );
}
