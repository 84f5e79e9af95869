use fogros_models::{CommandOutput, ProvisionError, ProvisionerConfig};
use fogros_packaging::{render_recipe, ImageBuilder, DOCKERFILE_TEMPLATE};
use fogros_testsupport::{read_to_string, FakeRunner};
use std::sync::Arc;

#[tokio::test]
async fn render_writes_exact_template() {
    let ws = tempfile::tempdir().unwrap();
    let rendered = render_recipe(ws.path()).await.unwrap();

    assert_eq!(rendered.path, ws.path().join("Dockerfile"));
    let on_disk = std::fs::read(&rendered.path).unwrap();
    assert_eq!(on_disk, DOCKERFILE_TEMPLATE.as_bytes());
}

#[tokio::test]
async fn render_twice_overwrites() {
    let ws = tempfile::tempdir().unwrap();
    std::fs::write(ws.path().join("Dockerfile"), "FROM stale\n".repeat(200)).unwrap();

    render_recipe(ws.path()).await.unwrap();
    render_recipe(ws.path()).await.unwrap();

    assert_eq!(read_to_string(&ws.path().join("Dockerfile")), DOCKERFILE_TEMPLATE);
}

#[tokio::test]
async fn render_into_missing_workspace_is_io_error() {
    let ws = tempfile::tempdir().unwrap();
    let missing = ws.path().join("does-not-exist");

    let err = render_recipe(&missing).await.unwrap_err();
    match err {
        ProvisionError::Io { path, .. } => assert!(path.ends_with("Dockerfile")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn failed_build_maps_to_build_failed() {
    let runner = FakeRunner::new();
    runner
        .fail_on("build", CommandOutput::failure(1, "failed to solve: install not found"))
        .await;
    let builder = ImageBuilder::new(Arc::new(runner.clone()), &ProvisionerConfig::default());

    let err = builder
        .build_image(std::path::Path::new("/tmp/ws"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisionError::BuildFailed { ref stderr } if stderr.contains("install not found")));
    assert_eq!(runner.calls().await.len(), 1);
}

#[tokio::test]
async fn failed_push_maps_to_push_failed() {
    let runner = FakeRunner::new();
    runner
        .fail_on("push", CommandOutput::failure(1, "no basic auth credentials"))
        .await;
    let builder = ImageBuilder::new(Arc::new(runner.clone()), &ProvisionerConfig::default());

    builder.tag_image("repo/fogros_lambda:3").await.unwrap();
    let err = builder.push_image("repo/fogros_lambda:3").await.unwrap_err();
    assert_eq!(err.step(), "push");
    assert_eq!(runner.count_matching("push").await, 1);
}

#[tokio::test]
async fn missing_docker_is_spawn_error() {
    let runner = FakeRunner::new();
    runner.spawn_error_on("docker").await;
    let builder = ImageBuilder::new(Arc::new(runner), &ProvisionerConfig::default());

    let err = builder.tag_image("repo:1").await.unwrap_err();
    assert!(matches!(err, ProvisionError::CommandSpawn { ref program, .. } if program == "docker"));
}
