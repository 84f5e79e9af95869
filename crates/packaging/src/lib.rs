pub mod image_builder;
pub mod recipe;

pub use image_builder::*;
pub use recipe::*;

#[cfg(test)]
mod tests {
    use super::*;
    use fogros_models::ProvisionerConfig;
    use fogros_testsupport::FakeRunner;
    use std::path::Path;
    use std::sync::Arc;

    #[test]
    fn test_recipe_shape() {
        assert!(DOCKERFILE_TEMPLATE.contains("FROM ${BASE_IMAGE} as build-image"));
        assert!(DOCKERFILE_TEMPLATE.contains("COPY ./install ./install"));
        assert!(DOCKERFILE_TEMPLATE
            .contains(r#"ENTRYPOINT [ "/usr/bin/python3", "-m", "awslambdaric" ]"#));
        assert!(!DOCKERFILE_TEMPLATE.contains("{}"));
    }

    #[test]
    fn test_recipe_sha256_stable() {
        let digest = recipe_sha256();
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, recipe_sha256());
    }

    #[test]
    fn test_build_command_references_workspace() {
        let builder = ImageBuilder::new(
            Arc::new(FakeRunner::new()),
            &ProvisionerConfig::default(),
        );
        let spec = builder.build_command(Path::new("/tmp/ws"));
        assert_eq!(spec.program, "docker");
        assert_eq!(
            spec.args,
            vec![
                "build",
                "-t",
                "fogros-lambda-image",
                "-f",
                "/tmp/ws/Dockerfile",
                "/tmp/ws"
            ]
        );
        assert_eq!(spec.current_dir.as_deref(), Some(Path::new("/tmp/ws")));
    }

    #[test]
    fn test_tag_and_push_commands() {
        let builder = ImageBuilder::new(
            Arc::new(FakeRunner::new()),
            &ProvisionerConfig::default(),
        );
        let image = "registry.example/fogros_lambda:42";
        assert_eq!(
            builder.tag_command(image).args,
            vec!["tag", "fogros-lambda-image:latest", image]
        );
        assert_eq!(builder.push_command(image).args, vec!["push", image]);
    }
}
