use fogros_invoker::CommandRunner;
use fogros_models::{CommandSpec, ProvisionError, ProvisionerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::recipe::dockerfile_path;

/// Builds the workspace image locally, then tags and pushes it to the
/// registry through the docker CLI.
pub struct ImageBuilder {
    runner: Arc<dyn CommandRunner>,
    docker: String,
    local_image: String,
}

impl ImageBuilder {
    pub fn new(runner: Arc<dyn CommandRunner>, config: &ProvisionerConfig) -> Self {
        Self {
            runner,
            docker: config.tools.docker.clone(),
            local_image: config.registry.local_image.clone(),
        }
    }

    pub fn build_command(&self, workspace: &Path) -> CommandSpec {
        let dockerfile: PathBuf = dockerfile_path(workspace);
        CommandSpec::new(&self.docker)
            .arg("build")
            .args(["-t", self.local_image.as_str()])
            .arg("-f")
            .arg(dockerfile.display().to_string())
            .arg(workspace.display().to_string())
            .current_dir(workspace)
    }

    pub fn tag_command(&self, image_ref: &str) -> CommandSpec {
        CommandSpec::new(&self.docker)
            .arg("tag")
            .arg(format!("{}:latest", self.local_image))
            .arg(image_ref)
    }

    pub fn push_command(&self, image_ref: &str) -> CommandSpec {
        CommandSpec::new(&self.docker).arg("push").arg(image_ref)
    }

    #[instrument(skip(self, workspace), fields(workspace = %workspace.display()))]
    pub async fn build_image(&self, workspace: &Path) -> Result<(), ProvisionError> {
        info!("Building Docker image: {}", self.local_image);
        info!("Build context: {:?}", workspace);

        let output = self.runner.run(self.build_command(workspace)).await?;
        if !output.is_success() {
            error!("Docker build failed - stdout: {}", output.stdout);
            error!("Docker build failed - stderr: {}", output.stderr);
            return Err(ProvisionError::BuildFailed {
                stderr: output.failure_reason(),
            });
        }

        info!("Built Docker image: {}", self.local_image);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn tag_image(&self, image_ref: &str) -> Result<(), ProvisionError> {
        let output = self.runner.run(self.tag_command(image_ref)).await?;
        if !output.is_success() {
            error!("Docker tag failed - stderr: {}", output.stderr);
            return Err(ProvisionError::TagFailed {
                stderr: output.failure_reason(),
            });
        }
        info!("Tagged {}:latest as {}", self.local_image, image_ref);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn push_image(&self, image_ref: &str) -> Result<(), ProvisionError> {
        let output = self.runner.run(self.push_command(image_ref)).await?;
        if !output.is_success() {
            error!("Docker push failed - stderr: {}", output.stderr);
            return Err(ProvisionError::PushFailed {
                stderr: output.failure_reason(),
            });
        }
        info!("Pushed Docker image: {}", image_ref);
        Ok(())
    }
}
