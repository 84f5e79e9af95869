use crate::lambda_cli::LambdaCli;
use crate::readiness::ReadinessStrategy;
use chrono::Utc;
use fogros_invoker::CommandRunner;
use fogros_models::{
    Identifiers, InstanceIdentity, ProvisionError, ProvisionReport, ProvisionerConfig,
};
use fogros_packaging::{render_recipe, ImageBuilder, RenderedRecipe};
use fogros_telemetry::TracingService;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Provisions one serverless function from a ROS 2 workspace: render the
/// Dockerfile, build, tag, push, register and invoke once.
///
/// Each construction picks a new random version, so provisioning again
/// creates a new function resource. Earlier versions are left in place.
pub struct FunctionProvisioner {
    workspace: PathBuf,
    ids: Identifiers,
    images: ImageBuilder,
    lambda: LambdaCli,
    readiness: ReadinessStrategy,
}

impl FunctionProvisioner {
    pub fn new(
        config: &ProvisionerConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, ProvisionError> {
        Self::with_identity(config, runner, InstanceIdentity::generate())
    }

    /// `config` must already carry a workspace path and instance directory;
    /// see `ProvisionerConfig::resolve_defaults`.
    pub fn with_identity(
        config: &ProvisionerConfig,
        runner: Arc<dyn CommandRunner>,
        identity: InstanceIdentity,
    ) -> Result<Self, ProvisionError> {
        let workspace = config.workspace_path()?.to_path_buf();
        let instances_dir = config.instances_dir()?;
        let ids = Identifiers::derive(&identity, config, instances_dir);

        std::fs::create_dir_all(&ids.working_dir)
            .map_err(|e| ProvisionError::io(&ids.working_dir, e))?;
        TracingService::log_instance_created(&ids);

        Ok(Self {
            workspace,
            images: ImageBuilder::new(runner.clone(), config),
            lambda: LambdaCli::new(runner, config),
            readiness: ReadinessStrategy::from_config(&config.readiness),
            ids,
        })
    }

    pub fn identifiers(&self) -> &Identifiers {
        &self.ids
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn readiness(&self) -> ReadinessStrategy {
        self.readiness
    }

    pub async fn render_build_recipe(&self) -> Result<RenderedRecipe, ProvisionError> {
        render_recipe(&self.workspace).await
    }

    /// Render the recipe, then provision.
    pub async fn create(&self) -> Result<ProvisionReport, ProvisionError> {
        if let Err(e) = self.render_build_recipe().await {
            TracingService::log_error(&self.ids.function_name, &e);
            return Err(e);
        }
        self.provision().await
    }

    /// Runs build, tag, push, create-function, readiness and invoke in order,
    /// stopping at the first failure. Expects the recipe to be rendered.
    #[instrument(skip(self), fields(function_name = %self.ids.function_name))]
    pub async fn provision(&self) -> Result<ProvisionReport, ProvisionError> {
        let result = self.run_pipeline().await;
        if let Err(e) = &result {
            TracingService::log_error(&self.ids.function_name, e);
        }
        result
    }

    async fn run_pipeline(&self) -> Result<ProvisionReport, ProvisionError> {
        let started_at = Utc::now();
        let ids = &self.ids;

        TracingService::log_step_started(ids, "build");
        self.images.build_image(&self.workspace).await?;

        TracingService::log_step_started(ids, "tag");
        self.images.tag_image(&ids.image_ref).await?;

        TracingService::log_step_started(ids, "push");
        self.images.push_image(&ids.image_ref).await?;

        TracingService::log_step_started(ids, "register");
        self.lambda
            .create_function(&ids.function_name, &ids.image_ref)
            .await?;
        TracingService::log_function_registered(ids);

        TracingService::log_step_started(ids, "readiness");
        let readiness_checks = self
            .readiness
            .wait_until_ready(&self.lambda, &ids.function_name)
            .await?;

        TracingService::log_step_started(ids, "invoke");
        let invocation = self
            .lambda
            .invoke(&ids.function_name, &ids.response_path)
            .await?;
        TracingService::log_invocation_completed(ids, &invocation);

        if let Some(error) = &invocation.function_error {
            return Err(ProvisionError::FunctionError {
                function_name: ids.function_name.clone(),
                error: error.clone(),
            });
        }

        info!(
            "Provisioned {} from {}; response at {}",
            ids.function_name,
            ids.image_ref,
            ids.response_path.display()
        );
        Ok(ProvisionReport {
            identifiers: ids.clone(),
            invocation,
            readiness_checks,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
