use fogros_invoker::CommandRunner;
use fogros_models::{CommandSpec, InvocationSummary, ProvisionError, ProvisionerConfig};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionState {
    Active,
    Failed,
    /// `Pending`, `Inactive`, or a status check that could not see the
    /// function yet.
    NotReady(String),
}

impl FunctionState {
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "Active" => FunctionState::Active,
            "Failed" => FunctionState::Failed,
            "" => FunctionState::NotReady("Unknown".to_string()),
            other => FunctionState::NotReady(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FunctionState::Active => "Active",
            FunctionState::Failed => "Failed",
            FunctionState::NotReady(state) => state,
        }
    }
}

/// `aws lambda` subcommands the provisioner needs.
pub struct LambdaCli {
    runner: Arc<dyn CommandRunner>,
    aws: String,
    role_arn: String,
    region: Option<String>,
}

impl LambdaCli {
    pub fn new(runner: Arc<dyn CommandRunner>, config: &ProvisionerConfig) -> Self {
        Self {
            runner,
            aws: config.tools.aws.clone(),
            role_arn: config.function.role_arn.clone(),
            region: config.function.region.clone(),
        }
    }

    fn base(&self, subcommand: &str, function_name: &str) -> CommandSpec {
        let spec = CommandSpec::new(&self.aws)
            .args(["lambda", subcommand])
            .args(["--function-name", function_name]);
        match &self.region {
            Some(region) => spec.args(["--region", region.as_str()]),
            None => spec,
        }
    }

    pub fn create_function_command(&self, function_name: &str, image_ref: &str) -> CommandSpec {
        self.base("create-function", function_name)
            .args(["--package-type", "Image"])
            .arg("--code")
            .arg(format!("ImageUri={image_ref}"))
            .args(["--output", "text"])
            .args(["--role", self.role_arn.as_str()])
    }

    pub fn state_command(&self, function_name: &str) -> CommandSpec {
        self.base("get-function-configuration", function_name)
            .args(["--query", "State", "--output", "text"])
    }

    pub fn invoke_command(&self, function_name: &str, response_path: &Path) -> CommandSpec {
        self.base("invoke", function_name)
            .args(["--output", "json"])
            .arg(response_path.display().to_string())
    }

    #[instrument(skip(self))]
    pub async fn create_function(
        &self,
        function_name: &str,
        image_ref: &str,
    ) -> Result<(), ProvisionError> {
        let output = self
            .runner
            .run(self.create_function_command(function_name, image_ref))
            .await?;
        if !output.is_success() {
            error!("create-function failed - stderr: {}", output.stderr);
            return Err(ProvisionError::RegistrationFailed {
                function_name: function_name.to_string(),
                stderr: output.failure_reason(),
            });
        }
        info!("Created function {} from {}", function_name, image_ref);
        Ok(())
    }

    /// A failing status call is reported as not-ready rather than an error;
    /// only a missing `aws` binary aborts.
    pub async fn function_state(&self, function_name: &str) -> Result<FunctionState, ProvisionError> {
        let output = self.runner.run(self.state_command(function_name)).await?;
        if !output.is_success() {
            return Ok(FunctionState::NotReady(output.failure_reason()));
        }
        Ok(FunctionState::parse(&output.stdout))
    }

    #[instrument(skip(self))]
    pub async fn invoke(
        &self,
        function_name: &str,
        response_path: &Path,
    ) -> Result<InvocationSummary, ProvisionError> {
        let output = self
            .runner
            .run(self.invoke_command(function_name, response_path))
            .await?;
        if !output.is_success() {
            error!("invoke failed - stderr: {}", output.stderr);
            return Err(ProvisionError::InvocationFailed {
                function_name: function_name.to_string(),
                stderr: output.failure_reason(),
            });
        }
        Ok(InvocationSummary::parse(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogros_testsupport::FakeRunner;

    fn cli(config: &ProvisionerConfig) -> LambdaCli {
        LambdaCli::new(Arc::new(FakeRunner::new()), config)
    }

    #[test]
    fn test_create_function_command() {
        let spec = cli(&ProvisionerConfig::default())
            .create_function_command("fogros-lambda-7", "repo/fogros_lambda:7");
        assert_eq!(spec.program, "aws");
        assert_eq!(
            spec.args,
            vec![
                "lambda",
                "create-function",
                "--function-name",
                "fogros-lambda-7",
                "--package-type",
                "Image",
                "--code",
                "ImageUri=repo/fogros_lambda:7",
                "--output",
                "text",
                "--role",
                "arn:aws:iam::736982044827:role/RoleLambda",
            ]
        );
    }

    #[test]
    fn test_region_is_passed_when_configured() {
        let mut config = ProvisionerConfig::default();
        config.function.region = Some("us-west-1".to_string());
        let spec = cli(&config).invoke_command("fogros-lambda-7", Path::new("/tmp/r.json"));
        assert_eq!(
            spec.args,
            vec![
                "lambda",
                "invoke",
                "--function-name",
                "fogros-lambda-7",
                "--region",
                "us-west-1",
                "--output",
                "json",
                "/tmp/r.json"
            ]
        );
    }

    #[test]
    fn test_parse_state() {
        assert_eq!(FunctionState::parse("Active\n"), FunctionState::Active);
        assert_eq!(FunctionState::parse("Failed"), FunctionState::Failed);
        assert_eq!(
            FunctionState::parse("Pending\n"),
            FunctionState::NotReady("Pending".to_string())
        );
        assert_eq!(FunctionState::parse("  ").as_str(), "Unknown");
    }
}
