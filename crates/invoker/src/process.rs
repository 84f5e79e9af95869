use async_trait::async_trait;
use fogros_models::{CommandOutput, CommandSpec, ProvisionError};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Seam between the provisioner and the tools it drives. A non-zero exit is
/// returned as a `CommandOutput`, not an error; only spawn failures are
/// errors here.
#[async_trait]
pub trait CommandRunner: Send + Sync + 'static {
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, ProvisionError>;
}

/// Runs commands as child processes, capturing stdout and stderr.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    #[instrument(skip(self, spec), fields(command = %spec))]
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, ProvisionError> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .await
            .map_err(|e| ProvisionError::CommandSpawn {
                program: spec.program.clone(),
                reason: e.to_string(),
            })?;

        let result = CommandOutput {
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if result.is_success() {
            debug!(program = %spec.program, "Command succeeded");
        } else {
            warn!(
                program = %spec.program,
                status = ?result.status_code,
                stderr = %result.stderr.trim(),
                "Command failed"
            );
        }
        Ok(result)
    }
}
