use async_trait::async_trait;
use fogros_invoker::CommandRunner;
use fogros_models::{CommandOutput, CommandSpec, ProvisionError};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Records every command and answers from a script. Unscripted commands
/// succeed with empty output; status checks answer `Active` once the state
/// queue runs dry.
#[derive(Clone, Default)]
pub struct FakeRunner {
    pub calls: Arc<Mutex<Vec<CommandSpec>>>,
    failures: Arc<Mutex<HashMap<String, CommandOutput>>>,
    spawn_errors: Arc<Mutex<Vec<String>>>,
    spawn_error_subcommands: Arc<Mutex<Vec<String>>>,
    states: Arc<Mutex<VecDeque<CommandOutput>>>,
    invoke_stdout: Arc<Mutex<Option<String>>>,
}

pub const STATUS_SUBCOMMAND: &str = "get-function-configuration";
pub const INVOKE_SUBCOMMAND: &str = "invoke";

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command with `subcommand` among its arguments (`build`,
    /// `push`, `create-function`, ...).
    pub async fn fail_on(&self, subcommand: &str, output: CommandOutput) {
        self.failures
            .lock()
            .await
            .insert(subcommand.to_string(), output);
    }

    pub async fn spawn_error_on(&self, program: &str) {
        self.spawn_errors.lock().await.push(program.to_string());
    }

    /// Fail to spawn only the commands with `subcommand` among their
    /// arguments, e.g. the status check.
    pub async fn spawn_error_on_subcommand(&self, subcommand: &str) {
        self.spawn_error_subcommands
            .lock()
            .await
            .push(subcommand.to_string());
    }

    /// Function states reported by successive status checks.
    pub async fn push_states<I, S>(&self, states: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queue = self.states.lock().await;
        for state in states {
            queue.push_back(CommandOutput::success(format!("{}\n", state.into())));
        }
    }

    /// A status check that exits non-zero, e.g. while the function is not yet
    /// visible to the API.
    pub async fn push_status_failure(&self, output: CommandOutput) {
        self.states.lock().await.push_back(output);
    }

    pub async fn set_invoke_stdout(&self, stdout: impl Into<String>) {
        *self.invoke_stdout.lock().await = Some(stdout.into());
    }

    pub async fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().await.clone()
    }

    pub async fn count_matching(&self, subcommand: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.args.iter().any(|a| a == subcommand))
            .count()
    }

    async fn scripted_failure(&self, spec: &CommandSpec) -> Option<CommandOutput> {
        let failures = self.failures.lock().await;
        spec.args
            .iter()
            .find_map(|arg| failures.get(arg.as_str()).cloned())
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, ProvisionError> {
        self.calls.lock().await.push(spec.clone());

        let spawn_fails = self.spawn_errors.lock().await.contains(&spec.program)
            || self
                .spawn_error_subcommands
                .lock()
                .await
                .iter()
                .any(|s| spec.args.contains(s));
        if spawn_fails {
            return Err(ProvisionError::CommandSpawn {
                program: spec.program.clone(),
                reason: "No such file or directory (os error 2)".to_string(),
            });
        }
        if let Some(output) = self.scripted_failure(&spec).await {
            return Ok(output);
        }
        if spec.args.iter().any(|a| a == STATUS_SUBCOMMAND) {
            let next = self.states.lock().await.pop_front();
            return Ok(next.unwrap_or_else(|| CommandOutput::success("Active\n")));
        }
        if spec.args.iter().any(|a| a == INVOKE_SUBCOMMAND) {
            let stdout = self.invoke_stdout.lock().await.clone().unwrap_or_else(|| {
                r#"{"StatusCode": 200, "ExecutedVersion": "$LATEST"}"#.to_string()
            });
            return Ok(CommandOutput::success(stdout));
        }
        Ok(CommandOutput::success(""))
    }
}
