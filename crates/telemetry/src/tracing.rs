use fogros_models::{Identifiers, InvocationSummary, ProvisionError};
use tracing::{error, info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

pub struct TracingService;

impl TracingService {
    /// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
    pub fn init(format: LogFormat) -> anyhow::Result<()> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_timer(UtcTime::rfc_3339())
            .with_writer(std::io::stderr);

        match format {
            LogFormat::Text => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        }
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
    }

    pub fn log_instance_created(ids: &Identifiers) {
        info!(
            instance_name = %ids.instance_name,
            version = ids.version,
            working_dir = %ids.working_dir.display(),
            image_ref = %ids.image_ref,
            function_name = %ids.function_name,
            "Instance created"
        );
    }

    pub fn log_step_started(ids: &Identifiers, step: &str) {
        info!(
            function_name = %ids.function_name,
            step = %step,
            "Provisioning step started"
        );
    }

    pub fn log_function_registered(ids: &Identifiers) {
        info!(
            function_name = %ids.function_name,
            image_ref = %ids.image_ref,
            "Function registered"
        );
    }

    pub fn log_readiness_check(function_name: &str, attempt: u32, state: &str, backoff_ms: u64) {
        info!(
            function_name = %function_name,
            attempt = attempt,
            state = %state,
            backoff_ms = backoff_ms,
            "Function not ready yet"
        );
    }

    pub fn log_invocation_completed(ids: &Identifiers, summary: &InvocationSummary) {
        match &summary.function_error {
            None => info!(
                function_name = %ids.function_name,
                status_code = summary.status_code.unwrap_or(0),
                executed_version = %summary.executed_version.as_deref().unwrap_or("unknown"),
                response_path = %ids.response_path.display(),
                "Invocation completed"
            ),
            Some(function_error) => warn!(
                function_name = %ids.function_name,
                status_code = summary.status_code.unwrap_or(0),
                function_error = %function_error,
                response_path = %ids.response_path.display(),
                "Invocation returned a function error"
            ),
        }
    }

    pub fn log_error(function_name: &str, err: &ProvisionError) {
        error!(
            function_name = %function_name,
            step = %err.step(),
            error_type = %err.error_type(),
            error_message = %err,
            "Provisioning failed"
        );
    }
}
