use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorShape {
    pub error_message: String,
    pub error_type: String,
    pub step: String,
}

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Missing configuration: {name} is not set")]
    MissingConfiguration { name: String },

    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("I/O error at {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to spawn {program}: {reason}")]
    CommandSpawn { program: String, reason: String },

    #[error("Image build failed: {stderr}")]
    BuildFailed { stderr: String },

    #[error("Image tag failed: {stderr}")]
    TagFailed { stderr: String },

    #[error("Image push failed: {stderr}")]
    PushFailed { stderr: String },

    #[error("Function registration failed for {function_name}: {stderr}")]
    RegistrationFailed { function_name: String, stderr: String },

    #[error("Function {function_name} not ready after {waited_ms}ms")]
    ReadinessTimeout { function_name: String, waited_ms: u64 },

    #[error("Function {function_name} entered state {state}")]
    FunctionFailed { function_name: String, state: String },

    #[error("Invocation failed for {function_name}: {stderr}")]
    InvocationFailed { function_name: String, stderr: String },

    #[error("Function {function_name} returned an error: {error}")]
    FunctionError { function_name: String, error: String },
}

impl ProvisionError {
    pub fn io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        ProvisionError::Io {
            path: path.as_ref().display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn to_error_shape(&self) -> ErrorShape {
        ErrorShape {
            error_message: self.to_string(),
            error_type: self.error_type().to_string(),
            step: self.step().to_string(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ProvisionError::MissingConfiguration { .. } => "MissingConfiguration",
            ProvisionError::ConfigError { .. } => "ConfigError",
            ProvisionError::Io { .. } => "IoError",
            ProvisionError::CommandSpawn { .. } => "CommandSpawnError",
            ProvisionError::BuildFailed { .. } => "BuildFailed",
            ProvisionError::TagFailed { .. } => "TagFailed",
            ProvisionError::PushFailed { .. } => "PushFailed",
            ProvisionError::RegistrationFailed { .. } => "RegistrationFailed",
            ProvisionError::ReadinessTimeout { .. } => "ReadinessTimeout",
            ProvisionError::FunctionFailed { .. } => "FunctionFailed",
            ProvisionError::InvocationFailed { .. } => "InvocationFailed",
            ProvisionError::FunctionError { .. } => "Unhandled",
        }
    }

    /// Pipeline step the error belongs to.
    pub fn step(&self) -> &'static str {
        match self {
            ProvisionError::MissingConfiguration { .. } | ProvisionError::ConfigError { .. } => {
                "configure"
            }
            ProvisionError::Io { .. } => "filesystem",
            ProvisionError::CommandSpawn { .. } => "spawn",
            ProvisionError::BuildFailed { .. } => "build",
            ProvisionError::TagFailed { .. } => "tag",
            ProvisionError::PushFailed { .. } => "push",
            ProvisionError::RegistrationFailed { .. } => "register",
            ProvisionError::ReadinessTimeout { .. } | ProvisionError::FunctionFailed { .. } => {
                "readiness"
            }
            ProvisionError::InvocationFailed { .. } | ProvisionError::FunctionError { .. } => {
                "invoke"
            }
        }
    }
}

impl From<figment::Error> for ProvisionError {
    fn from(err: figment::Error) -> Self {
        ProvisionError::ConfigError {
            reason: err.to_string(),
        }
    }
}
