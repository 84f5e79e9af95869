use crate::error::ProvisionError;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Variable colcon sets once a workspace's `install/setup` has been sourced.
pub const COLCON_PREFIX_PATH: &str = "COLCON_PREFIX_PATH";
pub const HOME: &str = "HOME";
pub const ENV_PREFIX: &str = "FOGROS_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProvisionerConfig {
    pub workspace: WorkspaceConfig,
    pub instances: InstancesConfig,
    pub registry: RegistryConfig,
    pub function: FunctionConfig,
    pub readiness: ReadinessConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InstancesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    pub repository_uri: String,
    pub local_image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FunctionConfig {
    pub name_prefix: String,
    pub role_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub response_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessMode {
    Poll,
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReadinessConfig {
    pub mode: ReadinessMode,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_ms: u64,
    pub fixed_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    pub docker: String,
    pub aws: String,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            workspace: WorkspaceConfig { path: None },
            instances: InstancesConfig { base_dir: None },
            registry: RegistryConfig {
                repository_uri: "736982044827.dkr.ecr.us-west-1.amazonaws.com/fogros_lambda"
                    .to_string(),
                local_image: "fogros-lambda-image".to_string(),
            },
            function: FunctionConfig {
                name_prefix: "fogros-lambda".to_string(),
                role_arn: "arn:aws:iam::736982044827:role/RoleLambda".to_string(),
                region: None,
                response_dir: PathBuf::from("/tmp"),
            },
            readiness: ReadinessConfig {
                mode: ReadinessMode::Poll,
                initial_backoff_ms: 1000,
                max_backoff_ms: 10000,
                timeout_ms: 120000,
                fixed_delay_ms: 60000, // the function resource usually settles within a minute
            },
            tools: ToolsConfig {
                docker: "docker".to_string(),
                aws: "aws".to_string(),
            },
        }
    }
}

impl ProvisionerConfig {
    /// Defaults, then the optional TOML file, then `FOGROS_*` environment
    /// variables (`FOGROS_FUNCTION__ROLE_ARN` sets `function.role_arn`).
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ProvisionerConfig::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(config_path: Option<&Path>) -> Result<Self, ProvisionError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ProvisionError::ConfigError {
                    reason: format!("config file not found: {}", path.display()),
                });
            }
        }
        let config: Self = Self::figment(config_path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Polling needs non-zero backoff and timeout, otherwise status checks
    /// would run back to back.
    pub fn validate(&self) -> Result<(), ProvisionError> {
        let readiness = &self.readiness;
        if readiness.mode != ReadinessMode::Poll {
            return Ok(());
        }
        for (name, value) in [
            ("readiness.initial_backoff_ms", readiness.initial_backoff_ms),
            ("readiness.max_backoff_ms", readiness.max_backoff_ms),
            ("readiness.timeout_ms", readiness.timeout_ms),
        ] {
            if value == 0 {
                return Err(ProvisionError::ConfigError {
                    reason: format!("{name} must be greater than zero"),
                });
            }
        }
        Ok(())
    }

    /// Fills the workspace path and instance directory from the process
    /// environment when they were not configured explicitly.
    pub fn resolve_defaults(self) -> Result<Self, ProvisionError> {
        self.resolve_defaults_with(|name| std::env::var_os(name))
    }

    pub fn resolve_defaults_with<F>(mut self, lookup: F) -> Result<Self, ProvisionError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if self.workspace.path.is_none() {
            let prefix_path = lookup(COLCON_PREFIX_PATH);
            self.workspace.path = Some(workspace_from_prefix_path(prefix_path.as_deref())?);
        }
        if self.instances.base_dir.is_none() {
            let home = lookup(HOME).ok_or_else(|| ProvisionError::MissingConfiguration {
                name: HOME.to_string(),
            })?;
            self.instances.base_dir = Some(instance_dir(Path::new(&home)));
        }
        Ok(self)
    }

    pub fn workspace_path(&self) -> Result<&Path, ProvisionError> {
        self.workspace
            .path
            .as_deref()
            .ok_or_else(|| ProvisionError::MissingConfiguration {
                name: "workspace.path".to_string(),
            })
    }

    pub fn instances_dir(&self) -> Result<&Path, ProvisionError> {
        self.instances
            .base_dir
            .as_deref()
            .ok_or_else(|| ProvisionError::MissingConfiguration {
                name: "instances.base_dir".to_string(),
            })
    }
}

/// Workspace root for a colcon prefix path: the parent of its first entry,
/// so `/ws/install` yields `/ws`.
pub fn workspace_from_prefix_path(
    prefix_path: Option<&std::ffi::OsStr>,
) -> Result<PathBuf, ProvisionError> {
    let missing = || ProvisionError::MissingConfiguration {
        name: COLCON_PREFIX_PATH.to_string(),
    };
    let value = prefix_path.filter(|v| !v.is_empty()).ok_or_else(missing)?;
    let install = std::env::split_paths(value)
        .find(|p| !p.as_os_str().is_empty())
        .ok_or_else(missing)?;
    match install.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => Err(ProvisionError::ConfigError {
            reason: format!(
                "{COLCON_PREFIX_PATH} entry {} has no parent directory",
                install.display()
            ),
        }),
    }
}

/// `~/.fogros2`
pub fn work_dir(home: &Path) -> PathBuf {
    home.join(".fogros2")
}

/// `~/.fogros2/instances`
pub fn instance_dir(home: &Path) -> PathBuf {
    work_dir(home).join("instances")
}
