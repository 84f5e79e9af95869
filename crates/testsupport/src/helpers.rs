use anyhow::Result;
use fogros_models::{ProvisionerConfig, ReadinessMode};
use std::path::Path;
use tempfile::TempDir;

/// Scratch workspace and instance base directory for one test.
pub struct Sandbox {
    pub workspace: TempDir,
    pub instances: TempDir,
}

impl Sandbox {
    pub fn new() -> Result<Self> {
        Ok(Self {
            workspace: tempfile::tempdir()?,
            instances: tempfile::tempdir()?,
        })
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn instances_path(&self) -> &Path {
        self.instances.path()
    }

    /// Default config pointed at this sandbox, waiting a fixed delay instead
    /// of polling.
    pub fn fixed_delay_config(&self) -> ProvisionerConfig {
        let mut config = self.config();
        config.readiness.mode = ReadinessMode::Fixed;
        config
    }

    pub fn config(&self) -> ProvisionerConfig {
        let mut config = ProvisionerConfig::default();
        config.workspace.path = Some(self.workspace_path().to_path_buf());
        config.instances.base_dir = Some(self.instances_path().to_path_buf());
        config
    }
}

/// Read a file to string, panicking with the path on failure.
pub fn read_to_string(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}
