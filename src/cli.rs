use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use fogros_control::FunctionProvisioner;
use fogros_invoker::CommandRunner;
use fogros_models::{
    Identifiers, InstanceIdentity, ProvisionError, ProvisionerConfig, ReadinessMode,
};
use fogros_telemetry::LogFormat;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fogros-lambda")]
#[command(about = "Provision a ROS 2 workspace as an AWS Lambda function")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Workspace root (default: parent of the first COLCON_PREFIX_PATH entry)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Base directory for instance working directories (default: ~/.fogros2/instances)
    #[arg(long, global = true)]
    pub instances_dir: Option<PathBuf>,

    /// AWS region passed to the aws CLI
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// How to wait for the function to become active
    #[arg(long, global = true, value_enum)]
    pub readiness: Option<ReadinessArg>,

    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Render the Dockerfile, build and push the image, create and invoke the function
    Up,
    /// Only render the Dockerfile into the workspace
    Render,
    /// Print the identifiers a new instance would use, without running anything
    Plan,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessArg {
    Poll,
    Fixed,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<ReadinessArg> for ReadinessMode {
    fn from(arg: ReadinessArg) -> Self {
        match arg {
            ReadinessArg::Poll => ReadinessMode::Poll,
            ReadinessArg::Fixed => ReadinessMode::Fixed,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    /// Config file and `FOGROS_*` variables, then command-line flags, then
    /// environment fallbacks for anything still unset.
    pub fn load_config(&self) -> Result<ProvisionerConfig, ProvisionError> {
        let mut config = ProvisionerConfig::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        config.resolve_defaults()
    }

    pub fn apply_overrides(&self, config: &mut ProvisionerConfig) {
        if let Some(workspace) = &self.workspace {
            config.workspace.path = Some(workspace.clone());
        }
        if let Some(dir) = &self.instances_dir {
            config.instances.base_dir = Some(dir.clone());
        }
        if let Some(region) = &self.region {
            config.function.region = Some(region.clone());
        }
        if let Some(readiness) = self.readiness {
            config.readiness.mode = readiness.into();
        }
    }
}

pub async fn run(cli: &Cli, runner: Arc<dyn CommandRunner>) -> Result<()> {
    let config = cli.load_config()?;
    info!("Configuration loaded: {:?}", config);

    match cli.command {
        Commands::Plan => {
            let identity = InstanceIdentity::generate();
            let ids = Identifiers::derive(&identity, &config, config.instances_dir()?);
            print_identifiers(&ids);
        }
        Commands::Render => {
            let provisioner = FunctionProvisioner::new(&config, runner)?;
            let rendered = provisioner.render_build_recipe().await?;
            println!("Rendered {} (sha256 {})", rendered.path.display(), rendered.sha256);
        }
        Commands::Up => {
            let provisioner = FunctionProvisioner::new(&config, runner)?;
            let report = provisioner.create().await?;
            println!("✅ Function provisioned:");
            print_identifiers(&report.identifiers);
            println!(
                "   Status: {}",
                report
                    .invocation
                    .status_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            );
            println!(
                "   Took: {}s",
                (report.finished_at - report.started_at).num_seconds()
            );
        }
    }
    Ok(())
}

fn print_identifiers(ids: &Identifiers) {
    println!("   Instance: {}", ids.instance_name);
    println!("   Version: {}", ids.version);
    println!("   Working dir: {}", ids.working_dir.display());
    println!("   Image: {}", ids.image_ref);
    println!("   Function: {}", ids.function_name);
    println!("   Response: {}", ids.response_path.display());
}
