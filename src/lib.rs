// CLI module
pub mod cli;

// Re-export commonly used items for convenience
pub use fogros_control::{FunctionProvisioner, LambdaCli, ReadinessStrategy};
pub use fogros_invoker::{CommandRunner, ProcessRunner};
pub use fogros_models::{
    Identifiers, InstanceIdentity, ProvisionError, ProvisionReport, ProvisionerConfig,
};
pub use fogros_packaging::{render_recipe, ImageBuilder, RenderedRecipe, DOCKERFILE_TEMPLATE};
pub use fogros_telemetry::{LogFormat, TracingService};
