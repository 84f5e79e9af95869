use fogros_control::FunctionProvisioner;
use fogros_models::{InstanceIdentity, ProvisionerConfig};
use fogros_testsupport::FakeRunner;
use std::sync::Arc;

#[allow(dead_code)]
pub const INSTANCE_NAME: &str = "swift_otter_0a1b2c3d";

#[allow(dead_code)]
pub fn provisioner(
    config: &ProvisionerConfig,
    runner: &FakeRunner,
    version: u16,
) -> FunctionProvisioner {
    FunctionProvisioner::with_identity(
        config,
        Arc::new(runner.clone()),
        InstanceIdentity::new(INSTANCE_NAME, version),
    )
    .expect("provisioner")
}
