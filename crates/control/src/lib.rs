pub mod lambda_cli;
pub mod provisioner;
pub mod readiness;

pub use lambda_cli::*;
pub use provisioner::*;
pub use readiness::*;
