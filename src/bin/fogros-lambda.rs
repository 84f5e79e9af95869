use clap::Parser;
use fogros_lambda::cli::{run, Cli};
use fogros_lambda::{ProcessRunner, TracingService};
use std::sync::Arc;
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    TracingService::init(cli.log_format.into())?;

    if let Err(e) = run(&cli, Arc::new(ProcessRunner::new())).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
