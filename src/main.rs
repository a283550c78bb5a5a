// ci-bootstrap
// Main CLI entry point

use ci_bootstrap::cli::{Cli, CliDispatcher};
use ci_bootstrap::utils::error::UserError;
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match CliDispatcher::execute(cli).await {
        Ok(code) => process::exit(code),
        Err(err) => {
            let user_error = UserError::from_bootstrap_error(&err);
            user_error.print();
            process::exit(user_error.exit_code);
        }
    }
}
