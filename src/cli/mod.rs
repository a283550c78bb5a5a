// CLI module for command-line interface

pub mod env;
pub mod render;
pub mod run;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::utils::config::ConfigParser;
use crate::utils::error::{BootstrapError, Result};

use self::env::EnvCommand;
use self::render::RenderCommand;
use self::run::RunCommand;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "ci-bootstrap")]
#[command(about = "Prepare a Python virtual environment and run the test suite in CI")]
#[command(long_about = r#"ci-bootstrap prepares an existing Python virtual environment for a CI
test run and hands off to the test runner.

Running without a subcommand performs the whole sequence:
  1. Activate the virtual environment (default: ~/venv)
  2. Upgrade the test dependencies (pytest, pytest-cov, pytest-rerunfailures)
  3. Install the single wheel matching dist/snowflake_sqlalchemy*.whl
  4. Render test/parameters.py from ACCOUNT, USER, PASSWORD and SCHEMA
  5. Run py.test against test/

The first failing step stops the run. The exit status is the test
runner's, or that of the step that failed.

Examples:
  ci-bootstrap                          Run the whole sequence
  ci-bootstrap run -- -k smoke          Pass arguments to the test runner
  ci-bootstrap render --stdout          Print the parameters file
  ci-bootstrap env                      Show the activation environment"#)]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ci-bootstrap.toml when present)
    #[arg(long, global = true, env = "CI_BOOTSTRAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Virtual environment to activate (default: ~/venv)
    #[arg(long, global = true, env = "CI_BOOTSTRAP_VENV")]
    pub venv: Option<PathBuf>,

    /// File-name pattern of the wheel under test
    #[arg(long, global = true, env = "CI_BOOTSTRAP_ARTIFACT")]
    pub artifact: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// All available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the whole bootstrap sequence (default)
    #[command(long_about = r#"Activate, install, render the parameters file, then run the tests.

Arguments after `--` are passed to the test runner. With --json the
report is printed to stdout after the runner's own output, starting on
a line of its own.

Examples:
  ci-bootstrap run
  ci-bootstrap run --timeout-secs 3600
  ci-bootstrap run --json -- -x"#)]
    Run {
        /// Kill the test runner after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Print a JSON report of the run
        #[arg(long)]
        json: bool,
        /// Additional arguments for the test runner
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Render the connection parameters file only
    Render {
        /// Write here instead of the configured parameters file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the rendered file instead of writing it
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Show the environment the virtual environment activation sets
    Env {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// CLI command dispatcher
pub struct CliDispatcher;

impl CliDispatcher {
    /// Execute a CLI command and return the process exit status
    pub async fn execute(cli: Cli) -> Result<i32> {
        let work_dir = std::env::current_dir()?;
        let config = ConfigParser::load(cli.config.as_deref(), &work_dir)?
            .with_overrides(cli.venv, cli.artifact);
        config.validate().map_err(BootstrapError::ValidationError)?;

        let command = cli.command.unwrap_or(Commands::Run {
            timeout_secs: None,
            json: false,
            args: Vec::new(),
        });

        match command {
            Commands::Run { timeout_secs, json, args } => {
                let cmd = RunCommand {
                    timeout_secs,
                    json,
                    args,
                };
                cmd.execute(config, work_dir).await
            }

            Commands::Render { output, stdout } => {
                let cmd = RenderCommand { output, stdout };
                cmd.execute(&config, &work_dir)
            }

            Commands::Env { json } => {
                let cmd = EnvCommand { json };
                cmd.execute(&config, &work_dir).await
            }
        }
    }
}

/// Pretty-print a value as JSON on stdout
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| BootstrapError::ConfigError(format!("JSON serialization error: {}", e)))?;
    println!("{}", text);
    Ok(())
}
