use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::services::virtual_environment_manager::VirtualEnvironmentManager;
use crate::utils::error::{BootstrapError, Result};
use crate::utils::process::{describe, exit_code};

/// Hands off to the test runner inside the activated environment
#[derive(Debug, Clone)]
pub struct TestRunner {
    program: String,
    test_dir: PathBuf,
    extra_args: Vec<String>,
    timeout: Option<Duration>,
}

impl TestRunner {
    pub fn new(program: impl Into<String>, test_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            test_dir: test_dir.into(),
            extra_args: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the tests from `work_dir` and return the runner's exit status.
    ///
    /// A non-zero status is returned as `Ok`; it is the outcome of the run,
    /// not a failure to run.
    pub async fn run(&self, manager: &VirtualEnvironmentManager, work_dir: &Path) -> Result<i32> {
        let program = manager.resolve_executable(&self.program);
        let mut cmd = manager.command(&program);
        cmd.arg(&self.test_dir)
            .args(&self.extra_args)
            .current_dir(work_dir)
            .kill_on_drop(true);

        info!(runner = %self.program, test_dir = %self.test_dir.display(), "running tests");
        debug!(command = %describe(&cmd), "spawning test runner");

        let mut child = cmd.spawn().map_err(|source| BootstrapError::SpawnError {
            program: program.display().to_string(),
            source,
        })?;

        let status = match self.timeout {
            Some(limit) => {
                let waited = tokio::time::timeout(limit, child.wait()).await;
                match waited {
                    Ok(status) => status?,
                    Err(_) => {
                        error!(seconds = limit.as_secs(), "test runner timed out, killing it");
                        child.kill().await?;
                        return Err(BootstrapError::Timeout(limit.as_secs()));
                    }
                }
            }
            None => child.wait().await?,
        };

        let code = exit_code(status);
        info!(code, "test runner finished");
        Ok(code)
    }
}
