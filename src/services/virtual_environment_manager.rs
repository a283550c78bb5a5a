use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::models::pipeline_report::Stage;
use crate::models::virtual_environment::{ActivationEnv, VirtualEnvironment};
use crate::utils::error::{BootstrapError, Result};
use crate::utils::process::{describe, exit_code};

/// An activated virtual environment and the pip operations run inside it
#[derive(Debug, Clone)]
pub struct VirtualEnvironmentManager {
    venv: VirtualEnvironment,
    env: ActivationEnv,
}

impl VirtualEnvironmentManager {
    /// Activate the environment at `path`.
    ///
    /// The environment must already exist; nothing is created here. A
    /// relative path is made absolute against the current directory, so
    /// `VIRTUAL_ENV` and the `PATH` entry stay valid for children that
    /// change directory. The overlay is computed against the current
    /// process `PATH`.
    pub async fn activate(path: &Path) -> Result<Self> {
        let venv = VirtualEnvironment::new(std::path::absolute(path)?);
        let script = venv.activate_script();

        if !fs::try_exists(&script).await.unwrap_or(false) {
            return Err(BootstrapError::ActivationError {
                venv: venv.path.clone(),
                script,
            });
        }

        let env = venv.activation_env(std::env::var_os("PATH"));
        info!(venv = %venv.path.display(), "activated virtual environment");

        Ok(Self { venv, env })
    }

    pub fn venv(&self) -> &VirtualEnvironment {
        &self.venv
    }

    pub fn activation_env(&self) -> &ActivationEnv {
        &self.env
    }

    /// Build a command that runs with the environment activated
    pub fn command(&self, program: impl AsRef<OsStr>) -> Command {
        let mut cmd = Command::new(program);
        for (key, value) in &self.env.set {
            cmd.env(key, value);
        }
        for key in &self.env.removed {
            cmd.env_remove(key);
        }
        cmd
    }

    /// Prefer the environment's own copy of an executable, falling back
    /// to a `PATH` lookup through the overlay.
    pub fn resolve_executable(&self, name: &str) -> PathBuf {
        let candidate = self.venv.executable(name);
        if candidate.is_file() {
            candidate
        } else {
            PathBuf::from(name)
        }
    }

    /// Upgrade the given packages to their latest compatible versions
    pub async fn install_packages(&self, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            debug!("no dependencies configured, skipping install");
            return Ok(());
        }

        let mut args = vec!["install".to_string(), "-U".to_string()];
        args.extend(packages.iter().cloned());

        info!(packages = %packages.join(" "), "installing test dependencies");
        self.run_pip(&args, Stage::InstallDeps).await
    }

    /// Install a single local wheel
    pub async fn install_artifact(&self, artifact: &Path) -> Result<()> {
        let args = vec![
            "install".to_string(),
            artifact.to_string_lossy().to_string(),
        ];

        info!(artifact = %artifact.display(), "installing artifact under test");
        self.run_pip(&args, Stage::InstallArtifact).await
    }

    async fn run_pip(&self, args: &[String], stage: Stage) -> Result<()> {
        let pip = self.resolve_executable("pip");
        let mut cmd = self.command(&pip);
        cmd.args(args);
        debug!(command = %describe(&cmd), "running pip");

        let status = cmd.status().await.map_err(|source| BootstrapError::SpawnError {
            program: pip.display().to_string(),
            source,
        })?;

        let code = exit_code(status);
        if code != 0 {
            error!(%stage, code, "pip failed");
            return Err(BootstrapError::CommandFailed { stage, code });
        }

        Ok(())
    }
}
