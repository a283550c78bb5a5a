use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use crate::models::bootstrap_config::BootstrapConfig;
use crate::models::connection_parameters::ConnectionParameters;
use crate::models::pipeline_report::{PipelineReport, Stage};
use crate::services::artifact_resolver::ArtifactResolver;
use crate::services::parameters_renderer::ParametersRenderer;
use crate::services::test_runner::TestRunner;
use crate::services::virtual_environment_manager::VirtualEnvironmentManager;
use crate::utils::error::Result;

/// Activate, install, render, then run the tests. The first failing
/// stage ends the run; nothing is rolled back.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: BootstrapConfig,
    parameters: ConnectionParameters,
    work_dir: PathBuf,
    runner_args: Vec<String>,
    timeout: Option<Duration>,
}

impl Pipeline {
    pub fn new(config: BootstrapConfig, parameters: ConnectionParameters, work_dir: PathBuf) -> Self {
        Self {
            config,
            parameters,
            work_dir,
            runner_args: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_runner_args(mut self, args: Vec<String>) -> Self {
        self.runner_args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run every stage and close the report.
    ///
    /// Returns the test runner's exit status, or the error of the stage
    /// that aborted the run. Either way `report` is finished.
    pub async fn execute(&self, report: &mut PipelineReport) -> Result<i32> {
        match self.run_stages(report).await {
            Ok(code) => {
                report.finish(code);
                Ok(code)
            }
            Err(err) => {
                error!(stage = ?report.current_stage(), "{}", err);
                report.fail(&err);
                Err(err)
            }
        }
    }

    async fn run_stages(&self, report: &mut PipelineReport) -> Result<i32> {
        report.enter(Stage::Activate);
        let manager = VirtualEnvironmentManager::activate(&self.config.venv_path(&self.work_dir)).await?;
        report.complete(Stage::Activate);

        report.enter(Stage::InstallDeps);
        manager.install_packages(&self.config.packages).await?;
        report.complete(Stage::InstallDeps);

        report.enter(Stage::InstallArtifact);
        let artifact = ArtifactResolver::new(&self.config.artifact).resolve(&self.work_dir)?;
        info!(sha256 = %artifact.sha256, "artifact digest");
        manager.install_artifact(&artifact.path).await?;
        report.artifact = Some(artifact);
        report.complete(Stage::InstallArtifact);

        report.enter(Stage::RenderConfig);
        let target = self.work_dir.join(&self.config.parameters_file);
        let written = ParametersRenderer::new().write(&self.parameters, &target)?;
        report.parameters_file = Some(written);
        report.complete(Stage::RenderConfig);

        report.enter(Stage::RunTests);
        let code = TestRunner::new(&self.config.runner, &self.config.test_dir)
            .with_args(self.runner_args.clone())
            .with_timeout(self.timeout)
            .run(&manager, &self.work_dir)
            .await?;
        if code == 0 {
            report.complete(Stage::RunTests);
        }

        Ok(code)
    }
}
