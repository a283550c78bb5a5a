use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The five steps of a bootstrap run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Activate,
    InstallDeps,
    InstallArtifact,
    RenderConfig,
    RunTests,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Activate,
        Stage::InstallDeps,
        Stage::InstallArtifact,
        Stage::RenderConfig,
        Stage::RunTests,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Activate => "activate",
            Stage::InstallDeps => "install dependencies",
            Stage::InstallArtifact => "install artifact",
            Stage::RenderConfig => "render config",
            Stage::RunTests => "run tests",
        };
        write!(f, "{}", name)
    }
}

/// The wheel that was installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    /// Hex SHA-256 of the file contents
    pub sha256: String,
}

/// Outcome of one bootstrap run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Stages that succeeded. A stage is never both here and in
    /// `failed_stage`.
    pub completed: Vec<Stage>,
    pub failed_stage: Option<Stage>,
    pub artifact: Option<ArtifactInfo>,
    pub parameters_file: Option<PathBuf>,
    pub exit_code: Option<i32>,
    pub error: Option<String>,
    #[serde(skip)]
    current: Option<Stage>,
}

impl PipelineReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            completed: Vec::new(),
            failed_stage: None,
            artifact: None,
            parameters_file: None,
            exit_code: None,
            error: None,
            current: None,
        }
    }

    /// Mark a stage as started
    pub fn enter(&mut self, stage: Stage) {
        self.current = Some(stage);
    }

    /// Mark the current stage as finished
    pub fn complete(&mut self, stage: Stage) {
        self.completed.push(stage);
        self.current = None;
    }

    /// Stage that was running when the pipeline stopped, if any
    pub fn current_stage(&self) -> Option<Stage> {
        self.current
    }

    /// Close the report after the test runner returned. A non-zero
    /// status fails the run-tests stage.
    pub fn finish(&mut self, exit_code: i32) {
        self.current = None;
        self.exit_code = Some(exit_code);
        self.finished_at = Some(Utc::now());
        if exit_code != 0 {
            self.failed_stage = Some(Stage::RunTests);
        }
    }

    /// Close the report after a stage aborted the run
    pub fn fail(&mut self, error: &crate::utils::error::BootstrapError) {
        self.failed_stage = self.current.take();
        self.exit_code = Some(error.exit_code());
        self.error = Some(error.to_string());
        self.finished_at = Some(Utc::now());
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

impl Default for PipelineReport {
    fn default() -> Self {
        Self::new()
    }
}
