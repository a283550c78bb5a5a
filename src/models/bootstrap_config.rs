use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name of the virtual environment under the home directory
pub const DEFAULT_VENV_DIR: &str = "venv";
/// Wheel produced by the preceding build step
pub const DEFAULT_ARTIFACT: &str = "dist/snowflake_sqlalchemy*.whl";
pub const DEFAULT_PARAMETERS_FILE: &str = "test/parameters.py";
pub const DEFAULT_TEST_DIR: &str = "test";
pub const DEFAULT_RUNNER: &str = "py.test";
pub const DEFAULT_PACKAGES: &[&str] = &["pytest", "pytest-cov", "pytest-rerunfailures"];

/// Settings for one bootstrap run, as read from `ci-bootstrap.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Virtual environment directory (default: `~/venv`)
    pub venv: Option<PathBuf>,
    /// Packages upgraded to their latest version before the artifact
    pub packages: Vec<String>,
    /// File-name pattern of the wheel under test
    pub artifact: String,
    /// Where the connection parameters are rendered
    pub parameters_file: PathBuf,
    /// Directory handed to the test runner
    pub test_dir: PathBuf,
    /// Test runner executable
    pub runner: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            venv: None,
            packages: DEFAULT_PACKAGES.iter().map(|p| (*p).to_string()).collect(),
            artifact: DEFAULT_ARTIFACT.to_string(),
            parameters_file: PathBuf::from(DEFAULT_PARAMETERS_FILE),
            test_dir: PathBuf::from(DEFAULT_TEST_DIR),
            runner: DEFAULT_RUNNER.to_string(),
        }
    }
}

impl BootstrapConfig {
    /// Apply command-line overrides on top of the file values
    pub fn with_overrides(mut self, venv: Option<PathBuf>, artifact: Option<String>) -> Self {
        if let Some(venv) = venv {
            self.venv = Some(venv);
        }
        if let Some(artifact) = artifact {
            self.artifact = artifact;
        }
        self
    }

    /// Absolute virtual environment path. `~` is expanded and relative
    /// paths are taken from `work_dir`.
    pub fn venv_path(&self, work_dir: &Path) -> PathBuf {
        match &self.venv {
            Some(path) => work_dir.join(expand_home(path)),
            None => home_dir().join(DEFAULT_VENV_DIR),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for package in &self.packages {
            if package.trim().is_empty() {
                return Err("Package names cannot be empty".to_string());
            }
            if package.chars().any(char::is_whitespace) {
                return Err(format!("Package name '{}' cannot contain whitespace", package));
            }
        }

        if self.artifact.trim().is_empty() {
            return Err("Artifact pattern cannot be empty".to_string());
        }
        if self.artifact.ends_with('/') || self.artifact.ends_with('\\') {
            return Err(format!("Artifact pattern '{}' must name a file", self.artifact));
        }

        if self.parameters_file.as_os_str().is_empty() {
            return Err("Parameters file path cannot be empty".to_string());
        }

        if self.runner.trim().is_empty() {
            return Err("Test runner cannot be empty".to_string());
        }

        Ok(())
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home_dir().join(rest),
        Err(_) => path.to_path_buf(),
    }
}
