// Configuration loading and TOML parsing

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::models::bootstrap_config::BootstrapConfig;
use crate::utils::error::{BootstrapError, Result};

/// File picked up from the working directory when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "ci-bootstrap.toml";

/// Configuration parsing and validation utilities
pub struct ConfigParser;

impl ConfigParser {
    /// Load the bootstrap configuration.
    ///
    /// An explicit path must exist. Without one, `ci-bootstrap.toml` in
    /// `work_dir` is used when present and defaults apply otherwise.
    pub fn load(explicit: Option<&Path>, work_dir: &Path) -> Result<BootstrapConfig> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(BootstrapError::ConfigError(format!(
                        "Configuration file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let implicit = work_dir.join(CONFIG_FILE_NAME);
                if !implicit.exists() {
                    debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                    return Ok(BootstrapConfig::default());
                }
                implicit
            }
        };

        Self::load_file(&path)
    }

    fn load_file(path: &Path) -> Result<BootstrapConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            BootstrapError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "loaded configuration file");
        Self::parse(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(content: &str) -> Result<BootstrapConfig> {
        let config: BootstrapConfig = toml::from_str(content)
            .map_err(|e| BootstrapError::ConfigError(format!("Invalid TOML syntax: {}", e)))?;

        config.validate().map_err(BootstrapError::ValidationError)?;

        Ok(config)
    }
}
