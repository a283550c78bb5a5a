use serde_json::json;
use std::path::Path;

use crate::cli::print_json;
use crate::models::bootstrap_config::BootstrapConfig;
use crate::services::virtual_environment_manager::VirtualEnvironmentManager;
use crate::utils::error::Result;

/// Show the activation environment for the configured virtual environment
#[derive(Debug)]
pub struct EnvCommand {
    pub json: bool,
}

impl EnvCommand {
    pub async fn execute(&self, config: &BootstrapConfig, work_dir: &Path) -> Result<i32> {
        let manager = VirtualEnvironmentManager::activate(&config.venv_path(work_dir)).await?;
        let env = manager.activation_env();

        if self.json {
            let response = json!({
                "venv": manager.venv().path,
                "environment": env.set,
                "removed": env.removed,
            });
            print_json(&response)?;
        } else {
            println!("Environment for '{}':", manager.venv().path.display());
            for (key, value) in &env.set {
                println!("  {}={}", key, value);
            }
            for key in &env.removed {
                println!("  unset {}", key);
            }
        }

        Ok(0)
    }
}
