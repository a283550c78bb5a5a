use std::path::{Path, PathBuf};

use crate::models::bootstrap_config::BootstrapConfig;
use crate::models::connection_parameters::ConnectionParameters;
use crate::services::parameters_renderer::ParametersRenderer;
use crate::utils::error::Result;

/// Render the connection parameters file without touching the environment
#[derive(Debug)]
pub struct RenderCommand {
    pub output: Option<PathBuf>,
    pub stdout: bool,
}

impl RenderCommand {
    pub fn execute(&self, config: &BootstrapConfig, work_dir: &Path) -> Result<i32> {
        let params = ConnectionParameters::from_env();
        let renderer = ParametersRenderer::new();

        if self.stdout {
            print!("{}", renderer.render(&params));
            return Ok(0);
        }

        let target = work_dir.join(self.output.as_ref().unwrap_or(&config.parameters_file));
        let written = renderer.write(&params, &target)?;
        println!("Wrote connection parameters to {}", written.display());

        Ok(0)
    }
}
