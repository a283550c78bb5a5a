use std::path::PathBuf;
use std::time::Duration;

use crate::cli::print_json;
use crate::models::bootstrap_config::BootstrapConfig;
use crate::models::connection_parameters::ConnectionParameters;
use crate::models::pipeline_report::PipelineReport;
use crate::services::pipeline::Pipeline;
use crate::utils::error::Result;

/// Run the whole bootstrap sequence
#[derive(Debug)]
pub struct RunCommand {
    /// Kill the test runner after this many seconds
    pub timeout_secs: Option<u64>,

    /// Output a JSON report
    pub json: bool,

    /// Additional arguments to pass to the test runner
    pub args: Vec<String>,
}

impl RunCommand {
    /// Execute the run command
    pub async fn execute(&self, config: BootstrapConfig, work_dir: PathBuf) -> Result<i32> {
        let pipeline = Pipeline::new(config, ConnectionParameters::from_env(), work_dir)
            .with_runner_args(self.args.clone())
            .with_timeout(self.timeout_secs.map(Duration::from_secs));

        let mut report = PipelineReport::new();
        let result = pipeline.execute(&mut report).await;

        // The runner shares stdout, so the report goes last.
        if self.json {
            print_json(&report)?;
        }

        result
    }
}
