use crate::config::settings::ProvisionerSettings;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "k5_port")]
#[command(about = "Ansible module that creates a port on the K5 networking service")]
pub struct CliConfig {
    /// JSON arguments file written by Ansible
    pub args_file: PathBuf,

    #[arg(long, help = "Attach the request trace to the module result")]
    pub trace: bool,

    #[arg(long, help = "Per-request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Write logs to stderr as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Environment settings with command line flags layered on top.
    pub fn settings(&self) -> Result<ProvisionerSettings> {
        let mut settings = ProvisionerSettings::from_env()?;
        if self.trace {
            settings.trace = true;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            settings.timeout_seconds = timeout_seconds;
        }
        settings.validate()?;
        Ok(settings)
    }
}
