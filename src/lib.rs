pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::K5NetworkClient;
pub use config::{ModuleArgs, ProvisionerSettings};
pub use crate::core::{
    module::{run_from_file, run_module, ModuleResult},
    provisioner::PortProvisioner,
    trace::Trace,
};
pub use utils::error::{ProvisionError, Result};
