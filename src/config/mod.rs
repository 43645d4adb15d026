#[cfg(feature = "cli")]
pub mod cli;
pub mod module_args;
pub mod settings;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use module_args::ModuleArgs;
pub use settings::ProvisionerSettings;
