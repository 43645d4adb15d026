use clap::Parser;
use k5_port::utils::logger;
use k5_port::{run_from_file, CliConfig, ModuleResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_module_logger(config.verbose);
    }

    tracing::info!("🚀 Starting k5_port module");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let result = match config.settings() {
        Ok(settings) => run_from_file(&config.args_file, &settings).await,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            ModuleResult::from_error(&e, None)
        }
    };

    // Ansible reads exactly one JSON document from stdout.
    println!("{}", serde_json::to_string(&result)?);

    let exit_code = result.exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
