//! `kiln config`: inspect the effective configuration.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.print(&config.get(&key)?)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            output.print(&config.to_toml()?)?;
        }

        ConfigCommands::Path => {
            if config.sources.is_empty() {
                output.info("No configuration file in use; built-in defaults apply")?;
                if let Some(user) = AppConfig::user_config_path() {
                    output.print(&format!("User config would be read from {}", user.display()))?;
                }
            }
            for source in &config.sources {
                output.print(&source.display().to_string())?;
            }
        }
    }

    Ok(())
}
