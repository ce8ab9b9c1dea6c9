//! Config command handler - Show the effective configuration

use crate::cli::OutputFormat;
use crate::commands::{to_json, CommandContext, CommandOutput};
use crate::config::RegistrarConfig;
use crate::error::{RegistrarError, Result};

pub fn run_config(config: &RegistrarConfig, ctx: &CommandContext) -> Result<CommandOutput> {
    let output = match ctx.format {
        OutputFormat::Json => {
            let value = serde_json::to_value(config).map_err(|e| RegistrarError::Config {
                message: format!("JSON serialization failed: {}", e),
            })?;
            to_json(&value)
        }
        OutputFormat::Text => format!("# root: {}\n{}", config.root.display(), config.display()),
    };
    Ok(CommandOutput::success(output))
}
