//! List command handler - Show discovered suites and test cases

use crate::cli::OutputFormat;
use crate::commands::{to_json, CommandContext, CommandOutput};
use crate::config::RegistrarConfig;
use crate::error::Result;
use crate::registrar::Registrar;

pub fn run_list(config: RegistrarConfig, ctx: &CommandContext) -> Result<CommandOutput> {
    let registrar = Registrar::new(config);
    let listing = registrar.list()?;

    let output = match ctx.format {
        OutputFormat::Json => {
            let json_value = serde_json::json!({
                "_type": "suite_list",
                "root": registrar.config().root.display().to_string(),
                "suites": &listing,
                "count": listing.len(),
            });
            to_json(&json_value)
        }
        OutputFormat::Text => {
            let mut output = String::new();
            output.push_str(&format!("root: {}\n", registrar.config().root.display()));
            output.push_str(&format!("suites_found: {}\n", listing.len()));

            if listing.is_empty() {
                output.push_str(&format!(
                    "\nNo files matching {}*{} found.\n",
                    registrar.config().discovery.prefix,
                    registrar.config().discovery.extension
                ));
            }
            for entry in &listing {
                output.push_str("\n---\n");
                output.push_str(&format!("suite: {}\n", entry.suite.stem));
                output.push_str(&format!("tests: {}\n", entry.tests.len()));
                for case in &entry.tests {
                    output.push_str(&format!("  {} (line {})\n", case.name, case.line));
                }
            }
            output
        }
    };

    Ok(CommandOutput::success(output))
}
