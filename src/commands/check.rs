//! Check command handler - Detect stale blocks without writing

use crate::commands::{format_report, CommandContext, CommandOutput};
use crate::config::RegistrarConfig;
use crate::error::Result;
use crate::registrar::{Registrar, RunMode};

/// Run the check command; exits 1 when a sync would change or fail anything
pub fn run_check(config: RegistrarConfig, ctx: &CommandContext) -> Result<CommandOutput> {
    let report = Registrar::new(config).run(RunMode::Check)?;

    let header = if report.is_up_to_date() {
        "check: up to date"
    } else {
        "check: out of date"
    };
    let text = format_report(&report, header, ctx);
    let exit_code = if report.is_up_to_date() { 0 } else { 1 };
    Ok(CommandOutput { text, exit_code })
}
