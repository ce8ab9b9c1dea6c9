//! Sync command handler - Rewrite registration and dispatch blocks

use crate::cli::SyncArgs;
use crate::commands::{format_report, CommandContext, CommandOutput};
use crate::config::RegistrarConfig;
use crate::error::Result;
use crate::registrar::{Registrar, RunMode};

/// Exit status when some anchor could not be found
pub const EXIT_PATCH_FAILURES: u8 = 3;

/// Run the sync command
pub fn run_sync(
    args: &SyncArgs,
    config: RegistrarConfig,
    ctx: &CommandContext,
) -> Result<CommandOutput> {
    let mode = if args.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Write
    };
    let report = Registrar::new(config).run(mode)?;

    let header = if args.dry_run { "sync (dry run)" } else { "sync" };
    let text = format_report(&report, header, ctx);
    let exit_code = if report.failures() > 0 {
        EXIT_PATCH_FAILURES
    } else {
        0
    };
    Ok(CommandOutput { text, exit_code })
}
