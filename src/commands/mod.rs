//! Command modules for the ctest-registrar CLI
//!
//! Each command module implements a single top-level command:
//! - `sync` - Rewrite descriptor and suite blocks (default)
//! - `check` - Report stale blocks without writing
//! - `list` - Show discovered suites and test cases
//! - `config` - Show the effective configuration
//!
//! All command handlers take a loaded `RegistrarConfig` and a shared
//! `CommandContext` for output format.

pub mod check;
pub mod config;
pub mod list;
pub mod sync;

pub use check::run_check;
pub use config::run_config;
pub use list::run_list;
pub use sync::run_sync;

use std::process::ExitCode;

use crate::cli::OutputFormat;
use crate::registrar::{RunReport, SuiteReport};

/// Shared context passed to all command handlers
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn from_cli(format: OutputFormat) -> Self {
        Self { format }
    }
}

/// Rendered output plus the process exit status
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub text: String,
    pub exit_code: u8,
}

impl CommandOutput {
    pub fn success(text: String) -> Self {
        Self { text, exit_code: 0 }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_code)
    }
}

/// Render a JSON value, falling back to an error object
pub fn to_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

fn format_suite_text(suite: &SuiteReport, output: &mut String) {
    output.push_str("---\n");
    output.push_str(&format!("suite: {}\n", suite.suite));
    output.push_str(&format!("tests: {}\n", suite.tests.len()));
    output.push_str(&format!("descriptor: {}\n", suite.descriptor.label()));
    output.push_str(&format!("suite_file: {}\n", suite.suite_file.label()));
}

/// Text rendering shared by `sync` and `check`
pub fn format_report_text(report: &RunReport, header: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", header));
    output.push_str(&format!("root: {}\n", report.root));
    output.push_str(&format!("suites: {}\n", report.suites.len()));
    output.push_str(&format!(
        "descriptor: {} ({})\n",
        report.descriptor,
        if report.descriptor_changed {
            "changed"
        } else {
            "unchanged"
        }
    ));
    output.push_str(&format!("changed_files: {}\n", report.changed_files()));
    output.push_str(&format!("failures: {}\n", report.failures()));

    for suite in &report.suites {
        format_suite_text(suite, &mut output);
    }
    output
}

pub fn format_report(report: &RunReport, header: &str, ctx: &CommandContext) -> String {
    match ctx.format {
        OutputFormat::Json => serde_json::to_value(report)
            .map(|value| to_json(&value))
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)),
        OutputFormat::Text => format_report_text(report, header),
    }
}
