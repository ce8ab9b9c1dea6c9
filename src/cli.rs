//! CLI argument definitions using clap with subcommand architecture

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{DescriptorLayout, DispatchStyle, RegistrarConfig};

/// Keeps CTest registrations and test dispatch code in sync with test sources
#[derive(Parser, Debug)]
#[command(name = "ctest-registrar")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute (defaults to `sync`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding CMakeLists.txt and the test_*.cpp suites
    #[arg(long, short, global = true, env = "CTEST_REGISTRAR_ROOT")]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/registrar.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (applies to all commands)
    #[arg(short, long, default_value = "text", value_enum, global = true)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

// ============================================
// Main Commands Enum
// ============================================

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite registration and dispatch blocks from the test sources
    Sync(SyncArgs),

    /// Report whether any block is out of date, without writing
    Check,

    /// List discovered suites and their test cases
    #[command(visible_alias = "ls")]
    List,

    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Compute changes but do not write any file
    #[arg(long)]
    pub dry_run: bool,
}

/// Flags that override values from registrar.toml
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Build descriptor file name, relative to the root
    #[arg(long, global = true, value_name = "FILE")]
    pub descriptor: Option<PathBuf>,

    /// Layout of test cases in the build descriptor
    #[arg(long, global = true, value_enum)]
    pub layout: Option<DescriptorLayout>,

    /// Signature of the dispatch function in suite files
    #[arg(long, global = true, value_enum)]
    pub dispatch: Option<DispatchStyle>,

    /// Append a registration block for suites missing from the descriptor
    #[arg(long, global = true)]
    pub insert_missing: bool,

    /// Generate dispatch scaffolding in suites that have none
    #[arg(long, global = true)]
    pub synthesize: bool,
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON for machine parsing
    Json,
}

// ============================================
// Helper Implementations
// ============================================

impl ConfigOverrides {
    /// Apply the flags that were given on top of `config`
    pub fn apply(&self, config: &mut RegistrarConfig) {
        if let Some(descriptor) = &self.descriptor {
            config.descriptor = descriptor.clone();
        }
        if let Some(layout) = self.layout {
            config.descriptor_patch.layout = layout;
        }
        if let Some(dispatch) = self.dispatch {
            config.suite_patch.style = dispatch;
        }
        if self.insert_missing {
            config.descriptor_patch.insert_missing = true;
        }
        if self.synthesize {
            config.suite_patch.synthesize = true;
        }
    }
}

impl Cli {
    /// Log filter directive for the requested verbosity
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "ctest_registrar=warn",
            1 => "ctest_registrar=info",
            _ => "ctest_registrar=debug",
        }
    }
}
