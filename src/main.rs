//! ctest-registrar CLI entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ctest_registrar::cli::SyncArgs;
use ctest_registrar::commands::{
    run_check, run_config, run_list, run_sync, CommandContext, CommandOutput,
};
use ctest_registrar::{Cli, Commands, RegistrarConfig, RegistrarError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(output) => {
            print!("{}", output.text);
            if !output.text.ends_with('\n') {
                println!();
            }
            output.exit_code()
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

/// Diagnostics go to stderr; stdout carries only the report
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn load_config(cli: &Cli) -> ctest_registrar::Result<RegistrarConfig> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()
            .map_err(|e| RegistrarError::io(PathBuf::from("."), e))?,
    };

    let mut config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                return Err(RegistrarError::Config {
                    message: format!("Config file not found: {}", path.display()),
                });
            }
            RegistrarConfig::load_from(&root, path)?
        }
        None => RegistrarConfig::load(&root)?,
    };
    cli.overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> ctest_registrar::Result<CommandOutput> {
    let config = load_config(cli)?;
    let ctx = CommandContext::from_cli(cli.format);

    match &cli.command {
        None => run_sync(&SyncArgs::default(), config, &ctx),
        Some(Commands::Sync(args)) => run_sync(args, config, &ctx),
        Some(Commands::Check) => run_check(config, &ctx),
        Some(Commands::List) => run_list(config, &ctx),
        Some(Commands::Config) => run_config(&config, &ctx),
    }
}
