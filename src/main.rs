#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use whatap_installer::cli::{Cli, Commands};
use whatap_installer::commands;
use whatap_installer::config::InstallerConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    // RUST_LOG still wins over the verbosity flag
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    // Commands that don't need the merged installer settings
    match &cli.command {
        Commands::Version => {
            commands::version::execute()?;
            return Ok(());
        }
        Commands::CheckPath { path } => {
            commands::check_path::execute(path)?;
            return Ok(());
        }
        Commands::Config { command } => {
            commands::config::execute(cli.config.as_deref(), command)?;
            return Ok(());
        }
        _ => {}
    }

    let mut config = InstallerConfig::load(cli.config.as_deref())?;
    config.verbose = cli.verbose;
    log::debug!("effective config: {:?}", config);

    match &cli.command {
        Commands::Render { command } => commands::render::execute(&config, command)?,
        Commands::Start { command } => commands::start::execute(&config, command)?,
        Commands::Manifest { command } => commands::manifest::execute(&config, command)?,
        _ => unreachable!(),
    }

    Ok(())
}
