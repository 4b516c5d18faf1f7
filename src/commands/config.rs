use crate::cli::ConfigCommands;
use crate::config::{InstallerConfig, GLOBAL_CONFIG_FILE, LOCAL_CONFIG_FILE};
use crate::error::Result;
use std::path::{Path, PathBuf};

pub fn execute(explicit: Option<&Path>, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Validate => validate(explicit),
        ConfigCommands::Show => show(explicit),
    }
}

fn validate(explicit: Option<&Path>) -> Result<()> {
    let global_config = std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(GLOBAL_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(format!("~/{}", GLOBAL_CONFIG_FILE)));
    let local_config = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));

    println!("Validating configuration files...\n");

    for (label, path) in [("Global config", &global_config), ("Installer config", &local_config)] {
        if path.exists() {
            println!("  {}: {}", label, path.display());
        } else {
            println!("  {}: {} - not found (optional)", label, path.display());
        }
    }

    println!("\nLoading and validating configuration...");
    match InstallerConfig::load(explicit) {
        Ok(_) => {
            println!("✓ Configuration is valid!");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {}", e);
            Err(e)
        }
    }
}

fn show(explicit: Option<&Path>) -> Result<()> {
    let config = InstallerConfig::load(explicit)?;

    println!("Effective Configuration:");
    println!("(CLI > Environment > Installer config > Global config > Defaults)\n");

    let rendered = toml::to_string_pretty(&config).map_err(|e| {
        crate::error::InstallerError::InvalidConfig(format!("Failed to serialize config: {}", e))
    })?;
    println!("{}", rendered);

    Ok(())
}
