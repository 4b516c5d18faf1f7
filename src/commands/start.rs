use crate::cli::StartCommands;
use crate::config::InstallerConfig;
use crate::dbx;
use crate::error::{InstallerError, Result};
use crate::service::ServiceCommand;
use std::path::{Path, PathBuf};

pub fn execute(config: &InstallerConfig, command: &StartCommands) -> Result<()> {
    match command {
        StartCommands::Infra => {
            println!("=== Restarting INFRA agent ===");
            ServiceCommand::restart_infra_agent().run(config.verbose)?;
            println!("Restart complete");
        }
        StartCommands::Db {
            dir,
            user,
            password,
        } => {
            if let (Some(user), Some(password)) = (user, password) {
                println!("=== Registering DB user ===");
                register_user(config, dir, user, password)?;
                println!("DB user registered");
            }

            println!("=== Starting DB agent ===");
            ServiceCommand::start_db_agent(dir).run(config.verbose)?;
            println!("Start complete");
        }
    }

    Ok(())
}

fn register_user(config: &InstallerConfig, dir: &Path, user: &str, password: &str) -> Result<()> {
    let jar = dbx::latest_dbx_jar(dir)?
        .ok_or_else(|| InstallerError::DbxJarNotFound(dir.to_path_buf()))?;
    let java_bin = PathBuf::from(&config.db_agent_env.java_bin_path);

    ServiceCommand::register_db_user(&java_bin, dir, &jar, user, password).run(config.verbose)
}
