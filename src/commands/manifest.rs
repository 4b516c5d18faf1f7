use crate::cli::ManifestCommands;
use crate::config::InstallerConfig;
use crate::error::Result;
use crate::manifest::Manifest;

pub fn execute(config: &InstallerConfig, command: &ManifestCommands) -> Result<()> {
    match command {
        ManifestCommands::Platforms { file } => {
            let manifest = Manifest::from_file(file)?;
            println!("Available platforms:");
            for (idx, platform) in manifest.platforms().iter().enumerate() {
                println!("{}. {}", idx + 1, platform);
            }
        }
        ManifestCommands::Projects { file, platform } => {
            let manifest = Manifest::from_file(file)?;
            let projects = manifest.projects_for(*platform);

            if projects.is_empty() {
                println!("No projects found for platform {}.", platform);
                return Ok(());
            }

            println!("Projects for platform {}:", platform);
            for (idx, project) in projects.iter().enumerate() {
                let license = if project.license_key.is_some() {
                    "license"
                } else {
                    "no license"
                };
                println!(
                    "{}. {} ({}) [{}]",
                    idx + 1,
                    project.name,
                    project.project_code,
                    license
                );
            }
        }
        ManifestCommands::Show {
            file,
            platform,
            code,
        } => {
            let manifest = Manifest::from_file(file)?;
            log::debug!("manifest published at {}", config.project_url());
            let project = manifest.find(*platform, code)?;

            println!("Project: {}", project.name);
            println!("  platform: {}", platform);
            println!("  code: {}", project.project_code);
            println!(
                "  license: {}",
                project.license_key.as_deref().unwrap_or("(not set)")
            );
            println!("  agent package: {}", config.agent_url(*platform));
            if platform.requires_jdbc() {
                if let Some(url) = config.jdbc_url(*platform) {
                    println!("  jdbc driver: {}", url);
                }
            }
        }
    }

    Ok(())
}
