use crate::cli::{RenderCommands, ServerArgs};
use crate::config::InstallerConfig;
use crate::error::{InstallerError, Result};
use crate::manifest::Manifest;
use crate::platform::Platform;
use crate::render::{
    self, AgentKind, DatabaseAgentParams, EnvScriptParams, JavaAgentParams, RenderedFile,
    AGENT_CONF_FILE_NAME, ENV_SCRIPT_FILE_NAME,
};
use crate::validation;
use crate::weaving::{self, LogFramework};
use std::path::{Path, PathBuf};

pub fn execute(config: &InstallerConfig, command: &RenderCommands) -> Result<()> {
    let file = match command {
        RenderCommands::Infra { server, path } => {
            let license = resolve_license(server, Platform::Infra)?;
            let (host, port) = resolve_server(config, server, AgentKind::Infrastructure);
            println!("=== Creating whatap.conf ===");
            render::render_infrastructure_config(path, &license, &host, &port)?
        }
        RenderCommands::Java {
            server,
            dir,
            spring_boot,
            log_framework,
            logsink,
        } => {
            let params = java_params(
                config,
                server,
                spring_boot.as_deref(),
                *log_framework,
                logsink,
            )?;
            let dir = dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.agent.java_base_dir));
            println!("=== Creating whatap.conf ===");
            render::render_java_agent_config(&dir.join(AGENT_CONF_FILE_NAME), &params)?
        }
        RenderCommands::Env {
            was_dir,
            java_home,
            java17,
            has_reflect_opts,
        } => {
            ensure_writable(was_dir)?;
            let params = env_params(config, java_home.as_deref(), *java17, *has_reflect_opts);
            println!("=== Creating {} ===", ENV_SCRIPT_FILE_NAME);
            let file =
                render::render_environment_script(&was_dir.join(ENV_SCRIPT_FILE_NAME), &params)?;
            println!(
                "Run 'source {}' in the application environment, then add $WHATAP_OPTS to the java command line.",
                file.path.display()
            );
            file
        }
        RenderCommands::Db {
            server,
            platform,
            dir,
            object_name,
            db_addr,
            db_port,
            db_name,
        } => {
            let params = database_params(
                config,
                server,
                *platform,
                object_name,
                db_addr,
                db_port,
                db_name.as_deref(),
            )?;
            println!("=== Creating whatap.conf ===");
            render::render_database_agent_config(&dir.join(AGENT_CONF_FILE_NAME), &params)?
        }
    };

    report(&file);
    Ok(())
}

/// License key from `--license`, or from the selected manifest project
fn resolve_license(server: &ServerArgs, platform: Platform) -> Result<String> {
    if let Some(license) = &server.license {
        return Ok(license.clone());
    }

    match (&server.manifest, &server.code) {
        (Some(file), Some(code)) => {
            let manifest = Manifest::from_file(file)?;
            let project = manifest.find(platform, code)?;
            log::debug!("using license of project {} ({})", project.name, code);
            Ok(project.license()?.to_string())
        }
        _ => Err(InstallerError::InvalidConfig(
            "either --license or --manifest with --code is required".to_string(),
        )),
    }
}

/// Host and port from flags, falling back to the installer config
fn resolve_server(
    config: &InstallerConfig,
    server: &ServerArgs,
    kind: AgentKind,
) -> (String, String) {
    let host = server
        .host
        .clone()
        .unwrap_or_else(|| config.agent.server_host.clone());
    let port = server
        .port
        .clone()
        .unwrap_or_else(|| config.server_port(kind).to_string());
    (host, port)
}

fn java_params(
    config: &InstallerConfig,
    server: &ServerArgs,
    spring_boot: Option<&str>,
    log_framework: LogFramework,
    logsink: &str,
) -> Result<JavaAgentParams> {
    if let Some(version) = spring_boot {
        let choices = config.springboot_choices();
        if !config.agent.springboot_versions.trim().is_empty()
            && validation::validate_choice(&choices, version).is_none()
        {
            return Err(InstallerError::InvalidConfig(format!(
                "Spring Boot version '{}' is not one of [{}]",
                version, choices
            )));
        }
    }

    let license = resolve_license(server, Platform::Java)?;
    let (server_host, server_port) = resolve_server(config, server, AgentKind::JavaApplication);
    Ok(JavaAgentParams {
        license,
        server_host,
        server_port,
        weaving: weaving::build_weaving(spring_boot, log_framework),
        logsink_enabled: logsink.to_string(),
        option_block: config.agent.default_apm_config_contents.clone(),
    })
}

fn env_params(
    config: &InstallerConfig,
    java_home: Option<&str>,
    java17: bool,
    has_reflect_opts: bool,
) -> EnvScriptParams {
    let java_base_dir = java_home.unwrap_or(&config.agent.java_base_dir);
    let extra = weaving::reflect_option_line(java17, has_reflect_opts).unwrap_or_default();
    EnvScriptParams::new(java_base_dir, &extra)
}

fn database_params(
    config: &InstallerConfig,
    server: &ServerArgs,
    platform: Platform,
    object_name: &str,
    db_addr: &str,
    db_port: &str,
    db_name: Option<&str>,
) -> Result<DatabaseAgentParams> {
    let dbms = platform.dbms().ok_or_else(|| {
        InstallerError::InvalidConfig(format!("{} is not a database platform", platform))
    })?;

    if platform.requires_db_name() && db_name.map_or(true, |n| n.trim().is_empty()) {
        return Err(InstallerError::InvalidConfig(format!(
            "--db-name is required for {}",
            platform
        )));
    }

    let license = resolve_license(server, platform)?;
    let (server_host, server_port) = resolve_server(config, server, AgentKind::Database);
    Ok(DatabaseAgentParams {
        license,
        server_host,
        server_port,
        object_name: object_name.to_string(),
        dbms,
        extra_option: platform.db_name_option(db_name),
        db_addr: db_addr.to_string(),
        db_port: db_port.to_string(),
    })
}

fn ensure_writable(dir: &Path) -> Result<()> {
    if validation::is_writable_directory(dir) {
        Ok(())
    } else {
        Err(InstallerError::PathNotWritable(dir.to_path_buf()))
    }
}

fn report(file: &RenderedFile) {
    println!("Created: {}", file.path.display());
    if let Some(mode) = file.mode {
        println!("Mode: {:o}", mode);
    }
    println!("Contents:");
    println!("{}", file.content);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(license: &str) -> ServerArgs {
        ServerArgs {
            license: Some(license.to_string()),
            manifest: None,
            code: None,
            host: None,
            port: None,
        }
    }

    #[test]
    fn test_resolve_server_defaults_from_config() {
        let mut config = InstallerConfig::default();
        config.agent.server_host = "collector".to_string();
        config.agent.db_server_port = "6800".to_string();

        let (host, port) = resolve_server(&config, &server("L"), AgentKind::Database);
        assert_eq!(host, "collector");
        assert_eq!(port, "6800");
    }

    #[test]
    fn test_resolve_server_flags_win() {
        let config = InstallerConfig::default();
        let args = ServerArgs {
            license: Some("L".to_string()),
            manifest: None,
            code: None,
            host: Some("flag.host".to_string()),
            port: Some("7000".to_string()),
        };

        let (host, port) = resolve_server(&config, &args, AgentKind::Infrastructure);
        assert_eq!(host, "flag.host");
        assert_eq!(port, "7000");
    }

    #[test]
    fn test_java_params_use_config_option_block() {
        let mut config = InstallerConfig::default();
        config.agent.default_apm_config_contents = "a=1|b=2".to_string();
        config.agent.springboot_versions = "2.7, 3.1".to_string();

        let params =
            java_params(&config, &server("L"), Some("3.1"), LogFramework::Logback, "true").unwrap();
        assert_eq!(params.weaving, "spring-boot-3.1,logback-1.2.8 ");
        assert_eq!(params.option_block, "a=1|b=2");
        assert_eq!(params.logsink_enabled, "true");
    }

    #[test]
    fn test_java_params_reject_unknown_spring_boot() {
        let mut config = InstallerConfig::default();
        config.agent.springboot_versions = "2.7, 3.1".to_string();

        let result = java_params(&config, &server("L"), Some("1.5"), LogFramework::None, "false");
        assert!(matches!(result, Err(InstallerError::InvalidConfig(_))));
    }

    #[test]
    fn test_env_params_reflect_line() {
        let config = InstallerConfig::default();
        let params = env_params(&config, None, true, false);
        assert_eq!(params.java_base_dir, "/usr/whatap/java");
        assert_eq!(params.extra_option_line, weaving::REFLECT_OPTION_LINE);

        let params = env_params(&config, Some("/opt/java-agent"), false, false);
        assert_eq!(params.java_base_dir, "/opt/java-agent");
        assert!(params.extra_option_line.is_empty());
    }

    #[test]
    fn test_database_params_postgres_requires_db_name() {
        let config = InstallerConfig::default();
        let result = database_params(
            &config,
            &server("L"),
            Platform::Postgresql,
            "orders",
            "10.0.0.5",
            "5432",
            None,
        );
        assert!(matches!(result, Err(InstallerError::InvalidConfig(_))));
    }

    #[test]
    fn test_database_params_mysql_ignores_db_name() {
        let config = InstallerConfig::default();
        let params = database_params(
            &config,
            &server("L"),
            Platform::Mysql,
            "orders",
            "10.0.0.5",
            "3306",
            Some("sales"),
        )
        .unwrap();
        assert_eq!(params.dbms, "mysql");
        assert!(params.extra_option.is_empty());
    }

    fn manifest_server(temp: &tempfile::TempDir, code: &str) -> ServerArgs {
        let file = temp.path().join("project.yaml");
        std::fs::write(
            &file,
            "- Platform: MYSQL\n  Name: orders-db\n  ProjectCode: \"3001\"\n  LicenseKey: x41pl-db\n\
             - Platform: MYSQL\n  Name: audit-db\n  ProjectCode: \"3002\"\n",
        )
        .unwrap();
        ServerArgs {
            license: None,
            manifest: Some(file),
            code: Some(code.to_string()),
            host: None,
            port: None,
        }
    }

    #[test]
    fn test_license_from_manifest_project() {
        let temp = tempfile::TempDir::new().unwrap();
        let license = resolve_license(&manifest_server(&temp, "3001"), Platform::Mysql).unwrap();
        assert_eq!(license, "x41pl-db");
    }

    #[test]
    fn test_license_missing_in_manifest_project() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = resolve_license(&manifest_server(&temp, "3002"), Platform::Mysql);
        assert!(matches!(
            result,
            Err(InstallerError::LicenseKeyMissing { .. })
        ));
    }

    #[test]
    fn test_license_project_of_other_platform() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = resolve_license(&manifest_server(&temp, "3001"), Platform::Postgresql);
        assert!(matches!(result, Err(InstallerError::ProjectNotFound { .. })));
    }

    #[test]
    fn test_database_params_rejects_non_db_platform() {
        let config = InstallerConfig::default();
        let result = database_params(
            &config,
            &server("L"),
            Platform::Java,
            "orders",
            "10.0.0.5",
            "3306",
            None,
        );
        assert!(result.is_err());
    }
}
