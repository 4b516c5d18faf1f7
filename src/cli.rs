use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::platform::Platform;
use crate::weaving::LogFramework;

#[derive(Parser, Debug)]
#[command(name = "whatap-installer")]
#[command(about = "Install and configure WhaTap monitoring agents", long_about = None)]
#[command(version = env!("WHATAP_INSTALLER_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Installer settings file (defaults to ./installer.toml)
    #[arg(long = "config", global = true, env = "WHATAP_INSTALLER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show debug logs and the output of started services
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

/// Collector connection shared by every agent config
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Project license key
    #[arg(long, required_unless_present = "manifest", conflicts_with = "manifest")]
    pub license: Option<String>,

    /// Take the license key from this project manifest
    #[arg(long, requires = "code")]
    pub manifest: Option<PathBuf>,

    /// Code of the manifest project to take the license key from
    #[arg(long, requires = "manifest")]
    pub code: Option<String>,

    /// Collector host (defaults to agent.server_host)
    #[arg(long)]
    pub host: Option<String>,

    /// Collector port (defaults to the agent kind's configured port)
    #[arg(long)]
    pub port: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum RenderCommands {
    /// Write the infrastructure agent whatap.conf
    Infra {
        #[command(flatten)]
        server: ServerArgs,

        /// Destination file
        #[arg(long, default_value = crate::config::INFRA_CONF_PATH)]
        path: PathBuf,
    },

    /// Write the Java agent whatap.conf into the agent home
    Java {
        #[command(flatten)]
        server: ServerArgs,

        /// Java agent home (defaults to agent.java_base_dir)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Spring Boot version to weave, or N/A
        #[arg(long = "spring-boot")]
        spring_boot: Option<String>,

        /// Logging framework to weave
        #[arg(long = "log-framework", default_value_t = LogFramework::None)]
        log_framework: LogFramework,

        /// Forward application logs to the collector
        #[arg(long, default_value = "false", value_parser = ["true", "false"])]
        logsink: String,
    },

    /// Write whatap_env.sh into the application launch directory
    Env {
        /// Directory the WAS or Spring Boot application is started from
        #[arg(long = "was-dir")]
        was_dir: PathBuf,

        /// Java agent home (defaults to agent.java_base_dir)
        #[arg(long = "java-home")]
        java_home: Option<String>,

        /// The application runs on Java 17 or later
        #[arg(long)]
        java17: bool,

        /// The launch command already opens java.base/java.lang
        #[arg(long = "has-reflect-opts")]
        has_reflect_opts: bool,
    },

    /// Write a database agent whatap.conf
    Db {
        #[command(flatten)]
        server: ServerArgs,

        /// Database platform (MYSQL, POSTGRESQL, MSSQL, REDIS)
        #[arg(long)]
        platform: Platform,

        /// DB agent directory
        #[arg(long)]
        dir: PathBuf,

        /// Agent name shown in the monitoring UI
        #[arg(long = "object-name")]
        object_name: String,

        /// Database address
        #[arg(long = "db-addr")]
        db_addr: String,

        /// Database port
        #[arg(long = "db-port")]
        db_port: String,

        /// Monitored database name (PostgreSQL, MSSQL)
        #[arg(long = "db-name")]
        db_name: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ManifestCommands {
    /// List platforms present in the project manifest
    Platforms {
        /// Project manifest file
        #[arg(long, default_value = crate::manifest::MANIFEST_FILE_NAME)]
        file: PathBuf,
    },

    /// List projects of one platform
    Projects {
        /// Project manifest file
        #[arg(long, default_value = crate::manifest::MANIFEST_FILE_NAME)]
        file: PathBuf,

        /// Platform to list
        #[arg(long)]
        platform: Platform,
    },

    /// Show one project and where its agent packages are published
    Show {
        /// Project manifest file
        #[arg(long, default_value = crate::manifest::MANIFEST_FILE_NAME)]
        file: PathBuf,

        /// Project platform
        #[arg(long)]
        platform: Platform,

        /// Project code
        #[arg(long)]
        code: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum StartCommands {
    /// Restart the infrastructure agent service
    Infra,

    /// Register DB credentials (optional) and start a DB agent
    Db {
        /// DB agent directory
        #[arg(long)]
        dir: PathBuf,

        /// Database account the agent connects with
        #[arg(long, requires = "password")]
        user: Option<String>,

        /// Password of the database account
        #[arg(long, env = "WHATAP_DB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration files
    Validate,

    /// Show effective configuration after merging all sources
    Show,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render agent configuration files
    Render {
        #[command(subcommand)]
        command: RenderCommands,
    },

    /// Inspect a downloaded project manifest
    Manifest {
        #[command(subcommand)]
        command: ManifestCommands,
    },

    /// Check that a directory exists and is readable and writable
    CheckPath {
        /// Directory to check
        path: PathBuf,
    },

    /// Start an installed agent
    Start {
        #[command(subcommand)]
        command: StartCommands,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show installer version
    Version,
}
