use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Project manifest parse error: {0}")]
    ManifestParse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown platform: {0}. Expected one of INFRA, JAVA, MYSQL, POSTGRESQL, MSSQL, REDIS")]
    UnknownPlatform(String),

    #[error("Project {code} not found for platform {platform}")]
    ProjectNotFound { platform: String, code: String },

    #[error("LicenseKey does not exist for project {code} ({platform})")]
    LicenseKeyMissing { platform: String, code: String },

    #[error("'{0}' does not exist or is not readable and writable")]
    PathNotWritable(PathBuf),

    #[error("{0} not installed or not on PATH")]
    ToolNotInstalled(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("No whatap.agent.dbx jar found in {0}")]
    DbxJarNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, InstallerError>;
