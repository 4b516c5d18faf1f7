//! Agent configuration and environment script rendering.
//!
//! Each agent kind has a parameter struct whose `content()` produces the exact
//! bytes the agent expects on disk, and a `render_*` function that writes those
//! bytes to a caller-supplied path. Rendering is a pure function of the
//! parameters plus one file write; nothing is cached between calls.

pub mod database;
pub mod env_script;
pub mod infra;
pub mod java;

pub use database::{render_database_agent_config, DatabaseAgentParams};
pub use env_script::{render_environment_script, EnvScriptParams, ENV_SCRIPT_FILE_NAME};
pub use infra::{render_infrastructure_config, CreatedTime, InfraParams};
pub use java::{render_java_agent_config, JavaAgentParams};

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Name of the agent configuration file inside every agent home.
pub const AGENT_CONF_FILE_NAME: &str = "whatap.conf";

/// Which template and parameter set applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Infrastructure,
    JavaApplication,
    Database,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Infrastructure => "infrastructure",
            AgentKind::JavaApplication => "java",
            AgentKind::Database => "database",
        }
    }
}

/// Fully resolved parameters for one render call.
#[derive(Debug, Clone)]
pub enum RenderParams {
    Infrastructure(InfraParams),
    JavaAgent(JavaAgentParams),
    DatabaseAgent(DatabaseAgentParams),
    EnvScript(EnvScriptParams),
}

impl RenderParams {
    pub fn kind(&self) -> AgentKind {
        match self {
            RenderParams::Infrastructure(_) => AgentKind::Infrastructure,
            RenderParams::JavaAgent(_) | RenderParams::EnvScript(_) => AgentKind::JavaApplication,
            RenderParams::DatabaseAgent(_) => AgentKind::Database,
        }
    }

    /// Build the file for these parameters without writing it.
    pub fn to_file(&self, path: &Path) -> RenderedFile {
        match self {
            RenderParams::Infrastructure(p) => RenderedFile::config(path, p.content()),
            RenderParams::JavaAgent(p) => RenderedFile::config(path, p.content()),
            RenderParams::DatabaseAgent(p) => RenderedFile::config(path, p.content()),
            RenderParams::EnvScript(p) => RenderedFile::executable(path, p.content()),
        }
    }
}

/// Render any agent file to `path`.
pub fn render(path: &Path, params: &RenderParams) -> Result<RenderedFile> {
    let file = params.to_file(path);
    log::debug!(
        "rendering {} file to {}",
        params.kind().as_str(),
        path.display()
    );
    file.write()?;
    Ok(file)
}

/// A file produced by the renderer: where it goes, what it holds, and the
/// permission bits it must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
    /// `None` leaves the process default (umask) in place
    pub mode: Option<u32>,
}

impl RenderedFile {
    pub fn config(path: &Path, content: String) -> Self {
        Self {
            path: path.to_path_buf(),
            content,
            mode: None,
        }
    }

    pub fn executable(path: &Path, content: String) -> Self {
        Self {
            path: path.to_path_buf(),
            content,
            mode: Some(0o755),
        }
    }

    /// Write the file, creating missing parent directories first.
    ///
    /// An existing file is overwritten in place. On error the file content is
    /// undefined and the caller should render again from scratch.
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, &self.content)?;

        #[cfg(unix)]
        if let Some(mode) = self.mode {
            fs::set_permissions(&self.path, fs::Permissions::from_mode(mode))?;
        }

        log::info!("wrote {} ({} bytes)", self.path.display(), self.content.len());
        Ok(())
    }
}
