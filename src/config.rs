use crate::error::{InstallerError, Result};
use crate::platform::Platform;
use crate::render::AgentKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local settings file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "installer.toml";

/// Per-user settings file looked up in `$HOME`
pub const GLOBAL_CONFIG_FILE: &str = ".whatap-installer.toml";

/// Misspelled `[agent]` key still found in deployed settings files
const LEGACY_APM_CONTENTS_KEY: &str = "deafault_apm_config_contents";

/// Where the infrastructure agent package expects its config
pub const INFRA_CONF_PATH: &str = "/usr/whatap/infra/conf/whatap.conf";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InstallerConfig {
    #[serde(default)]
    pub front: FrontConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub db_agent_env: DbAgentEnvConfig,

    /// Verbose mode (not stored in config file)
    #[serde(skip)]
    pub verbose: bool,
}

/// Download locations, all relative to `base_url`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrontConfig {
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_project_path")]
    pub project_path: String,

    #[serde(default)]
    pub infra_agent_path: String,

    #[serde(default)]
    pub java_agent_path: String,

    #[serde(default)]
    pub db_agent_path: String,

    #[serde(default)]
    pub mysql_jdbc_path: String,

    #[serde(default)]
    pub postgresql_jdbc_path: String,

    #[serde(default)]
    pub mssql_jdbc_path: String,
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            project_path: default_project_path(),
            infra_agent_path: String::new(),
            java_agent_path: String::new(),
            db_agent_path: String::new(),
            mysql_jdbc_path: String::new(),
            postgresql_jdbc_path: String::new(),
            mssql_jdbc_path: String::new(),
        }
    }
}

fn default_project_path() -> String {
    "/project.yaml".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentConfig {
    #[serde(default = "default_temp_base_dir")]
    pub temp_base_dir: String,

    #[serde(default = "default_java_base_dir")]
    pub java_base_dir: String,

    #[serde(default = "default_db_base_dir")]
    pub db_base_dir: String,

    #[serde(default = "default_server_host")]
    pub server_host: String,

    #[serde(default = "default_server_port")]
    pub infra_server_port: String,

    #[serde(default = "default_server_port")]
    pub java_server_port: String,

    #[serde(default = "default_server_port")]
    pub db_server_port: String,

    /// Comma-separated Spring Boot versions offered for weaving
    #[serde(default)]
    pub springboot_versions: String,

    /// Extra `whatap.conf` lines for Java agents, `|` separated
    #[serde(default, alias = "deafault_apm_config_contents")]
    pub default_apm_config_contents: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            temp_base_dir: default_temp_base_dir(),
            java_base_dir: default_java_base_dir(),
            db_base_dir: default_db_base_dir(),
            server_host: default_server_host(),
            infra_server_port: default_server_port(),
            java_server_port: default_server_port(),
            db_server_port: default_server_port(),
            springboot_versions: String::new(),
            default_apm_config_contents: String::new(),
        }
    }
}

fn default_temp_base_dir() -> String {
    "/tmp".to_string()
}

fn default_java_base_dir() -> String {
    "/usr/whatap/java".to_string()
}

fn default_db_base_dir() -> String {
    "/usr/whatap/db".to_string()
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> String {
    "6600".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DbAgentEnvConfig {
    #[serde(default = "default_java_bin_path")]
    pub java_bin_path: String,
}

impl Default for DbAgentEnvConfig {
    fn default() -> Self {
        Self {
            java_bin_path: default_java_bin_path(),
        }
    }
}

fn default_java_bin_path() -> String {
    "java".to_string()
}

impl InstallerConfig {
    /// Load configuration with precedence:
    /// 1. CLI flags (applied by the commands)
    /// 2. Environment variables
    /// 3. Explicit `--config` file, or `installer.toml` in the working directory
    /// 4. Global config (~/.whatap-installer.toml)
    /// 5. Built-in defaults
    ///
    /// Files are layered key by key before deserializing, so a later file can
    /// set a key back to its built-in default.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut layered = toml::Table::new();

        if let Some(home) = home_dir() {
            let global_config = home.join(GLOBAL_CONFIG_FILE);
            if global_config.exists() {
                overlay(&mut layered, read_table(&global_config)?);
            }
        }

        match explicit {
            Some(path) => {
                let path = crate::utils::path::expand_tilde(path)
                    .unwrap_or_else(|| path.to_path_buf());
                if !path.exists() {
                    return Err(InstallerError::InvalidConfig(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                overlay(&mut layered, read_table(&path)?);
            }
            None => {
                let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
                if local_config.exists() {
                    overlay(&mut layered, read_table(&local_config)?);
                }
            }
        }

        let config: InstallerConfig = toml::Value::Table(layered).try_into()?;
        Ok(config.merge_env())
    }

    /// Apply environment variable overrides
    fn merge_env(mut self) -> Self {
        if let Ok(host) = std::env::var("WHATAP_SERVER_HOST") {
            if !host.trim().is_empty() {
                self.agent.server_host = host.trim().to_string();
            }
        }

        if let Ok(url) = std::env::var("WHATAP_BASE_URL") {
            if !url.trim().is_empty() {
                self.front.base_url = url.trim().to_string();
            }
        }

        if let Ok(dir) = std::env::var("WHATAP_TEMP_BASE_DIR") {
            if !dir.trim().is_empty() {
                self.agent.temp_base_dir = dir.trim().to_string();
            }
        }

        self
    }

    /// Collector port for the given agent kind
    pub fn server_port(&self, kind: AgentKind) -> &str {
        match kind {
            AgentKind::Infrastructure => &self.agent.infra_server_port,
            AgentKind::JavaApplication => &self.agent.java_server_port,
            AgentKind::Database => &self.agent.db_server_port,
        }
    }

    /// URL the project manifest is published at
    pub fn project_url(&self) -> String {
        format!("{}{}", self.front.base_url, self.front.project_path)
    }

    /// URL of the agent package for a platform
    pub fn agent_url(&self, platform: Platform) -> String {
        let path = match platform.agent_kind() {
            AgentKind::Infrastructure => &self.front.infra_agent_path,
            AgentKind::JavaApplication => &self.front.java_agent_path,
            AgentKind::Database => &self.front.db_agent_path,
        };
        format!("{}{}", self.front.base_url, path)
    }

    /// URL of the JDBC driver jar, for platforms that ship one
    pub fn jdbc_url(&self, platform: Platform) -> Option<String> {
        let path = match platform {
            Platform::Mysql => &self.front.mysql_jdbc_path,
            Platform::Postgresql => &self.front.postgresql_jdbc_path,
            Platform::Mssql => &self.front.mssql_jdbc_path,
            _ => return None,
        };
        Some(format!("{}{}", self.front.base_url, path))
    }

    /// Spring Boot versions offered for weaving, plus `N/A`
    pub fn springboot_choices(&self) -> String {
        if self.agent.springboot_versions.trim().is_empty() {
            crate::weaving::NOT_APPLICABLE.to_string()
        } else {
            format!(
                "{}, {}",
                self.agent.springboot_versions,
                crate::weaving::NOT_APPLICABLE
            )
        }
    }
}

fn read_table(path: &Path) -> Result<toml::Table> {
    log::debug!("loading config from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    let mut table: toml::Table = contents.parse()?;

    // Older settings files carry the misspelled key
    if let Some(toml::Value::Table(agent)) = table.get_mut("agent") {
        if let Some(value) = agent.remove(LEGACY_APM_CONTENTS_KEY) {
            agent
                .entry("default_apm_config_contents")
                .or_insert(value);
        }
    }
    Ok(table)
}

/// Overlay `layer` onto `base`: sections merge key by key, and any key the
/// layer sets replaces the base value, even when it equals the default.
fn overlay(base: &mut toml::Table, layer: toml::Table) {
    for (key, value) in layer {
        let value = match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(section)), toml::Value::Table(values)) => {
                section.extend(values);
                continue;
            }
            (_, value) => value,
        };
        base.insert(key, value);
    }
}

/// Get the home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
        [front]
        base_url = "https://repo.example.com"
        infra_agent_path = "/agent/infra.deb"
        java_agent_path = "/agent/java.tar.gz"
        db_agent_path = "/agent/db.tar.gz"
        postgresql_jdbc_path = "/jdbc/postgresql.jar"

        [agent]
        server_host = "10.0.0.1/10.0.0.2"
        java_server_port = "6700"
        springboot_versions = "2.7, 3.1"
        deafault_apm_config_contents = "trace_user_enabled=true|profile_sql_param_enabled=false"

        [db_agent_env]
        java_bin_path = "/usr/lib/jvm/bin/java"
    "#;

    #[test]
    fn test_default_config() {
        let config = InstallerConfig::default();
        assert_eq!(config.agent.temp_base_dir, "/tmp");
        assert_eq!(config.agent.infra_server_port, "6600");
        assert_eq!(config.db_agent_env.java_bin_path, "java");
        assert_eq!(config.front.project_path, "/project.yaml");
    }

    #[test]
    fn test_parse_sample() {
        let config: InstallerConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.front.base_url, "https://repo.example.com");
        assert_eq!(config.agent.java_server_port, "6700");
        assert_eq!(config.agent.db_server_port, "6600");
        assert_eq!(
            config.agent.default_apm_config_contents,
            "trace_user_enabled=true|profile_sql_param_enabled=false"
        );
    }

    #[test]
    fn test_overlay_merges_sections() {
        let mut base: toml::Table =
            "[agent]\nserver_host = \"10.0.0.9\"\n[front]\nbase_url = \"https://base\"\n"
                .parse()
                .unwrap();
        let layer: toml::Table = "[agent]\ndb_server_port = \"6800\"\n".parse().unwrap();

        overlay(&mut base, layer);
        let merged: InstallerConfig = toml::Value::Table(base).try_into().unwrap();
        assert_eq!(merged.agent.server_host, "10.0.0.9"); // Kept from base
        assert_eq!(merged.front.base_url, "https://base"); // Kept from base
        assert_eq!(merged.agent.db_server_port, "6800"); // From layer
    }

    #[test]
    fn test_overlay_can_restore_default() {
        let mut base: toml::Table = "[agent]\njava_server_port = \"6700\"\n".parse().unwrap();
        let layer: toml::Table = "[agent]\njava_server_port = \"6600\"\n".parse().unwrap();

        overlay(&mut base, layer);
        let merged: InstallerConfig = toml::Value::Table(base).try_into().unwrap();
        assert_eq!(merged.agent.java_server_port, "6600");
    }

    #[test]
    fn test_urls() {
        let config: InstallerConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(
            config.project_url(),
            "https://repo.example.com/project.yaml"
        );
        assert_eq!(
            config.agent_url(Platform::Redis),
            "https://repo.example.com/agent/db.tar.gz"
        );
        assert_eq!(
            config.jdbc_url(Platform::Postgresql).as_deref(),
            Some("https://repo.example.com/jdbc/postgresql.jar")
        );
        assert_eq!(config.jdbc_url(Platform::Redis), None);
    }

    #[test]
    fn test_server_port_per_kind() {
        let config: InstallerConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.server_port(AgentKind::JavaApplication), "6700");
        assert_eq!(config.server_port(AgentKind::Infrastructure), "6600");
    }

    #[test]
    fn test_springboot_choices() {
        let config: InstallerConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.springboot_choices(), "2.7, 3.1, N/A");
        assert_eq!(InstallerConfig::default().springboot_choices(), "N/A");
    }

    #[test]
    #[serial]
    fn test_load_explicit_file_and_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("installer.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let original_home = env::var("HOME").ok();
        env::set_var("HOME", temp.path());
        env::set_var("WHATAP_SERVER_HOST", "collector.internal");

        let config = InstallerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.agent.server_host, "collector.internal");
        assert_eq!(config.agent.java_server_port, "6700");

        env::remove_var("WHATAP_SERVER_HOST");
        if let Some(home) = original_home {
            env::set_var("HOME", home);
        } else {
            env::remove_var("HOME");
        }
    }

    #[test]
    #[serial]
    fn test_load_global_then_explicit() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(GLOBAL_CONFIG_FILE),
            "[agent]\nserver_host = \"global.host\"\ndb_base_dir = \"/data/whatap\"\n",
        )
        .unwrap();
        let explicit = temp.path().join("site.toml");
        std::fs::write(&explicit, "[agent]\nserver_host = \"site.host\"\n").unwrap();

        let original_home = env::var("HOME").ok();
        env::set_var("HOME", temp.path());

        let config = InstallerConfig::load(Some(&explicit)).unwrap();
        assert_eq!(config.agent.server_host, "site.host");
        assert_eq!(config.agent.db_base_dir, "/data/whatap");

        if let Some(home) = original_home {
            env::set_var("HOME", home);
        } else {
            env::remove_var("HOME");
        }
    }

    #[test]
    #[serial]
    fn test_load_local_file_restores_default_port() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(GLOBAL_CONFIG_FILE),
            "[agent]\njava_server_port = \"6700\"\ndeafault_apm_config_contents = \"a=1\"\n",
        )
        .unwrap();
        let explicit = temp.path().join("site.toml");
        std::fs::write(
            &explicit,
            "[agent]\njava_server_port = \"6600\"\ndefault_apm_config_contents = \"b=2\"\n",
        )
        .unwrap();

        let original_home = env::var("HOME").ok();
        env::set_var("HOME", temp.path());

        let config = InstallerConfig::load(Some(&explicit)).unwrap();
        assert_eq!(config.agent.java_server_port, "6600");
        assert_eq!(config.agent.default_apm_config_contents, "b=2");

        if let Some(home) = original_home {
            env::set_var("HOME", home);
        } else {
            env::remove_var("HOME");
        }
    }

    #[test]
    #[serial]
    fn test_load_missing_explicit_file() {
        let result = InstallerConfig::load(Some(Path::new("/nonexistent/installer.toml")));
        assert!(matches!(result, Err(InstallerError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let result: std::result::Result<InstallerConfig, _> = toml::from_str("[agent\n");
        assert!(result.is_err());
    }
}
