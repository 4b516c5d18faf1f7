use crate::error::{InstallerError, Result};
use crate::render::AgentKind;
use std::fmt;
use std::str::FromStr;

/// Installable target as named in the project manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Infra,
    Java,
    Mysql,
    Postgresql,
    Mssql,
    Redis,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Infra,
        Platform::Java,
        Platform::Mysql,
        Platform::Postgresql,
        Platform::Mssql,
        Platform::Redis,
    ];

    /// Manifest spelling (upper case)
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Infra => "INFRA",
            Platform::Java => "JAVA",
            Platform::Mysql => "MYSQL",
            Platform::Postgresql => "POSTGRESQL",
            Platform::Mssql => "MSSQL",
            Platform::Redis => "REDIS",
        }
    }

    pub fn agent_kind(&self) -> AgentKind {
        match self {
            Platform::Infra => AgentKind::Infrastructure,
            Platform::Java => AgentKind::JavaApplication,
            _ => AgentKind::Database,
        }
    }

    /// Value of the `dbms=` key, `None` for non-database platforms
    pub fn dbms(&self) -> Option<String> {
        match self.agent_kind() {
            AgentKind::Database => Some(self.as_str().to_lowercase()),
            _ => None,
        }
    }

    /// A JDBC driver jar has to be shipped next to the agent
    pub fn requires_jdbc(&self) -> bool {
        matches!(
            self,
            Platform::Mysql | Platform::Postgresql | Platform::Mssql
        )
    }

    /// The agent monitors one named database and needs a `db=` line
    pub fn requires_db_name(&self) -> bool {
        matches!(self, Platform::Postgresql | Platform::Mssql)
    }

    /// Extra config line for the monitored database, empty when not needed
    pub fn db_name_option(&self, db_name: Option<&str>) -> String {
        match db_name {
            Some(name) if self.requires_db_name() => format!("db={}", name),
            _ => String::new(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = InstallerError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InstallerError::UnknownPlatform(s.to_string()))
    }
}
