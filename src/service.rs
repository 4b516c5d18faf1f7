use crate::error::{InstallerError, Result};
use crate::utils::shell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// systemd unit installed by the infrastructure agent package
pub const INFRA_SERVICE_UNIT: &str = "whatap-infra.service";

/// Start script shipped inside every DB agent directory
pub const DB_START_SCRIPT: &str = "startd.sh";

/// uid the DB agent stores its monitoring credentials under
const DB_USER_UID: &str = "1000";

/// An external command that brings an agent up after its files are in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Argument indexes whose values are hidden when displayed
    secret_args: Vec<usize>,
}

impl ServiceCommand {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: None,
            secret_args: Vec::new(),
        }
    }

    fn in_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Restart the infrastructure agent's systemd unit
    pub fn restart_infra_agent() -> Self {
        Self::new("sudo", &["systemctl", "restart", INFRA_SERVICE_UNIT])
    }

    /// Run the DB agent's own start script from its directory
    pub fn start_db_agent(agent_dir: &Path) -> Self {
        Self::new("sh", &[DB_START_SCRIPT]).in_dir(agent_dir)
    }

    /// Store the DB account the agent connects with
    pub fn register_db_user(
        java_bin: &Path,
        agent_dir: &Path,
        dbx_jar: &Path,
        user: &str,
        password: &str,
    ) -> Self {
        let java = java_bin.to_string_lossy().into_owned();
        let jar = dbx_jar.to_string_lossy().into_owned();
        let mut cmd = Self::new(
            java.as_str(),
            &[
                "-cp",
                jar.as_str(),
                "whatap.dbx.DbUser",
                "-update",
                "-uid",
                DB_USER_UID,
                "-user",
                user,
                "-password",
                password,
            ],
        )
        .in_dir(agent_dir);
        cmd.secret_args.push(cmd.args.len() - 1);
        cmd
    }

    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    /// Run the command, inheriting the terminal when `verbose`.
    pub fn run(&self, verbose: bool) -> Result<()> {
        if !self.is_available() {
            return Err(InstallerError::ToolNotInstalled(self.program.clone()));
        }

        log::debug!("running {}", self);

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let result = if verbose {
            cmd.status()
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null()).status()
        };

        let status = result.map_err(|e| {
            InstallerError::CommandFailed(format!("Failed to run {}: {}", self.program, e))
        })?;

        if !status.success() {
            return Err(InstallerError::CommandFailed(format!(
                "{} exited with {}",
                self, status
            )));
        }

        Ok(())
    }
}

impl fmt::Display for ServiceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: Vec<&str> = std::iter::once(self.program.as_str())
            .chain(self.args.iter().enumerate().map(|(i, arg)| {
                if self.secret_args.contains(&i) {
                    "********"
                } else {
                    arg.as_str()
                }
            }))
            .collect();
        write!(f, "{}", shell::join_args(&shown))?;
        if let Some(dir) = &self.cwd {
            write!(f, " (in {})", dir.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_infra_agent() {
        let cmd = ServiceCommand::restart_infra_agent();
        assert_eq!(cmd.program, "sudo");
        assert_eq!(cmd.args, vec!["systemctl", "restart", "whatap-infra.service"]);
        assert_eq!(cmd.cwd, None);
    }

    #[test]
    fn test_start_db_agent_runs_in_dir() {
        let cmd = ServiceCommand::start_db_agent(Path::new("/opt/whatap/orders"));
        assert_eq!(cmd.program, "sh");
        assert_eq!(cmd.args, vec!["startd.sh"]);
        assert_eq!(cmd.cwd, Some(PathBuf::from("/opt/whatap/orders")));
    }

    #[test]
    fn test_register_db_user_args() {
        let cmd = ServiceCommand::register_db_user(
            Path::new("/usr/bin/java"),
            Path::new("/opt/whatap/orders"),
            Path::new("/opt/whatap/orders/whatap.agent.dbx-2.3.10.jar"),
            "monitor",
            "s3cret",
        );
        assert_eq!(cmd.program, "/usr/bin/java");
        assert_eq!(
            cmd.args,
            vec![
                "-cp",
                "/opt/whatap/orders/whatap.agent.dbx-2.3.10.jar",
                "whatap.dbx.DbUser",
                "-update",
                "-uid",
                "1000",
                "-user",
                "monitor",
                "-password",
                "s3cret",
            ]
        );
    }

    #[test]
    fn test_display_masks_password() {
        let cmd = ServiceCommand::register_db_user(
            Path::new("java"),
            Path::new("/opt/db"),
            Path::new("dbx.jar"),
            "monitor",
            "s3cret",
        );
        let shown = cmd.to_string();
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("'********'"));
        assert!(shown.ends_with("(in /opt/db)"));
    }

    #[test]
    fn test_run_missing_program() {
        let cmd = ServiceCommand::new("whatap-no-such-program-xyz", &[]);
        assert!(matches!(
            cmd.run(false),
            Err(InstallerError::ToolNotInstalled(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_failure_status() {
        let cmd = ServiceCommand::new("sh", &["-c", "exit 3"]);
        let err = cmd.run(false).unwrap_err();
        assert!(matches!(err, InstallerError::CommandFailed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_in_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join(DB_START_SCRIPT), "touch started\n").unwrap();

        ServiceCommand::start_db_agent(temp.path()).run(false).unwrap();
        assert!(temp.path().join("started").exists());
    }
}
