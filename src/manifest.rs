use crate::error::{InstallerError, Result};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Default file name of the downloaded project metadata
pub const MANIFEST_FILE_NAME: &str = "project.yaml";

/// One monitoring project the operator can install an agent for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "Platform")]
    pub platform: String,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "ProjectCode")]
    pub project_code: String,

    #[serde(rename = "LicenseKey", default, skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,
}

/// Project metadata: a flat YAML list of projects.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub projects: Vec<Project>,
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let projects: Vec<Project> = serde_yaml::from_str(contents)?;
        Ok(Self { projects })
    }

    /// Distinct platform names, sorted
    pub fn platforms(&self) -> Vec<String> {
        self.projects
            .iter()
            .map(|p| p.platform.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Projects of one platform, in manifest order
    pub fn projects_for(&self, platform: Platform) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.platform.eq_ignore_ascii_case(platform.as_str()))
            .collect()
    }

    pub fn find(&self, platform: Platform, project_code: &str) -> Result<&Project> {
        self.projects_for(platform)
            .into_iter()
            .find(|p| p.project_code == project_code)
            .ok_or_else(|| InstallerError::ProjectNotFound {
                platform: platform.to_string(),
                code: project_code.to_string(),
            })
    }
}

impl Project {
    /// License key, or an error naming the project when the manifest has none
    pub fn license(&self) -> Result<&str> {
        self.license_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| InstallerError::LicenseKeyMissing {
                platform: self.platform.clone(),
                code: self.project_code.clone(),
            })
    }
}
