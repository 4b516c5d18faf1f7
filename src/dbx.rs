use crate::error::Result;
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};

const DBX_JAR_PREFIX: &str = "whatap.agent.dbx-";
const DBX_JAR_SUFFIX: &str = ".jar";

/// Version embedded in a `whatap.agent.dbx-X.Y.Z.jar` file name
fn dbx_jar_version(file_name: &str) -> Option<Version> {
    let version = file_name
        .strip_prefix(DBX_JAR_PREFIX)?
        .strip_suffix(DBX_JAR_SUFFIX)?;

    // Plain X.Y.Z only; leading zeros are allowed and compared numerically
    let mut parts = version.split('.').map(|part| {
        if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse::<u64>().ok()
        } else {
            None
        }
    });
    let (major, minor, patch) = (parts.next()??, parts.next()??, parts.next()??);
    if parts.next().is_some() {
        return None;
    }
    Some(Version::new(major, minor, patch))
}

/// Find the highest-versioned DB agent jar in `dir`.
pub fn latest_dbx_jar(dir: &Path) -> Result<Option<PathBuf>> {
    let mut latest: Option<(Version, PathBuf)> = None;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(version) = file_name.to_str().and_then(dbx_jar_version) else {
            continue;
        };

        if latest.as_ref().map_or(true, |(best, _)| version > *best) {
            latest = Some((version, entry.path()));
        }
    }

    Ok(latest.map(|(_, path)| path))
}
