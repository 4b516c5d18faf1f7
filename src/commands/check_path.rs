use crate::error::{InstallerError, Result};
use crate::validation::{self, Permission};
use std::path::Path;

pub fn execute(path: &Path) -> Result<()> {
    let access = validation::check_path_permissions(path);

    println!("Path: {}", path.display());
    println!("  exists: {}", access.exists);
    println!("  permission: {}", access.permission.as_str());

    if access.permission != Permission::ReadWrite || !path.is_dir() {
        return Err(InstallerError::PathNotWritable(path.to_path_buf()));
    }

    println!("✓ Ready for installation");
    Ok(())
}
