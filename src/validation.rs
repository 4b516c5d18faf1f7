//! Input checks the installer runs before touching the filesystem.
//!
//! These are plain predicates so they can be used (and tested) without any
//! prompting loop around them.

use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    None,
    Read,
    Write,
    ReadWrite,
}

impl Permission {
    fn from_flags(readable: bool, writable: bool) -> Self {
        match (readable, writable) {
            (true, true) => Permission::ReadWrite,
            (true, false) => Permission::Read,
            (false, true) => Permission::Write,
            (false, false) => Permission::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::None => "none",
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::ReadWrite => "read-write",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathAccess {
    pub exists: bool,
    pub permission: Permission,
}

/// Classify what the current user may do with `path`.
///
/// Answered by the kernel through `access(2)` with the real uid, so read-only
/// mounts and ACLs count.
pub fn check_path_permissions(path: &Path) -> PathAccess {
    if !path.exists() {
        return PathAccess {
            exists: false,
            permission: Permission::None,
        };
    }

    let (readable, writable) = access_flags(path);
    PathAccess {
        exists: true,
        permission: Permission::from_flags(readable, writable),
    }
}

/// Existing directory the current user can both read and write
pub fn is_writable_directory(path: &Path) -> bool {
    path.is_dir() && check_path_permissions(path).permission == Permission::ReadWrite
}

/// Check `input` against a comma-separated list of accepted answers.
///
/// Returns the matching item, or `None` when the answer is not in the list.
pub fn validate_choice(items: &str, input: &str) -> Option<String> {
    let input = input.trim();
    items
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .find(|item| *item == input)
        .map(str::to_string)
}

#[cfg(unix)]
fn access_flags(path: &Path) -> (bool, bool) {
    use rustix::fs::{access, Access};

    (
        access(path, Access::READ_OK).is_ok(),
        access(path, Access::WRITE_OK).is_ok(),
    )
}

#[cfg(not(unix))]
fn access_flags(path: &Path) -> (bool, bool) {
    match fs::metadata(path) {
        Ok(metadata) => (true, !metadata.permissions().readonly()),
        Err(_) => (false, false),
    }
}
