use std::path::{Path, PathBuf};
use uzers::os::unix::UserExt;

/// Expand a leading `~` or `~user` in an operator-supplied path.
///
/// Paths without a leading tilde are returned unchanged. Returns `None` when
/// the home directory cannot be resolved.
///
/// # Examples
///
/// ```
/// use whatap_installer::utils::path::expand_tilde;
///
/// let conf = expand_tilde("/usr/whatap/infra/conf").unwrap();
/// assert_eq!(conf.to_str(), Some("/usr/whatap/infra/conf"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    let path = path.as_ref();
    let Some(rest) = path.to_str()?.strip_prefix('~') else {
        return Some(path.to_path_buf());
    };

    let (user, tail) = match rest.find('/') {
        Some(idx) => (&rest[..idx], rest[idx..].trim_start_matches('/')),
        None => (rest, ""),
    };

    let home = if user.is_empty() {
        PathBuf::from(std::env::var("HOME").ok()?)
    } else {
        uzers::get_user_by_name(user)?.home_dir().to_path_buf()
    };

    Some(home.join(tail))
}
