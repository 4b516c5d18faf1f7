/// Quote a string for display or reuse inside a POSIX shell command line.
///
/// # Examples
///
/// ```
/// use whatap_installer::utils::shell::escape;
///
/// assert_eq!(escape("startd.sh"), "'startd.sh'");
/// assert_eq!(escape("it's"), "'it'\\''s'");
/// ```
pub fn escape(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Quote every argument and join them with spaces
pub fn join_args(args: &[impl AsRef<str>]) -> String {
    args.iter()
        .map(|arg| escape(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
