// Compile-time constants from Cargo.toml and build.rs
pub const VERSION: &str = env!("WHATAP_INSTALLER_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    #[test]
    fn test_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(PKG_NAME, "whatap-installer");
    }

    #[test]
    fn test_version_is_valid_semver_with_metadata() {
        // Release: "0.3.0", debug: "0.3.0-dev+a1b2c3d4[.dirty]"
        assert!(
            Version::parse(VERSION).is_ok(),
            "Version should be valid semver: {}",
            VERSION
        );
    }
}
