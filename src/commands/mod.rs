pub mod check_path;
pub mod config;
pub mod manifest;
pub mod render;
pub mod start;
pub mod version;
