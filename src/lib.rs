#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod dbx;
pub mod error;
pub mod manifest;
pub mod platform;
pub mod render;
pub mod service;
pub mod utils;
pub mod validation;
pub mod version;
pub mod weaving;
