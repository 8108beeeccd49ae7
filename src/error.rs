//! Error types for the launcher.
//!
//! Every failure is surfaced to the immediate caller; nothing in this crate
//! retries or recovers locally.

use camino::Utf8PathBuf;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid or missing launch configuration. Raised before any process starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {0} toolchain folder path")]
    ToolchainNotFound(Utf8PathBuf),

    #[error("Invalid {0} project path")]
    ProjectNotFound(Utf8PathBuf),

    #[error("Launch configuration is missing `{0}`")]
    MissingField(&'static str),

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Failed to determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("Failed to load launch profile: {0}")]
    Profile(String),

    #[error("Failed to write launch profile {path}")]
    ProfileWrite {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Profile(err.to_string())
    }
}

/// Malformed descriptor content.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Failed to read {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{source}")]
    File {
        path: Utf8PathBuf,
        #[source]
        source: Box<ParseError>,
    },

    #[error("{path}: {message}")]
    Descriptor { path: Utf8PathBuf, message: String },
}

/// Engine process failures.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Engine executable not found: {0}")]
    ExecutableNotFound(Utf8PathBuf),

    #[error("Failed to start {executable}")]
    Spawn {
        executable: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for {executable}")]
    Wait {
        executable: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to kill {executable}")]
    Kill {
        executable: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Engine compile failed with exit code {}", .code.map_or_else(|| "<signal>".to_string(), |c| c.to_string()))]
    CompileFailed { code: Option<i32> },
}

/// Anything `Launcher` can fail with.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Process(#[from] ProcessError),
}
