// Engine Launcher - resolve a game project's directories and start the engine.
//
// This is the library crate containing path resolution, plugin discovery and
// process orchestration. The binary crate (main.rs) provides the CLI.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use crate::config::{LaunchProfile, ProfileManager};
pub use error::{ConfigError, LaunchError, ParseError, ProcessError};
pub use models::{LaunchConfiguration, PluginDescriptor, ProjectDescriptor, ResourceExtension};
pub use services::{EngineProcess, Launcher};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
