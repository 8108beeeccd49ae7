//! Services module - discovery and launching.
//!
//! - [`sjson`]: relaxed JSON reader for project and plugin descriptors
//! - [`paths`]: separator normalization and lexical path joins
//! - [`plugin_scanner`]: finds plugin descriptors and the resource maps they declare
//! - [`engine_process`]: the [`ProcessSpawner`] capability and the tokio implementation
//! - [`launcher`]: derives project directories and starts the engine
//!
//! # Launch flow
//!
//! 1. [`Launcher::new`] validates the configuration and resolves directories
//! 2. [`Launcher::start`] with `compile = true` scans plugin roots for resource
//!    maps and runs the engine with `--compile`, waiting for it to exit
//! 3. The engine is started in run mode and its handle returned immediately

pub mod engine_process;
pub mod launcher;
pub mod paths;
pub mod plugin_scanner;
pub mod sjson;

pub use engine_process::{
    COMPILE_SERVER_PORT, DEFAULT_ENGINE_CONSOLE_PORT, EngineProcess, ProcessSpawner, SpawnRequest,
    TokioSpawner,
};
pub use launcher::{DATA_PLATFORM, Launcher, ProjectPaths};
pub use plugin_scanner::{PLUGIN_DESCRIPTOR_SUFFIX, discover_plugins, discover_resource_maps};
