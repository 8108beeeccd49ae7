//! Data models for the launcher.
//!
//! - [`LaunchConfiguration`]: user-supplied record naming the toolchain, engine
//!   executable, project descriptor, extra plugin roots and passthrough arguments
//! - [`ProjectDescriptor`]: the `data_directory` / `source_directory` keys of a project file
//! - [`PluginDescriptor`]: one discovered plugin descriptor file and its extensions
//! - [`ResourceExtension`]: a named resource directory contributed by a plugin
//!
//! These types carry no behaviour beyond shape conversion; discovery and
//! launching live in [`crate::services`].

pub mod launch;
pub mod plugin;
pub mod project;

pub use launch::{DEFAULT_ENGINE_EXE, LaunchConfiguration};
pub use plugin::{PluginDescriptor, RESOURCES_EXTENSION, ResourceExtension};
pub use project::ProjectDescriptor;
