//! Plugin descriptor discovery.
//!
//! A plugin is any directory holding a `*.stingray_plugin` descriptor. The
//! descriptor may declare `resources` extensions, each naming a directory the
//! engine should be able to resolve under an alias:
//!
//! ```text
//! extensions = {
//!     resources = [ { path = "assets/foo" } ]
//! }
//! ```
//!
//! yields a resource map `foo` owned by the plugin's directory.

use crate::error::ParseError;
use crate::models::{PluginDescriptor, ResourceExtension};
use crate::services::sjson;
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Suffix identifying plugin descriptor files.
pub const PLUGIN_DESCRIPTOR_SUFFIX: &str = ".stingray_plugin";

/// Recursively find and parse every plugin descriptor under `root`.
///
/// A missing root yields no plugins. The first malformed descriptor aborts the
/// scan with a [`ParseError`].
pub fn discover_plugins(root: &Utf8Path) -> Result<Vec<PluginDescriptor>, ParseError> {
    if !root.exists() {
        tracing::warn!("Plugin root {} does not exist, skipping", root);
        return Ok(Vec::new());
    }

    let mut plugins = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!("Skipping entry while scanning {}: {}", root, err);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_plugin_descriptor(entry.file_name()) {
            continue;
        }

        let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => path,
            Err(path) => {
                tracing::warn!("Skipping non UTF-8 descriptor path {}", path.display());
                continue;
            }
        };

        let value = sjson::parse_file(&path)?;
        let plugin = PluginDescriptor::from_value(&path, value)?;
        tracing::debug!(
            "Found plugin {} at {}",
            plugin.name.as_deref().unwrap_or("<unnamed>"),
            plugin.path
        );
        plugins.push(plugin);
    }

    tracing::debug!("Discovered {} plugins under {}", plugins.len(), root);
    Ok(plugins)
}

/// Collect the resource maps declared by plugins under each root, in root order.
///
/// Duplicate names across roots are all kept; a single root is a one-element
/// list.
pub fn discover_resource_maps<I, P>(roots: I) -> Result<Vec<ResourceExtension>, ParseError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Utf8Path>,
{
    let mut resources = Vec::new();
    for root in roots {
        for plugin in discover_plugins(root.as_ref())? {
            resources.extend(plugin.resources()?);
        }
    }
    Ok(resources)
}

fn is_plugin_descriptor(file_name: &std::ffi::OsStr) -> bool {
    file_name
        .to_str()
        .is_some_and(|name| name.ends_with(PLUGIN_DESCRIPTOR_SUFFIX))
}
