use crate::error::ParseError;
use crate::services::paths::{last_segment, lexical_join};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde_json::Value;

/// Extension type holding resource directory declarations.
pub const RESOURCES_EXTENSION: &str = "resources";

/// A plugin descriptor file found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginDescriptor {
    /// Path of the descriptor file itself.
    pub path: Utf8PathBuf,

    /// Directory containing the descriptor.
    pub dir: Utf8PathBuf,

    pub name: Option<String>,
    pub version: Option<String>,

    /// Extension type name to the extension records declared under it.
    pub extensions: IndexMap<String, Vec<Value>>,
}

/// A named resource directory declared by a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceExtension {
    /// Alias the engine resolves resources under (last segment of the declared path).
    pub name: String,

    /// Directory of the plugin that declared the resource.
    pub dir: Utf8PathBuf,

    /// Declared path joined onto the plugin directory.
    pub path: Utf8PathBuf,
}

impl PluginDescriptor {
    /// Build a descriptor from a parsed document located at `path`.
    pub fn from_value(path: &Utf8Path, value: Value) -> Result<Self, ParseError> {
        let Value::Object(mut root) = value else {
            return Err(descriptor_error(path, "document root is not an object"));
        };

        let mut extensions = IndexMap::new();
        match root.remove("extensions") {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                for (kind, records) in map {
                    let records = match records {
                        Value::Array(items) => items,
                        Value::Null => Vec::new(),
                        single => vec![single],
                    };
                    extensions.insert(kind, records);
                }
            }
            Some(_) => return Err(descriptor_error(path, "`extensions` is not an object")),
        }

        let dir = path
            .parent()
            .map(Utf8Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            dir,
            name: string_field(&root, "name"),
            version: string_field(&root, "version"),
            extensions,
        })
    }

    /// Extension records of the given type, empty if the type is not declared.
    pub fn extensions_of(&self, kind: &str) -> &[Value] {
        self.extensions.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resource maps declared under the `resources` extension.
    pub fn resources(&self) -> Result<Vec<ResourceExtension>, ParseError> {
        self.extensions_of(RESOURCES_EXTENSION)
            .iter()
            .map(|record| {
                let declared = record
                    .get("path")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        descriptor_error(&self.path, "resource entry has no string `path`")
                    })?;
                Ok(ResourceExtension {
                    name: last_segment(declared).to_string(),
                    dir: self.dir.clone(),
                    path: lexical_join(&self.dir, declared),
                })
            })
            .collect()
    }
}

fn string_field(root: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    root.get(key).and_then(Value::as_str).map(str::to_string)
}

fn descriptor_error(path: &Utf8Path, message: &str) -> ParseError {
    ParseError::Descriptor {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: Value) -> PluginDescriptor {
        PluginDescriptor::from_value(Utf8Path::new("/plugins/fx/fx.stingray_plugin"), value)
            .unwrap()
    }

    #[test]
    fn test_attaches_path_and_dir() {
        let plugin = descriptor(json!({"name": "fx", "version": "1.2.0"}));
        assert_eq!(plugin.path, Utf8PathBuf::from("/plugins/fx/fx.stingray_plugin"));
        assert_eq!(plugin.dir, Utf8PathBuf::from("/plugins/fx"));
        assert_eq!(plugin.name.as_deref(), Some("fx"));
        assert_eq!(plugin.version.as_deref(), Some("1.2.0"));
        assert!(plugin.extensions.is_empty());
    }

    #[test]
    fn test_resources_use_last_segment_and_plugin_dir() {
        let plugin = descriptor(json!({
            "extensions": {"resources": [{"path": "assets/foo"}, {"path": "bar/"}]}
        }));
        let resources = plugin.resources().unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].name, "foo");
        assert_eq!(resources[0].dir, Utf8PathBuf::from("/plugins/fx"));
        assert_eq!(resources[0].path, Utf8PathBuf::from("/plugins/fx/assets/foo"));
        assert_eq!(resources[1].name, "bar");
    }

    #[test]
    fn test_rooted_resource_path_is_joined_onto_plugin_dir() {
        let plugin = descriptor(json!({"extensions": {"resources": [{"path": "/assets/foo"}]}}));
        let resources = plugin.resources().unwrap();
        assert_eq!(resources[0].name, "foo");
        assert_eq!(resources[0].path, Utf8PathBuf::from("/plugins/fx/assets/foo"));
    }

    #[test]
    fn test_single_object_extension_is_one_record() {
        let plugin = descriptor(json!({"extensions": {"resources": {"path": "core_res"}}}));
        assert_eq!(plugin.extensions_of("resources").len(), 1);
        assert_eq!(plugin.resources().unwrap()[0].name, "core_res");
    }

    #[test]
    fn test_other_extension_types_are_kept_in_order() {
        let plugin = descriptor(json!({
            "extensions": {"views": [{"type": "panel"}], "actions": [], "resources": []}
        }));
        let kinds: Vec<_> = plugin.extensions.keys().cloned().collect();
        assert_eq!(kinds, vec!["views", "actions", "resources"]);
        assert!(plugin.resources().unwrap().is_empty());
    }

    #[test]
    fn test_resource_without_path_is_error() {
        let plugin = descriptor(json!({"extensions": {"resources": [{"dir": "x"}]}}));
        assert!(matches!(
            plugin.resources(),
            Err(ParseError::Descriptor { .. })
        ));
    }

    #[test]
    fn test_non_object_root_is_error() {
        let result = PluginDescriptor::from_value(Utf8Path::new("p"), json!([1, 2]));
        assert!(matches!(result, Err(ParseError::Descriptor { .. })));
    }
}
