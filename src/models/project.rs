use crate::error::ParseError;
use camino::Utf8Path;
use serde::Deserialize;
use serde_json::Value;

/// The parts of a project descriptor the launcher cares about.
///
/// Other keys in the document are ignored. Empty strings count as undeclared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectDescriptor {
    #[serde(default)]
    pub data_directory: Option<String>,

    #[serde(default)]
    pub source_directory: Option<String>,
}

impl ProjectDescriptor {
    /// Build from a parsed document. `path` is only used for error messages.
    pub fn from_value(path: &Utf8Path, value: Value) -> Result<Self, ParseError> {
        let mut descriptor: ProjectDescriptor =
            serde_json::from_value(value).map_err(|e| ParseError::Descriptor {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        descriptor.data_directory = descriptor.data_directory.filter(|d| !d.is_empty());
        descriptor.source_directory = descriptor.source_directory.filter(|d| !d.is_empty());
        Ok(descriptor)
    }
}
