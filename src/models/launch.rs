use crate::error::ConfigError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Engine executable used when the configuration does not name one.
pub const DEFAULT_ENGINE_EXE: &str = "interactive_win64_dev.exe";

/// Everything needed to launch the engine for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfiguration {
    /// Root directory holding the engine binaries and the core sources.
    pub toolchain_path: Utf8PathBuf,

    #[serde(default = "default_engine_exe")]
    pub engine_exe: String,

    /// Path of the project descriptor file.
    pub project_path: Utf8PathBuf,

    /// Extra plugin trees scanned for resource maps before the toolchain.
    #[serde(default)]
    pub additional_plugins: Vec<Utf8PathBuf>,

    /// Appended verbatim to the run-mode command line.
    #[serde(default)]
    pub command_line_args: Vec<String>,
}

fn default_engine_exe() -> String {
    DEFAULT_ENGINE_EXE.to_string()
}

impl LaunchConfiguration {
    pub fn new(toolchain_path: impl Into<Utf8PathBuf>, project_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            toolchain_path: toolchain_path.into(),
            engine_exe: default_engine_exe(),
            project_path: project_path.into(),
            additional_plugins: Vec::new(),
            command_line_args: Vec::new(),
        }
    }

    /// Set the engine executable name. An empty name keeps the default.
    pub fn with_engine_exe(mut self, engine_exe: impl Into<String>) -> Self {
        let engine_exe = engine_exe.into();
        self.engine_exe = if engine_exe.is_empty() {
            default_engine_exe()
        } else {
            engine_exe
        };
        self
    }

    /// Engine executable name, falling back to [`DEFAULT_ENGINE_EXE`] when empty.
    pub fn engine_exe(&self) -> &str {
        if self.engine_exe.is_empty() {
            DEFAULT_ENGINE_EXE
        } else {
            &self.engine_exe
        }
    }

    pub fn with_additional_plugins<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        self.additional_plugins = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_command_line_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command_line_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Check that the toolchain and project paths exist, in that order.
    ///
    /// Nothing is read from either path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.toolchain_path.exists() {
            return Err(ConfigError::ToolchainNotFound(self.toolchain_path.clone()));
        }
        if !self.project_path.exists() {
            return Err(ConfigError::ProjectNotFound(self.project_path.clone()));
        }
        Ok(())
    }

    pub fn toolchain_path(&self) -> &Utf8Path {
        &self.toolchain_path
    }

    pub fn project_path(&self) -> &Utf8Path {
        &self.project_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = LaunchConfiguration::new("tc", "game/settings.stingray_project");
        assert_eq!(config.engine_exe, DEFAULT_ENGINE_EXE);
        assert!(config.additional_plugins.is_empty());
        assert!(config.command_line_args.is_empty());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: LaunchConfiguration =
            serde_json::from_str(r#"{"toolchain_path": "tc", "project_path": "p.stingray_project"}"#)
                .unwrap();
        assert_eq!(config.engine_exe, DEFAULT_ENGINE_EXE);
        assert_eq!(config.toolchain_path, Utf8PathBuf::from("tc"));
    }

    #[test]
    fn test_empty_engine_exe_falls_back_to_default() {
        let config = LaunchConfiguration::new("tc", "p").with_engine_exe("");
        assert_eq!(config.engine_exe, DEFAULT_ENGINE_EXE);

        let config: LaunchConfiguration = serde_json::from_str(
            r#"{"toolchain_path": "tc", "project_path": "p", "engine_exe": ""}"#,
        )
        .unwrap();
        assert_eq!(config.engine_exe(), DEFAULT_ENGINE_EXE);
    }

    #[test]
    fn test_validate_reports_toolchain_first() {
        let config = LaunchConfiguration::new("/definitely/missing/tc", "/definitely/missing/p");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ToolchainNotFound(_))
        ));
    }

    #[test]
    fn test_validate_reports_missing_project() {
        let temp_dir = TempDir::new().unwrap();
        let tc = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let config = LaunchConfiguration::new(tc.clone(), tc.join("missing.stingray_project"));
        match config.validate() {
            Err(ConfigError::ProjectNotFound(path)) => {
                assert_eq!(path, tc.join("missing.stingray_project"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
