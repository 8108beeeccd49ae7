use crate::error::ConfigError;
use crate::models::LaunchConfiguration;
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;

/// Prefix for environment overrides, e.g. `ENGINE_LAUNCHER_TOOLCHAIN_PATH`.
pub const ENV_PREFIX: &str = "ENGINE_LAUNCHER";

/// A partial launch configuration, as stored in a YAML profile or given on
/// the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolchain_path: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_exe: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_plugins: Vec<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command_line_args: Vec<String>,
}

impl LaunchProfile {
    /// Layer `overrides` on top of `self`. Scalars are replaced when set;
    /// lists are replaced when non-empty.
    pub fn merge(self, overrides: LaunchProfile) -> LaunchProfile {
        LaunchProfile {
            toolchain_path: overrides.toolchain_path.or(self.toolchain_path),
            engine_exe: overrides.engine_exe.or(self.engine_exe),
            project_path: overrides.project_path.or(self.project_path),
            additional_plugins: if overrides.additional_plugins.is_empty() {
                self.additional_plugins
            } else {
                overrides.additional_plugins
            },
            command_line_args: if overrides.command_line_args.is_empty() {
                self.command_line_args
            } else {
                overrides.command_line_args
            },
        }
    }

    /// Turn the profile into a full configuration. Toolchain and project are
    /// required; everything else has defaults.
    pub fn into_configuration(self) -> Result<LaunchConfiguration, ConfigError> {
        let toolchain_path = self
            .toolchain_path
            .ok_or(ConfigError::MissingField("toolchain_path"))?;
        let project_path = self
            .project_path
            .ok_or(ConfigError::MissingField("project_path"))?;

        let mut config = LaunchConfiguration::new(toolchain_path, project_path)
            .with_additional_plugins(self.additional_plugins)
            .with_command_line_args(self.command_line_args);
        if let Some(engine_exe) = self.engine_exe {
            config = config.with_engine_exe(engine_exe);
        }
        Ok(config)
    }
}

impl From<LaunchConfiguration> for LaunchProfile {
    fn from(config: LaunchConfiguration) -> Self {
        Self {
            toolchain_path: Some(config.toolchain_path),
            engine_exe: Some(config.engine_exe),
            project_path: Some(config.project_path),
            additional_plugins: config.additional_plugins,
            command_line_args: config.command_line_args,
        }
    }
}

/// Loads and saves launch profiles.
///
/// Loading layers, lowest first:
/// - the YAML profile file, when one is given
/// - `ENGINE_LAUNCHER_*` environment variables (lists are comma separated)
#[derive(Debug, Clone)]
pub struct ProfileManager {
    env_prefix: String,
    env_source: Option<config::Map<String, String>>,
}

impl ProfileManager {
    pub fn new() -> Self {
        Self {
            env_prefix: ENV_PREFIX.to_string(),
            env_source: None,
        }
    }

    /// Read environment overrides from `vars` instead of the process environment.
    pub fn with_env_source(mut self, vars: config::Map<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Load a profile. A given `path` must exist.
    pub fn load(&self, path: Option<&Utf8Path>) -> Result<LaunchProfile, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::Profile(format!(
                    "profile file not found: {}",
                    path
                )));
            }
            builder = builder.add_source(
                File::from(path.as_std_path())
                    .format(FileFormat::Yaml)
                    .required(true),
            );
        }

        let environment = Environment::with_prefix(&self.env_prefix)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("additional_plugins")
            .with_list_parse_key("command_line_args")
            .source(self.env_source.clone());
        builder = builder.add_source(environment);

        let profile: LaunchProfile = builder.build()?.try_deserialize()?;

        match path {
            Some(path) => tracing::info!("Loaded launch profile from {}", path),
            None => tracing::debug!("Loaded launch profile from environment only"),
        }
        Ok(profile)
    }

    /// Write `profile` as YAML, creating parent directories as needed.
    pub fn save(&self, path: &Utf8Path, profile: &LaunchProfile) -> Result<(), ConfigError> {
        let yaml_string = serde_yaml_ng::to_string(profile)
            .map_err(|e| ConfigError::Profile(format!("failed to serialize profile: {e}")))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::ProfileWrite {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, yaml_string).map_err(|source| ConfigError::ProfileWrite {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Saved launch profile to {}", path);
        Ok(())
    }
}

impl Default for ProfileManager {
    fn default() -> Self {
        Self::new()
    }
}
