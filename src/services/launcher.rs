//! Project path resolution and engine launching.
//!
//! A [`Launcher`] is built once from a [`LaunchConfiguration`]: it reads the
//! project descriptor, derives the source, data and core directories and
//! keeps them for the rest of its life. [`Launcher::start`] then optionally
//! runs an asset compile pass and starts the engine in run mode.
//!
//! Directory layout assumed for a project at `games/hero/settings.stingray_project`
//! that declares nothing:
//!
//! ```text
//! games/hero/              source directory
//! games/hero_data/win32/   data directory
//! ```

use crate::error::{ConfigError, LaunchError};
use crate::models::{LaunchConfiguration, ProjectDescriptor, ResourceExtension};
use crate::services::engine_process::{
    COMPILE_SERVER_PORT, DEFAULT_ENGINE_CONSOLE_PORT, EngineProcess, ProcessSpawner, SpawnRequest,
    TokioSpawner,
};
use crate::services::paths::{absolutize, lexical_join, normalize_path};
use crate::services::plugin_scanner::discover_resource_maps;
use crate::services::sjson;
use camino::{Utf8Path, Utf8PathBuf};

/// Platform segment appended to the data directory.
pub const DATA_PLATFORM: &str = "win32";

/// Location of engine binaries below the toolchain root.
pub const ENGINE_SUBPATH: [&str; 3] = ["engine", "win64", "dev"];

/// Alias the toolchain root is mapped under.
pub const CORE_MAP_NAME: &str = "core";

/// Directories derived from a project descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub source_dir: Utf8PathBuf,
    pub data_dir: Utf8PathBuf,
    pub core_root_dir: Utf8PathBuf,
}

impl ProjectPaths {
    /// Derive directories for the project descriptor at `project_path`
    /// (absolute) using the already parsed `descriptor`.
    pub fn resolve(
        project_path: &Utf8Path,
        descriptor: &ProjectDescriptor,
        toolchain_path: &Utf8Path,
    ) -> Result<Self, ConfigError> {
        let project_dir = project_path.parent().unwrap_or(project_path);

        let data_dir = match descriptor.data_directory.as_deref() {
            Some(declared) if Utf8Path::new(declared).exists() => {
                absolutize(Utf8Path::new(declared))?
            }
            Some(declared) => lexical_join(project_dir, declared),
            None => {
                let folder = project_dir.file_name().unwrap_or_default();
                lexical_join(project_dir, &format!("../{folder}_data"))
            }
        };
        let data_dir = data_dir.join(DATA_PLATFORM);

        let source_dir = match descriptor.source_directory.as_deref() {
            Some(declared) => lexical_join(project_dir, declared),
            None => project_dir.to_path_buf(),
        };

        Ok(Self {
            source_dir: normalize_path(&source_dir),
            data_dir: normalize_path(&data_dir),
            core_root_dir: normalize_path(toolchain_path),
        })
    }
}

/// Immutable launch plan for one project.
#[derive(Debug, Clone)]
pub struct Launcher {
    toolchain_path: Utf8PathBuf,
    engine_exe: String,
    paths: ProjectPaths,
    additional_plugins: Vec<Utf8PathBuf>,
    additional_command_line_args: Vec<String>,
}

impl Launcher {
    /// Validate `config`, read the project descriptor and derive all paths.
    ///
    /// The toolchain and project paths are checked before the descriptor is
    /// read.
    pub fn new(config: LaunchConfiguration) -> Result<Self, LaunchError> {
        config.validate()?;

        let project_path = absolutize(&config.project_path)?;
        let document = sjson::parse_file(&project_path)?;
        let descriptor = ProjectDescriptor::from_value(&project_path, document)?;
        let paths = ProjectPaths::resolve(&project_path, &descriptor, &config.toolchain_path)?;

        tracing::info!(
            "Resolved project {}: source={}, data={}, core={}",
            project_path,
            paths.source_dir,
            paths.data_dir,
            paths.core_root_dir
        );

        Ok(Self {
            engine_exe: config.engine_exe().to_string(),
            toolchain_path: config.toolchain_path,
            paths,
            additional_plugins: config.additional_plugins,
            additional_command_line_args: config.command_line_args,
        })
    }

    pub fn source_dir(&self) -> &Utf8Path {
        &self.paths.source_dir
    }

    pub fn data_dir(&self) -> &Utf8Path {
        &self.paths.data_dir
    }

    pub fn core_root_dir(&self) -> &Utf8Path {
        &self.paths.core_root_dir
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    pub fn additional_plugins(&self) -> &[Utf8PathBuf] {
        &self.additional_plugins
    }

    pub fn additional_command_line_args(&self) -> &[String] {
        &self.additional_command_line_args
    }

    /// Full path of the engine executable inside the toolchain.
    pub fn engine_executable(&self) -> Utf8PathBuf {
        let mut exe = self.toolchain_path.clone();
        exe.extend(ENGINE_SUBPATH);
        exe.push(&self.engine_exe);
        exe
    }

    /// Plugin roots scanned for resource maps: extra roots first, toolchain last.
    pub fn plugin_roots(&self) -> Vec<&Utf8Path> {
        self.additional_plugins
            .iter()
            .map(Utf8PathBuf::as_path)
            .chain(std::iter::once(self.toolchain_path.as_path()))
            .collect()
    }

    fn common_args(&self) -> Vec<String> {
        vec![
            "--source-dir".to_string(),
            self.paths.source_dir.to_string(),
            "--map-source-dir".to_string(),
            CORE_MAP_NAME.to_string(),
            self.paths.core_root_dir.to_string(),
            "--data-dir".to_string(),
            self.paths.data_dir.to_string(),
        ]
    }

    /// Arguments for the asset compile pass.
    pub fn compile_args(&self, resource_maps: &[ResourceExtension]) -> Vec<String> {
        let mut args = vec!["--compile".to_string()];
        args.extend(self.common_args());
        args.push("--port".to_string());
        args.push(COMPILE_SERVER_PORT.to_string());
        for map in resource_maps {
            args.push("--map-source-dir".to_string());
            args.push(map.name.clone());
            args.push(map.dir.to_string());
        }
        args
    }

    /// Arguments for the interactive run, user arguments last.
    pub fn run_args(&self) -> Vec<String> {
        let mut args = self.common_args();
        args.push("--wait-for-debugger".to_string());
        args.extend(self.additional_command_line_args.iter().cloned());
        args
    }

    /// Start the engine, compiling first when `compile` is set.
    ///
    /// Returns as soon as the run process is spawned. No console connection is
    /// opened here: the engine starts with `--wait-for-debugger` and may not be
    /// listening yet. Use [`EngineProcess::connect_console`] once it is.
    pub async fn start(&self, compile: bool) -> Result<EngineProcess, LaunchError> {
        self.start_with(&TokioSpawner, compile).await
    }

    /// [`Launcher::start`] with a caller-provided spawner.
    ///
    /// The compile pass, when requested, is awaited to exit before the run
    /// process is spawned; a failed compile skips the run. The run process is
    /// not awaited, and the handle is returned without touching its console.
    pub async fn start_with<S: ProcessSpawner>(
        &self,
        spawner: &S,
        compile: bool,
    ) -> Result<S::Handle, LaunchError> {
        let executable = self.engine_executable();

        if compile {
            let resource_maps = discover_resource_maps(self.plugin_roots())?;
            tracing::info!(
                "Compiling {} with {} resource maps",
                self.paths.source_dir,
                resource_maps.len()
            );
            let request = SpawnRequest::new(executable.clone(), self.compile_args(&resource_maps));
            spawner.run_to_completion(&request).await?;
        }

        let request = SpawnRequest::new(executable, self.run_args())
            .with_console_port(DEFAULT_ENGINE_CONSOLE_PORT);
        Ok(spawner.spawn(&request)?)
    }
}
