//! Engine Launcher - command line entry point.
//!
//! # Overview
//!
//! Resolves a project's source and data directories from its project
//! descriptor, optionally runs an asset compile pass, and starts the engine
//! executable from a toolchain. It initializes:
//! - Logging (console, plus rotating files with `--log-dir`)
//! - A tokio runtime for subprocess execution
//! - The launch configuration from a YAML profile, `ENGINE_LAUNCHER_*`
//!   variables and command line flags (flags win)
//!
//! # Commands
//!
//! - `launch`: start the engine (add `--compile` to compile first, `--wait` to
//!   block until the engine exits and return its exit code)
//! - `paths`: print the resolved source, data and core directories
//! - `plugins <ROOT>`: list plugin descriptors under a directory
//! - `resources <ROOT>...`: list resource maps declared under directories
//! - `save-profile <FILE>`: write the merged configuration as a profile

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use engine_launcher::services::{discover_plugins, discover_resource_maps};
use engine_launcher::{APP_NAME, LaunchConfiguration, LaunchProfile, Launcher, ProfileManager, VERSION};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "engine-launcher", version, about = "Launch the engine for a project")]
struct Cli {
    /// Also write daily rotating log files to this directory
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<Utf8PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the engine for a project
    Launch {
        #[command(flatten)]
        target: TargetArgs,

        /// Run an asset compile pass first
        #[arg(long)]
        compile: bool,

        /// Wait for the engine to exit and return its exit code
        #[arg(long)]
        wait: bool,
    },

    /// Print the directories derived from the project descriptor
    Paths {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// List plugin descriptors found under a directory
    Plugins {
        #[arg(value_name = "ROOT")]
        root: Utf8PathBuf,
    },

    /// List resource maps declared by plugins under one or more directories
    Resources {
        #[arg(value_name = "ROOT", required = true)]
        roots: Vec<Utf8PathBuf>,
    },

    /// Write the merged launch configuration to a YAML profile
    SaveProfile {
        #[arg(value_name = "FILE")]
        output: Utf8PathBuf,

        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct TargetArgs {
    /// YAML launch profile to start from
    #[arg(long, value_name = "FILE")]
    profile: Option<Utf8PathBuf>,

    /// Toolchain root directory
    #[arg(long = "toolchain", value_name = "DIR")]
    toolchain_path: Option<Utf8PathBuf>,

    /// Project descriptor file
    #[arg(long = "project", value_name = "FILE")]
    project_path: Option<Utf8PathBuf>,

    /// Engine executable name inside the toolchain
    #[arg(long, value_name = "NAME")]
    engine_exe: Option<String>,

    /// Additional plugin root scanned for resource maps (repeatable)
    #[arg(long = "plugin-dir", value_name = "DIR")]
    additional_plugins: Vec<Utf8PathBuf>,

    /// Extra arguments passed to the engine in run mode
    #[arg(last = true, value_name = "ARGS")]
    command_line_args: Vec<String>,
}

impl TargetArgs {
    /// Profile file + environment, overridden by flags.
    fn profile(&self) -> Result<LaunchProfile> {
        let base = ProfileManager::new()
            .load(self.profile.as_deref())
            .context("Failed to load launch profile")?;
        let overrides = LaunchProfile {
            toolchain_path: self.toolchain_path.clone(),
            engine_exe: self.engine_exe.clone(),
            project_path: self.project_path.clone(),
            additional_plugins: self.additional_plugins.clone(),
            command_line_args: self.command_line_args.clone(),
        };
        Ok(base.merge(overrides))
    }

    fn configuration(&self) -> Result<LaunchConfiguration> {
        Ok(self.profile()?.into_configuration()?)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _guard = engine_launcher::logging::setup_logging(cli.log_dir.as_deref(), APP_NAME, cli.debug)?;

    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);

    match cli.command {
        Command::Launch {
            target,
            compile,
            wait,
        } => launch(&target, compile, wait),
        Command::Paths { target } => {
            let launcher = Launcher::new(target.configuration()?)?;
            println!("source: {}", launcher.source_dir());
            println!("data:   {}", launcher.data_dir());
            println!("core:   {}", launcher.core_root_dir());
            println!("engine: {}", launcher.engine_executable());
            Ok(ExitCode::SUCCESS)
        }
        Command::Plugins { root } => {
            for plugin in discover_plugins(&root)? {
                let kinds: Vec<_> = plugin.extensions.keys().map(String::as_str).collect();
                println!(
                    "{} {} ({}) [{}]",
                    plugin.name.as_deref().unwrap_or("<unnamed>"),
                    plugin.version.as_deref().unwrap_or("-"),
                    plugin.path,
                    kinds.join(", ")
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Resources { roots } => {
            for map in discover_resource_maps(&roots)? {
                println!("{} -> {} ({})", map.name, map.dir, map.path);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::SaveProfile { output, target } => {
            let profile = target.profile()?;
            ProfileManager::new().save(&output, &profile)?;
            println!("Saved profile to {}", output);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn launch(target: &TargetArgs, compile: bool, wait: bool) -> Result<ExitCode> {
    let launcher = Launcher::new(target.configuration()?)?;

    // Engine processes are driven from a small runtime; the launcher itself
    // never runs two processes at once.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("launcher-worker")
        .build()?;

    runtime.block_on(async {
        let mut engine = launcher
            .start(compile)
            .await
            .context("Failed to start the engine")?;

        tracing::info!(
            "Engine running: pid={:?}, console={:?}",
            engine.pid(),
            engine.console_address()
        );

        if !wait {
            return Ok(ExitCode::SUCCESS);
        }

        let status = engine.wait().await?;
        let code = status.code().unwrap_or(1);
        Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
    })
}
