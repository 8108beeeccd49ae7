//! End-to-end launch against a stand-in engine executable.
//!
//! The engine is a shell script that appends its arguments to a log file next
//! to itself. Everything runs in a single test so no other test thread forks
//! while the script is being written.

#![cfg(unix)]

use camino::{Utf8Path, Utf8PathBuf};
use engine_launcher::error::{LaunchError, ProcessError};
use engine_launcher::{LaunchConfiguration, Launcher};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

const ENGINE_NAME: &str = "fake_engine";

/// Toolchain + project, with an engine script that exits with
/// `compile_exit_code` when called with `--compile` and 0 otherwise.
fn create_toolchain(compile_exit_code: i32) -> (TempDir, Utf8PathBuf, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

    let bin_dir = root.join("tc/engine/win64/dev");
    fs::create_dir_all(&bin_dir).unwrap();
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> \"$(dirname \"$0\")/invocations.log\"\n\
         if [ \"$1\" = \"--compile\" ]; then exit {compile_exit_code}; fi\nexit 0\n"
    );
    let engine = bin_dir.join(ENGINE_NAME);
    fs::write(&engine, script).unwrap();
    fs::set_permissions(&engine, fs::Permissions::from_mode(0o755)).unwrap();

    fs::create_dir_all(root.join("game")).unwrap();
    let project = root.join("game/settings.stingray_project");
    fs::write(&project, "source_directory = \"src\"\n").unwrap();

    (temp_dir, root.join("tc"), project)
}

fn invocations(toolchain: &Utf8Path) -> Vec<String> {
    fs::read_to_string(toolchain.join("engine/win64/dev/invocations.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_launch_with_stand_in_engine() {
    // Compile then run.
    let (_temp_dir, toolchain, project) = create_toolchain(0);
    let config = LaunchConfiguration::new(&toolchain, &project)
        .with_engine_exe(ENGINE_NAME)
        .with_command_line_args(["--extra"]);
    let launcher = Launcher::new(config).unwrap();

    let mut engine = launcher.start(true).await.unwrap();
    assert_eq!(engine.console_port(), Some(14000));
    assert!(engine.wait().await.unwrap().success());

    let calls = invocations(&toolchain);
    assert_eq!(calls.len(), 2);
    assert!(calls[0].starts_with("--compile --source-dir"));
    assert!(calls[0].contains("--port 14999"));
    assert!(calls[1].starts_with("--source-dir"));
    assert!(calls[1].ends_with("--wait-for-debugger --extra"));

    // A failing compile never starts the run process.
    let (_temp_dir, toolchain, project) = create_toolchain(7);
    let config = LaunchConfiguration::new(&toolchain, &project).with_engine_exe(ENGINE_NAME);
    let launcher = Launcher::new(config).unwrap();

    match launcher.start(true).await {
        Err(LaunchError::Process(ProcessError::CompileFailed { code })) => {
            assert_eq!(code, Some(7))
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(invocations(&toolchain).len(), 1);

    // Missing executable.
    let config = LaunchConfiguration::new(&toolchain, &project).with_engine_exe("absent");
    let launcher = Launcher::new(config).unwrap();
    assert!(matches!(
        launcher.start(false).await,
        Err(LaunchError::Process(ProcessError::ExecutableNotFound(_)))
    ));
}
