//! Integration tests for launch profiles
//!
//! These tests verify:
//! - Loading YAML profiles through ProfileManager
//! - Environment overrides layered over the file
//! - Merging command line values and converting to LaunchConfiguration

use camino::Utf8PathBuf;
use engine_launcher::models::DEFAULT_ENGINE_EXE;
use engine_launcher::{ConfigError, LaunchProfile, ProfileManager};
use std::fs;
use tempfile::TempDir;

fn create_test_profile(content: &str) -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().join("launch.yaml")).unwrap();
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

fn env(pairs: &[(&str, &str)]) -> config::Map<String, String> {
    let mut vars = config::Map::new();
    for (key, value) in pairs {
        vars.insert(key.to_string(), value.to_string());
    }
    vars
}

#[test]
fn test_load_profile_from_yaml() {
    let (_temp_dir, path) = create_test_profile(
        r#"
toolchain_path: "C:/Toolchains/2024"
project_path: "C:/Games/hero/settings.stingray_project"
engine_exe: "custom_engine.exe"
additional_plugins:
  - "C:/Plugins/shared"
command_line_args:
  - "--lua-debug"
"#,
    );

    let profile = ProfileManager::new()
        .with_env_source(env(&[]))
        .load(Some(&path))
        .unwrap();

    assert_eq!(profile.toolchain_path, Some("C:/Toolchains/2024".into()));
    assert_eq!(profile.engine_exe.as_deref(), Some("custom_engine.exe"));
    assert_eq!(profile.additional_plugins, vec![Utf8PathBuf::from("C:/Plugins/shared")]);
    assert_eq!(profile.command_line_args, vec!["--lua-debug".to_string()]);
}

#[test]
fn test_environment_overrides_file() {
    let (_temp_dir, path) = create_test_profile(
        "toolchain_path: \"from-file\"\nproject_path: \"p.stingray_project\"\n",
    );

    let profile = ProfileManager::new()
        .with_env_source(env(&[
            ("ENGINE_LAUNCHER_TOOLCHAIN_PATH", "from-env"),
            ("ENGINE_LAUNCHER_ADDITIONAL_PLUGINS", "a,b"),
        ]))
        .load(Some(&path))
        .unwrap();

    assert_eq!(profile.toolchain_path, Some("from-env".into()));
    assert_eq!(profile.project_path, Some("p.stingray_project".into()));
    assert_eq!(
        profile.additional_plugins,
        vec![Utf8PathBuf::from("a"), Utf8PathBuf::from("b")]
    );
}

#[test]
fn test_environment_only_profile() {
    let profile = ProfileManager::new()
        .with_env_source(env(&[("ENGINE_LAUNCHER_ENGINE_EXE", "env_engine.exe")]))
        .load(None)
        .unwrap();

    assert_eq!(profile.engine_exe.as_deref(), Some("env_engine.exe"));
    assert!(profile.toolchain_path.is_none());
}

#[test]
fn test_cli_values_complete_a_partial_profile() {
    let (_temp_dir, path) = create_test_profile("toolchain_path: \"tc\"\n");
    let base = ProfileManager::new()
        .with_env_source(env(&[]))
        .load(Some(&path))
        .unwrap();

    let cli = LaunchProfile {
        project_path: Some("hero/settings.stingray_project".into()),
        command_line_args: vec!["--fullscreen".into()],
        ..Default::default()
    };
    let config = base.merge(cli).into_configuration().unwrap();

    assert_eq!(config.toolchain_path, Utf8PathBuf::from("tc"));
    assert_eq!(config.project_path, Utf8PathBuf::from("hero/settings.stingray_project"));
    assert_eq!(config.engine_exe, DEFAULT_ENGINE_EXE);
    assert_eq!(config.command_line_args, vec!["--fullscreen".to_string()]);
}

#[test]
fn test_malformed_yaml_is_profile_error() {
    let (_temp_dir, path) = create_test_profile("toolchain_path: [unclosed\n");

    assert!(matches!(
        ProfileManager::new().with_env_source(env(&[])).load(Some(&path)),
        Err(ConfigError::Profile(_))
    ));
}

#[test]
fn test_saved_profile_round_trips_configuration() {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().join("saved.yaml")).unwrap();
    let manager = ProfileManager::new().with_env_source(env(&[]));

    let config = engine_launcher::LaunchConfiguration::new("tc", "p.stingray_project")
        .with_additional_plugins(["plugins"]);
    manager.save(&path, &LaunchProfile::from(config.clone())).unwrap();

    let loaded = manager.load(Some(&path)).unwrap().into_configuration().unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_empty_engine_exe_from_environment_uses_default() {
    let profile = ProfileManager::new()
        .with_env_source(env(&[
            ("ENGINE_LAUNCHER_TOOLCHAIN_PATH", "tc"),
            ("ENGINE_LAUNCHER_PROJECT_PATH", "p.stingray_project"),
            ("ENGINE_LAUNCHER_ENGINE_EXE", ""),
        ]))
        .load(None)
        .unwrap();

    let config = profile.into_configuration().unwrap();

    assert_eq!(config.engine_exe, DEFAULT_ENGINE_EXE);
}
