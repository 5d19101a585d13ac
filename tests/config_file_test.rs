// Integration test for configuration file support

use runlog::{LogConfig, LogManager, RunlogError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_toml_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("runlog.toml");

    let toml_content = format!(
        r#"
        program = "prog3"
        root = "{}"
        indent = "  "
    "#,
        temp_dir.path().join("logs").display()
    );

    fs::write(&config_path, toml_content).unwrap();

    let config = LogConfig::from_file(&config_path).unwrap();
    assert_eq!(config.program, "prog3");
    assert_eq!(config.root, Some(temp_dir.path().join("logs")));
    assert_eq!(config.indent, "  ");
    assert_eq!(
        config.program_dir().unwrap(),
        temp_dir.path().join("logs").join("prog3")
    );
}

#[test]
fn test_load_json_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("runlog.json");

    fs::write(&config_path, r#"{ "program": "prog1", "root": "/var/tmp/runlog" }"#).unwrap();

    let config = LogConfig::from_file(&config_path).unwrap();
    assert_eq!(config.program, "prog1");
    assert_eq!(config.root, Some(PathBuf::from("/var/tmp/runlog")));
    assert_eq!(config.indent, "\t");
}

#[test]
fn test_config_root_env_expansion() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("runlog.toml");
    std::env::set_var("RUNLOG_IT_ROOT", temp_dir.path());

    fs::write(
        &config_path,
        "program = \"prog2\"\nroot = \"${RUNLOG_IT_ROOT}/logs\"\n",
    )
    .unwrap();

    let config = LogConfig::from_file(&config_path).unwrap();
    assert_eq!(config.root, Some(temp_dir.path().join("logs")));
}

#[test]
fn test_invalid_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("runlog.toml");

    fs::write(&config_path, "program = [unclosed").unwrap();

    let result = LogConfig::from_file(&config_path);
    assert!(matches!(result, Err(RunlogError::InvalidConfig(_))));
}

#[test]
fn test_config_with_empty_program_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("runlog.json");

    fs::write(&config_path, r#"{ "program": "" }"#).unwrap();

    let result = LogConfig::from_file(&config_path);
    assert!(matches!(result, Err(RunlogError::MissingConfigField(_))));
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();

    let result = LogConfig::from_file(&temp_dir.path().join("absent.toml"));
    assert!(matches!(result, Err(RunlogError::ConfigError(_))));
}

#[test]
fn test_manager_from_loaded_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("runlog.toml");

    fs::write(
        &config_path,
        format!(
            "program = \"prog3\"\nroot = \"{}\"\nindent = \"-\"\n",
            temp_dir.path().display()
        ),
    )
    .unwrap();

    let manager = LogManager::with_config(LogConfig::from_file(&config_path).unwrap()).unwrap();
    manager.std_logger().set_tab(3);
    manager.print(&[&"configured"]).unwrap();

    assert!(manager.run_dir().starts_with(temp_dir.path().join("prog3")));
    let content = fs::read_to_string(manager.run_dir().join("std.log")).unwrap();
    assert!(content.ends_with(": ---configured\n"));
}
